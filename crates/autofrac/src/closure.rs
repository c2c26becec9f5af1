//! Fixed-point closure of face states under subdivision.
//!
//! Purpose
//! - Turn the a-priori infinite subdivision tree into the finite automaton of
//!   distinct states: every reachable face, every boundary edge, and for each
//!   face the ordered list of its children (as state indices).
//!
//! Why this design
//! - Explicit worklist over a `CanonicalSet<Face>`: states are expanded in
//!   insertion order and the loop ends when the frontier is empty. Nothing
//!   relies on recursion depth or on a depth bound.
//! - Termination: children are never longer than their parent and only use
//!   edges from the parent's vocabulary (own rules with a smaller delay,
//!   active bridges/refinements, and neighbouring edges as Cantor context),
//!   so the reachable state space is finite.

use crate::canonical::CanonicalSet;
use crate::edge::Edge;
use crate::face::Face;

/// Closed automaton of face and edge states.
#[derive(Clone, Debug)]
pub struct Closure {
    faces: CanonicalSet<Face>,
    edges: CanonicalSet<Edge>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl Closure {
    /// Close `initial` under [`Face::subdivisions`].
    pub fn of_faces(initial: &[Face]) -> Self {
        let mut faces = CanonicalSet::new();
        let roots: Vec<usize> = initial.iter().map(|f| faces.insert(f.clone()).0).collect();
        let mut children: Vec<Vec<usize>> = Vec::new();
        // Invariant: states [0, children.len()) are expanded.
        while children.len() < faces.len() {
            let next = faces[children.len()].clone();
            let kids = next
                .subdivisions()
                .into_iter()
                .map(|child| faces.insert(child).0)
                .collect();
            children.push(kids);
        }
        let mut edges = CanonicalSet::new();
        for f in &faces {
            edges.extend(f.edges().iter().copied());
        }
        Self {
            faces,
            edges,
            children,
            roots,
        }
    }

    pub fn faces(&self) -> &CanonicalSet<Face> {
        &self.faces
    }

    pub fn edges(&self) -> &CanonicalSet<Edge> {
        &self.edges
    }

    /// Child state indices of face state `i`, in child order.
    pub fn children(&self, i: usize) -> &[usize] {
        &self.children[i]
    }

    /// State index of each initial face, in input order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn into_parts(self) -> (CanonicalSet<Face>, CanonicalSet<Edge>) {
        (self.faces, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeKind;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn faces(lines: &[&str]) -> Vec<Face> {
        lines.iter().map(|l| l.parse().unwrap()).collect()
    }

    fn names(c: &Closure) -> Vec<String> {
        c.faces().iter().map(Face::name).collect()
    }

    #[test]
    fn single_bezier_is_its_own_fixed_point() {
        let c = Closure::of_faces(&faces(&["B3"]));
        assert_eq!(names(&c), vec!["B3"]);
        assert_eq!(c.children(0), &[0, 0, 0]);
        assert_eq!(c.edges().as_slice(), &[Edge::bezier(3)]);
    }

    #[test]
    fn delay_chain_reaches_active_state() {
        let c = Closure::of_faces(&faces(&["B2_2 B2_2"]));
        assert_eq!(names(&c), vec!["B2_2 B2_2", "B2_1 B2_1", "B2 B2"]);
        assert_eq!(c.children(0), &[1]);
        assert_eq!(c.children(1), &[2]);
        assert_eq!(c.children(2), &[2, 2]);
        assert_eq!(c.edges().len(), 3);
    }

    #[test]
    fn cantor_face_closes() {
        let c = Closure::of_faces(&faces(&["C2 B3"]));
        assert_eq!(names(&c), vec!["C2 B3", "B3 B3", "C2"]);
        assert_eq!(c.children(0), &[0, 1, 1, 2]);
        assert_eq!(c.children(1), &[1, 1, 1]);
        assert_eq!(c.children(2), &[2, 2, 2, 2]);
    }

    #[test]
    fn duplicate_initial_faces_share_a_state() {
        let c = Closure::of_faces(&faces(&["B2 C2", "B3", "B2 C2 | 1"]));
        assert_eq!(c.roots(), &[0, 1, 0]);
        assert_eq!(c.faces()[0].offset(), 0);
    }

    #[test]
    fn closure_is_idempotent_and_ordered() {
        let init = faces(&["C3 B2_1 B3", "B3_2 C3", "B2"]);
        let a = Closure::of_faces(&init);
        let b = Closure::of_faces(&init);
        assert_eq!(names(&a), names(&b));
        assert_eq!(a.edges().as_slice(), b.edges().as_slice());
        // Closing the closed set adds nothing.
        let again = Closure::of_faces(a.faces().as_slice());
        assert_eq!(names(&again), names(&a));
    }

    #[test]
    fn every_child_is_a_state_and_edges_are_closed() {
        let c = Closure::of_faces(&faces(&["C3_1 B2 C2", "B4_2 B2_1"]));
        for (i, f) in c.faces().iter().enumerate() {
            let subs = f.subdivisions();
            assert_eq!(subs.len(), c.children(i).len());
            for (child, &idx) in subs.iter().zip(c.children(i)) {
                assert_eq!(&c.faces()[idx], child);
            }
            for k in 0..f.len() {
                for e in f.edge(k).subdivide(f.context_edge(k)) {
                    assert!(c.edges().contains(&e), "missing {e} from {f}");
                }
            }
        }
    }

    #[test]
    fn randomized_closures_stay_within_vocabulary() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let len = rng.gen_range(1..5);
            let edges: Vec<Edge> = (0..len)
                .map(|_| {
                    let kind = if rng.gen_bool(0.5) {
                        EdgeKind::Cantor
                    } else {
                        EdgeKind::Bezier
                    };
                    Edge::new(kind, rng.gen_range(1..5), rng.gen_range(0..3))
                })
                .collect();
            let init = Face::new(edges.clone()).unwrap();
            let c = Closure::of_faces(std::slice::from_ref(&init));
            // Vocabulary: each initial rule at every delay down to 0.
            let vocab: CanonicalSet<Edge> = edges
                .iter()
                .flat_map(|e| (0..=e.delay()).map(move |d| e.with_delay(d)))
                .collect();
            for e in c.edges() {
                assert!(vocab.contains(e), "{e} escaped vocabulary of {init}");
            }
            // Children never outgrow their parent.
            let bound: usize = (1..=len as u32).map(|l| vocab.len().pow(l)).sum();
            assert!(c.faces().len() <= bound);
        }
    }
}
