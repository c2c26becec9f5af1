//! Face subdivision and control-point layout tests.

use super::*;
use crate::edge::EdgeKind;
use proptest::prelude::*;

fn face(s: &str) -> Face {
    s.parse().unwrap()
}

fn arb_edge() -> impl Strategy<Value = Edge> {
    (any::<bool>(), 1u32..5, 0u32..3).prop_map(|(cantor, n, d)| {
        let kind = if cantor {
            EdgeKind::Cantor
        } else {
            EdgeKind::Bezier
        };
        Edge::new(kind, n, d)
    })
}

fn arb_face() -> impl Strategy<Value = Face> {
    prop::collection::vec(arb_edge(), 1..6).prop_map(|edges| Face::new(edges).unwrap())
}

#[test]
fn parse_name_and_offset() {
    let f = face("B3  C3_2 B_3_0 | 4");
    assert_eq!(f.len(), 3);
    assert_eq!(f.offset(), 1);
    assert_eq!(f.name(), "B3 C3_2 B3");
    assert_eq!(f.ident(), "F_B3_C3_2_B3");
    assert_eq!(face(&f.name()), f);
}

#[test]
fn parse_rejects_empty_and_bad_offset() {
    assert_eq!("   ".parse::<Face>(), Err(ParseError::EmptyFace));
    assert!(matches!(
        "B3 | x".parse::<Face>(),
        Err(ParseError::Offset { .. })
    ));
    assert!(matches!(
        "B3 Q2".parse::<Face>(),
        Err(ParseError::EdgeToken { .. })
    ));
}

#[test]
fn offset_is_not_identity() {
    let a = face("B2 C3 B2");
    let b = face("B2 C3 B2 | 2");
    assert_eq!(a, b);
    let rotated = face("C3 B2 B2");
    assert_ne!(a, rotated);
}

#[test]
fn single_bezier_face_tiles_into_copies() {
    let f = face("B3");
    assert_eq!(f.child_count(), 3);
    let subs = f.subdivisions();
    assert_eq!(subs.len(), 3);
    assert!(subs.iter().all(|c| *c == f));
    assert_eq!(f.control_point_count(BezierDegree::Quadratic), 2);
    assert_eq!(f.control_point_count(BezierDegree::Cubic), 3);
}

#[test]
fn cantor_boundary_borrows_successor() {
    let f = face("C3 B3");
    let b3 = Edge::bezier(3);
    let c3 = Edge::cantor(3);
    let boundary = f.subdivided_boundary();
    assert_eq!(&boundary[..7], &[c3, b3, b3, c3, b3, b3, c3]);
    assert_eq!(boundary.len(), 7 + 3);
}

#[test]
fn mixed_partition_deals_pieces_by_position() {
    let f = face("C2 B3");
    // C2 pieces: C2, B3, B3, C2 ; B3 pieces: B3, B3, B3
    assert_eq!(f.child_count(), 4);
    let names: Vec<String> = f.subdivisions().iter().map(Face::name).collect();
    assert_eq!(names, vec!["C2 B3", "B3 B3", "B3 B3", "C2"]);
}

#[test]
fn unequal_bezier_arities_use_each_piece_once() {
    let f = face("B2 B3 | 1");
    let subs = f.subdivisions();
    let names: Vec<String> = subs.iter().map(Face::name).collect();
    assert_eq!(names, vec!["B2 B3", "B2 B3", "B3"]);
    let used: usize = subs.iter().map(Face::len).sum();
    assert_eq!(used, f.subdivided_boundary().len());
    assert_eq!(subs[0].offset(), 1);
    assert_eq!(subs[2].offset(), 0);
}

#[test]
fn cantor_gap_copies_go_to_distinct_children() {
    let f = face("C2");
    let c2 = Edge::cantor(2);
    assert_eq!(f.subdivided_boundary(), vec![c2, c2, c2, c2]);
    let subs = f.subdivisions();
    assert_eq!(subs.len(), 4);
    assert!(subs.iter().all(|c| *c == f));
}

#[test]
fn delayed_face_has_one_child() {
    let f = face("B3_2 C2_1 | 1");
    let subs = f.subdivisions();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].name(), "B3_1 C2");
    assert_eq!(subs[0].offset(), 1);
}

#[test]
fn indices_quadratic_layout() {
    // B2 owns 0,1 ; C3 owns 2 ; B2 owns 3,4
    let f = face("B2 C3 B2");
    let q = BezierDegree::Quadratic;
    assert_eq!(f.control_point_count(q), 5);
    assert_eq!(f.control_point_indices(0, q, false), vec![0, 1, 2]);
    assert_eq!(f.control_point_indices(1, q, false), vec![2, 3]);
    assert_eq!(f.control_point_indices(2, q, false), vec![3, 4, 0]);
    assert_eq!(f.control_point_indices(2, q, true), vec![0, 4, 3]);
}

#[test]
fn indices_cubic_reverse_swaps_interior_pair() {
    let f = face("B2 C3");
    let c = BezierDegree::Cubic;
    assert_eq!(f.control_point_count(c), 4);
    assert_eq!(f.control_point_indices(0, c, false), vec![0, 1, 2, 3]);
    assert_eq!(f.control_point_indices(0, c, true), vec![3, 2, 1, 0]);
    assert_eq!(f.control_point_indices(1, c, true), vec![0, 3]);
}

#[test]
fn delayed_bezier_owns_a_single_point() {
    let f = face("B2_1 B2");
    let q = BezierDegree::Quadratic;
    assert_eq!(f.control_point_count(q), 3);
    assert_eq!(f.control_point_indices(0, q, false), vec![0, 1]);
    assert_eq!(f.control_point_indices(1, q, false), vec![1, 2, 0]);
}

#[test]
fn intern_points_are_bezier_interiors() {
    let f = face("B2 C3 B2");
    let q = BezierDegree::Quadratic;
    let intern: Vec<usize> = (0..5).filter(|&i| f.is_intern_control_point(i, q)).collect();
    assert_eq!(intern, vec![1, 4]);
    let c = BezierDegree::Cubic;
    let intern: Vec<usize> = (0..7).filter(|&i| f.is_intern_control_point(i, c)).collect();
    assert_eq!(intern, vec![1, 2, 5, 6]);
}

#[test]
fn belong_edge_wraps_cyclically() {
    let f = face("B2 C3 B2");
    let q = BezierDegree::Quadratic;
    assert!(f.is_control_point_belong_edge(0, 2, q));
    assert!(f.is_control_point_belong_edge(4, 2, q));
    assert!(!f.is_control_point_belong_edge(1, 2, q));
    assert!(f.is_control_point_belong_edge(2, 0, q));
}

#[test]
#[should_panic(expected = "out of range")]
fn edge_index_out_of_range_panics() {
    face("B2 C3").control_point_indices(2, BezierDegree::Quadratic, false);
}

#[test]
#[should_panic(expected = "out of range")]
fn control_point_out_of_range_panics() {
    face("C3").is_intern_control_point(1, BezierDegree::Quadratic);
}

proptest! {
    #[test]
    fn count_matches_edge_census(f in arb_face(), cubic in any::<bool>()) {
        let degree = BezierDegree::from_cubic_flag(cubic);
        let m = f.edges().iter().filter(|e| e.is_active_bezier()).count();
        let k = f.len() - m;
        let per = if cubic { 3 } else { 2 };
        prop_assert_eq!(f.control_point_count(degree), k + m * per);
    }

    #[test]
    fn children_never_outgrow_parent(f in arb_face()) {
        let subs = f.subdivisions();
        prop_assert_eq!(subs.len(), f.child_count());
        for c in &subs {
            prop_assert!(!c.is_empty() && c.len() <= f.len());
        }
    }

    #[test]
    fn children_split_the_subdivided_boundary(f in arb_face()) {
        let boundary = f.subdivided_boundary();
        let subs = f.subdivisions();
        let mut from_children: Vec<Edge> =
            subs.iter().flat_map(|c| c.edges().iter().copied()).collect();
        let mut expected = boundary.clone();
        from_children.sort();
        expected.sort();
        prop_assert_eq!(from_children, expected);
        // Child `j` holds piece `j` of each long enough edge, in boundary order.
        let mut start = 0;
        for e in f.edges() {
            let count = e.piece_count();
            for (j, piece) in boundary[start..start + count].iter().enumerate() {
                prop_assert!(subs[j].edges().contains(piece));
            }
            start += count;
        }
    }

    #[test]
    fn reverse_is_full_reversal(f in arb_face(), cubic in any::<bool>(), pick in 0usize..6) {
        let degree = BezierDegree::from_cubic_flag(cubic);
        let e = pick % f.len();
        let mut fwd = f.control_point_indices(e, degree, false);
        let rev = f.control_point_indices(e, degree, true);
        prop_assert_eq!(fwd.len(), degree.owned_points(f.edge(e)) + 1);
        fwd.reverse();
        prop_assert_eq!(fwd, rev);
    }

    #[test]
    fn every_point_belongs_to_some_edge(f in arb_face(), cubic in any::<bool>()) {
        let degree = BezierDegree::from_cubic_flag(cubic);
        for p in 0..f.control_point_count(degree) {
            let owners = (0..f.len())
                .filter(|&e| f.is_control_point_belong_edge(p, e, degree))
                .count();
            // Vertices are shared by two edges unless the boundary has one edge.
            if f.is_intern_control_point(p, degree) || f.len() == 1 {
                prop_assert!(owners >= 1);
            } else {
                prop_assert_eq!(owners, 2);
            }
        }
    }
}
