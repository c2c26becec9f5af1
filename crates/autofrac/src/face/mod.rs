//! Faces: cyclic boundaries of edge rules, their subdivision into child
//! faces, and their control-point layout.
//!
//! Purpose
//! - A `Face` is one state of the surface automaton: an ordered cyclic
//!   sequence of `Edge`s plus a rotation `offset` naming the boundary's
//!   conceptual first edge.
//! - Identity is the edge sequence alone. The offset is carried data and
//!   does not take part in equality or hashing.
//!
//! Subdivision
//! - Every boundary edge `i` is subdivided with its successor `i + 1` as
//!   context edge (see [`Edge::subdivide`]). The pieces are concatenated
//!   into the subdivided boundary.
//! - The face is partitioned into `child_count()` children, the largest
//!   piece count over the boundary. Child `j` takes piece `j` of every edge
//!   that has one, in boundary order. Each piece of the subdivided boundary
//!   lands in exactly one child, no child is longer than its parent, and all
//!   pieces come from the finite vocabulary of the parent (its own rules at
//!   lower delays). This is what makes the closure finite.
//!
//! Layout
//! - `layout.rs` maps each boundary edge to its control-point indices.

mod layout;

pub use layout::BezierDegree;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::edge::Edge;
use crate::error::ParseError;

#[derive(Clone, Debug)]
pub struct Face {
    edges: Vec<Edge>,
    offset: usize,
}

impl PartialEq for Face {
    fn eq(&self, other: &Self) -> bool {
        self.edges == other.edges
    }
}

impl Eq for Face {}

impl Hash for Face {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.edges.hash(state);
    }
}

impl Face {
    /// Face with offset 0. Errors on an empty boundary.
    pub fn new(edges: Vec<Edge>) -> Result<Self, ParseError> {
        if edges.is_empty() {
            return Err(ParseError::EmptyFace);
        }
        Ok(Self { edges, offset: 0 })
    }

    /// Same boundary with the offset reduced modulo the boundary length.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset % self.edges.len();
        self
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Boundary length (number of edges).
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Always false: construction rejects empty boundaries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// # Panics
    /// If `i >= self.len()`.
    #[inline]
    pub fn edge(&self, i: usize) -> Edge {
        assert!(
            i < self.edges.len(),
            "edge index {i} out of range for face `{self}` ({} edges)",
            self.edges.len()
        );
        self.edges[i]
    }

    /// Context edge used when subdividing boundary edge `i`: its successor.
    #[inline]
    pub fn context_edge(&self, i: usize) -> Edge {
        self.edges[(i + 1) % self.edges.len()]
    }

    /// Concatenation of the one-level subdivision of every boundary edge.
    pub fn subdivided_boundary(&self) -> Vec<Edge> {
        (0..self.len())
            .flat_map(|i| self.edges[i].subdivide(self.context_edge(i)))
            .collect()
    }

    /// Number of child faces: the largest piece count over the boundary.
    pub fn child_count(&self) -> usize {
        self.edges.iter().map(Edge::piece_count).max().unwrap_or(1)
    }

    /// One-level subdivision into child faces, in child order.
    pub fn subdivisions(&self) -> Vec<Face> {
        let boundary = self.subdivided_boundary();
        // Pieces of edge `i` occupy `boundary[starts[i]..starts[i] + counts[i]]`.
        let counts: Vec<usize> = self.edges.iter().map(Edge::piece_count).collect();
        let starts: Vec<usize> = counts
            .iter()
            .scan(0, |acc, &c| {
                let s = *acc;
                *acc += c;
                Some(s)
            })
            .collect();
        debug_assert_eq!(boundary.len(), counts.iter().sum::<usize>());
        (0..self.child_count())
            .map(|j| {
                let edges = counts
                    .iter()
                    .zip(&starts)
                    .filter(|&(&c, _)| j < c)
                    .map(|(_, &s)| boundary[s + j])
                    .collect();
                Face { edges, offset: 0 }.with_offset(self.offset)
            })
            .collect()
    }

    /// Canonical textual name: edge tokens joined by a space.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Identifier safe for the exported script: `F_` + tokens joined by `_`.
    ///
    /// Unambiguous because every token starts with a letter while a delay
    /// suffix starts with a digit.
    pub fn ident(&self) -> String {
        let mut s = String::from("F");
        for e in &self.edges {
            s.push('_');
            s.push_str(&e.name());
        }
        s
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.edges.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl FromStr for Face {
    type Err = ParseError;

    /// `B3 C3_1 B3` or `B3 C3_1 B3 | 2` (trailing offset).
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (boundary, offset) = match line.split_once('|') {
            Some((b, o)) => {
                let o = o.trim();
                let offset = o
                    .parse::<usize>()
                    .map_err(|_| ParseError::Offset { text: o.to_string() })?;
                (b, offset)
            }
            None => (line, 0),
        };
        let edges = boundary
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<Edge>, _>>()?;
        Ok(Face::new(edges)?.with_offset(offset))
    }
}

#[cfg(test)]
mod tests;
