//! Top-level container: initial faces, declared adjacencies, Bezier degree.
//!
//! Purpose
//! - Hold the input tiling (ordered initial faces) and the user-declared
//!   identifications between boundary edges of initial faces.
//! - Expose the closure (`all_faces`, `all_edges`) and the control-point
//!   queries of the initial faces, parameterized by the structure-wide
//!   `BezierDegree`.
//!
//! Adjacency policy
//! - An adjacency between structurally different edges is dropped without
//!   error. Dropped adjacencies are kept in `rejected_adjacencies()` so that
//!   callers wanting strict validation can detect them.
//! - A face or edge index outside the initial faces is an input error and is
//!   returned as `StructureError`.

use std::fmt;
use std::str::FromStr;

use crate::canonical::CanonicalSet;
use crate::closure::Closure;
use crate::edge::Edge;
use crate::error::ParseError;
use crate::face::{BezierDegree, Face};

/// Identification of boundary edge `edge1` of `face1` with `edge2` of `face2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Adjacency {
    pub face1: usize,
    pub edge1: usize,
    pub face2: usize,
    pub edge2: usize,
}

impl Adjacency {
    pub fn new(face1: usize, edge1: usize, face2: usize, edge2: usize) -> Self {
        Self {
            face1,
            edge1,
            face2,
            edge2,
        }
    }
}

impl fmt::Display for Adjacency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} / {}.{}",
            self.face1, self.edge1, self.face2, self.edge2
        )
    }
}

impl FromStr for Adjacency {
    type Err = ParseError;

    /// `f1.e1 / f2.e2`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::Adjacency {
            text: s.to_string(),
        };
        let side = |part: &str| -> Option<(usize, usize)> {
            let (f, e) = part.trim().split_once('.')?;
            Some((f.trim().parse().ok()?, e.trim().parse().ok()?))
        };
        let (a, b) = s.split_once('/').ok_or_else(err)?;
        let (face1, edge1) = side(a).ok_or_else(err)?;
        let (face2, edge2) = side(b).ok_or_else(err)?;
        Ok(Self::new(face1, edge1, face2, edge2))
    }
}

/// Result of registering an adjacency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdjacencyOutcome {
    Registered,
    /// The two edges differ in kind, arity or delay.
    Rejected { left: Edge, right: Edge },
}

/// Errors surfaced by structure assembly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StructureError {
    FaceOutOfRange { face: usize, faces: usize },
    EdgeOutOfRange { face: usize, edge: usize, edges: usize },
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FaceOutOfRange { face, faces } => {
                write!(f, "face {face} out of range ({faces} initial faces)")
            }
            Self::EdgeOutOfRange { face, edge, edges } => {
                write!(f, "edge {edge} out of range for face {face} ({edges} edges)")
            }
        }
    }
}

impl std::error::Error for StructureError {}

#[derive(Clone, Debug)]
pub struct Structure {
    faces: Vec<Face>,
    adjacencies: Vec<Adjacency>,
    rejected: Vec<Adjacency>,
    degree: BezierDegree,
}

impl Structure {
    pub fn new(faces: Vec<Face>, degree: BezierDegree) -> Self {
        Self {
            faces,
            adjacencies: Vec::new(),
            rejected: Vec::new(),
            degree,
        }
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn face(&self, i: usize) -> &Face {
        &self.faces[i]
    }

    pub fn degree(&self) -> BezierDegree {
        self.degree
    }

    pub fn is_bezier_cubic(&self) -> bool {
        self.degree.is_cubic()
    }

    /// Registered adjacencies, in registration order.
    pub fn adjacencies(&self) -> &[Adjacency] {
        &self.adjacencies
    }

    /// Adjacencies dropped because their edges differ.
    pub fn rejected_adjacencies(&self) -> &[Adjacency] {
        &self.rejected
    }

    fn initial_edge(&self, face: usize, edge: usize) -> Result<Edge, StructureError> {
        let f = self.faces.get(face).ok_or(StructureError::FaceOutOfRange {
            face,
            faces: self.faces.len(),
        })?;
        f.edges()
            .get(edge)
            .copied()
            .ok_or(StructureError::EdgeOutOfRange {
                face,
                edge,
                edges: f.len(),
            })
    }

    /// Register `adj` if both initial edges are structurally equal.
    pub fn add_adjacency(&mut self, adj: Adjacency) -> Result<AdjacencyOutcome, StructureError> {
        let left = self.initial_edge(adj.face1, adj.edge1)?;
        let right = self.initial_edge(adj.face2, adj.edge2)?;
        if left == right {
            self.adjacencies.push(adj);
            Ok(AdjacencyOutcome::Registered)
        } else {
            self.rejected.push(adj);
            Ok(AdjacencyOutcome::Rejected { left, right })
        }
    }

    /// Closed automaton (states, transitions) reachable from the initial faces.
    pub fn closure(&self) -> Closure {
        Closure::of_faces(&self.faces)
    }

    pub fn all_faces(&self) -> CanonicalSet<Face> {
        self.closure().into_parts().0
    }

    pub fn all_edges(&self) -> CanonicalSet<Edge> {
        self.closure().into_parts().1
    }

    /// # Panics
    /// If `face` is not an initial face index.
    pub fn nb_control_points_of_face(&self, face: usize) -> usize {
        self.faces[face].control_point_count(self.degree)
    }

    /// # Panics
    /// If `face` or `edge` is out of range.
    pub fn control_point_indices(&self, edge: usize, face: usize, reverse: bool) -> Vec<usize> {
        self.faces[face].control_point_indices(edge, self.degree, reverse)
    }

    /// # Panics
    /// If `face` or `index` is out of range.
    pub fn is_intern_control_point(&self, index: usize, face: usize) -> bool {
        self.faces[face].is_intern_control_point(index, self.degree)
    }

    /// # Panics
    /// If `face` or `edge` is out of range.
    pub fn is_control_point_belong_edge(&self, index: usize, face: usize, edge: usize) -> bool {
        self.faces[face].is_control_point_belong_edge(index, edge, self.degree)
    }
}
