//! Control-point layout of a face boundary.
//!
//! Each edge owns its start point plus its interior points; the end point of
//! the last edge is the start point of the first one (cyclic closure).
//! Owned points: 1 for Cantor or delayed edges, 2 for a quadratic Bezier,
//! 3 for a cubic Bezier.

use crate::edge::Edge;

use super::Face;

/// Degree of the Bezier curves carried by active Bezier edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BezierDegree {
    #[default]
    Quadratic,
    Cubic,
}

impl BezierDegree {
    #[inline]
    pub fn from_cubic_flag(cubic: bool) -> Self {
        if cubic {
            BezierDegree::Cubic
        } else {
            BezierDegree::Quadratic
        }
    }

    #[inline]
    pub fn is_cubic(self) -> bool {
        self == BezierDegree::Cubic
    }

    /// Interior control points of one active Bezier edge.
    #[inline]
    pub fn interior_points(self) -> usize {
        match self {
            BezierDegree::Quadratic => 1,
            BezierDegree::Cubic => 2,
        }
    }

    /// Control points owned by `edge` in a boundary layout.
    #[inline]
    pub fn owned_points(self, edge: Edge) -> usize {
        if edge.is_active_bezier() {
            1 + self.interior_points()
        } else {
            1
        }
    }
}

impl Face {
    pub fn control_point_count(&self, degree: BezierDegree) -> usize {
        self.edges().iter().map(|&e| degree.owned_points(e)).sum()
    }

    /// Index of the start point of edge `edge_index`.
    ///
    /// # Panics
    /// If `edge_index >= self.len()`.
    pub fn edge_start(&self, edge_index: usize, degree: BezierDegree) -> usize {
        self.edge(edge_index);
        self.edges()[..edge_index]
            .iter()
            .map(|&e| degree.owned_points(e))
            .sum()
    }

    /// Control points of edge `edge_index` in traversal order: 2 indices for
    /// Cantor/delayed edges, 3 for quadratic and 4 for cubic Bezier edges.
    ///
    /// With `reverse` the sequence is the one seen from the face across the
    /// shared edge: extremities swapped, and for cubic the interior pair too.
    ///
    /// # Panics
    /// If `edge_index >= self.len()`.
    pub fn control_point_indices(
        &self,
        edge_index: usize,
        degree: BezierDegree,
        reverse: bool,
    ) -> Vec<usize> {
        let start = self.edge_start(edge_index, degree);
        let count = self.control_point_count(degree);
        let owned = degree.owned_points(self.edge(edge_index));
        let mut out: Vec<usize> = (0..=owned).map(|k| (start + k) % count).collect();
        if reverse {
            out.reverse();
        }
        out
    }

    /// False when `index` is a vertex shared by two consecutive edges.
    ///
    /// # Panics
    /// If `index` is not a control point of this face.
    pub fn is_intern_control_point(&self, index: usize, degree: BezierDegree) -> bool {
        let count = self.control_point_count(degree);
        assert!(
            index < count,
            "control point {index} out of range for face `{self}` ({count} points)"
        );
        let mut start = 0;
        for &e in self.edges() {
            if start == index {
                return false;
            }
            start += degree.owned_points(e);
        }
        true
    }

    /// Whether `index` is one of the control points of edge `edge_index`.
    ///
    /// # Panics
    /// If `edge_index >= self.len()`.
    pub fn is_control_point_belong_edge(
        &self,
        index: usize,
        edge_index: usize,
        degree: BezierDegree,
    ) -> bool {
        self.control_point_indices(edge_index, degree, false)
            .contains(&index)
    }
}
