//! Control-point coordinates of the initial faces.
//!
//! Points are read face by face, edge by edge: the start vertex of each edge,
//! then the interior points of an active Bezier edge (1 quadratic, 2 cubic).
//! With automatic placement the interior points are not read; they are put
//! at `k/o` along the segment from the edge's start vertex to its end vertex
//! (`o` owned points), i.e. the midpoint for quadratic edges and the 1/3,
//! 2/3 points for cubic edges.
//!
//! Each face's list is finally rotated left past the points owned by its
//! first `offset` edges, so that index 0 is the first point of the edge the
//! offset designates.

use std::fmt;

use nalgebra::Point2;

use crate::structure::Structure;

/// Control points of one face, in layout order.
pub type FaceCoords = Vec<Point2<f64>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoordError {
    /// The description ran out of points while filling `face`.
    NotEnoughPoints { face: usize, needed: usize, given: usize },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEnoughPoints {
                face,
                needed,
                given,
            } => write!(
                f,
                "not enough points for face {face}: need at least {needed}, got {given}"
            ),
        }
    }
}

impl std::error::Error for CoordError {}

/// Assemble per-face control points from the raw point list.
///
/// Extra trailing points are ignored.
pub fn assemble(
    structure: &Structure,
    points: &[Point2<f64>],
    auto_intern: bool,
) -> Result<Vec<FaceCoords>, CoordError> {
    let degree = structure.degree();
    let mut next = 0usize;
    let mut out = Vec::with_capacity(structure.faces().len());
    for (fi, face) in structure.faces().iter().enumerate() {
        let mut take = || -> Result<Point2<f64>, CoordError> {
            let p = points.get(next).copied().ok_or(CoordError::NotEnoughPoints {
                face: fi,
                needed: next + 1,
                given: points.len(),
            })?;
            next += 1;
            Ok(p)
        };
        let mut coords = Vec::with_capacity(face.control_point_count(degree));
        for &edge in face.edges() {
            coords.push(take()?);
            for _ in 1..degree.owned_points(edge) {
                // Placeholder, overwritten by `place_interior_points`.
                coords.push(if auto_intern { Point2::origin() } else { take()? });
            }
        }
        if auto_intern {
            place_interior_points(structure, fi, &mut coords);
        }
        out.push(coords);
    }
    for (fi, coords) in out.iter_mut().enumerate() {
        rotate_to_offset(structure, fi, coords);
    }
    Ok(out)
}

fn place_interior_points(structure: &Structure, face: usize, coords: &mut [Point2<f64>]) {
    let degree = structure.degree();
    let f = structure.face(face);
    let n = coords.len();
    for (ei, &edge) in f.edges().iter().enumerate() {
        let owned = degree.owned_points(edge);
        if owned == 1 {
            continue;
        }
        let start = f.edge_start(ei, degree);
        let a = coords[start];
        let b = coords[(start + owned) % n];
        for k in 1..owned {
            debug_assert!(structure.is_intern_control_point(start + k, face));
            coords[start + k] = a + (b - a) * (k as f64 / owned as f64);
        }
    }
}

fn rotate_to_offset(structure: &Structure, face: usize, coords: &mut [Point2<f64>]) {
    let f = structure.face(face);
    let shift = f.edge_start(f.offset(), structure.degree());
    coords.rotate_left(shift);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::BezierDegree;

    fn structure(lines: &[&str], degree: BezierDegree) -> Structure {
        Structure::new(lines.iter().map(|l| l.parse().unwrap()).collect(), degree)
    }

    fn pts(raw: &[(f64, f64)]) -> Vec<Point2<f64>> {
        raw.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    fn close(a: Point2<f64>, b: Point2<f64>) -> bool {
        (a - b).norm() < 1e-12
    }

    #[test]
    fn reads_interior_points_when_not_auto() {
        let s = structure(&["B2 C2 C2"], BezierDegree::Quadratic);
        let p = pts(&[(0.0, 0.0), (0.5, -1.0), (1.0, 0.0), (0.0, 1.0)]);
        let c = assemble(&s, &p, false).unwrap();
        assert_eq!(c, vec![p.clone()]);
    }

    #[test]
    fn auto_quadratic_uses_midpoint() {
        let s = structure(&["B2 C2 C2"], BezierDegree::Quadratic);
        let p = pts(&[(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)]);
        let c = assemble(&s, &p, true).unwrap();
        assert_eq!(c[0].len(), 4);
        assert!(close(c[0][1], Point2::new(1.0, 0.0)));
        assert!(close(c[0][2], Point2::new(2.0, 0.0)));
    }

    #[test]
    fn auto_cubic_uses_thirds_and_wraps() {
        let s = structure(&["C2 B2"], BezierDegree::Cubic);
        let p = pts(&[(0.0, 0.0), (3.0, 0.0)]);
        let c = assemble(&s, &p, true).unwrap();
        // B2 runs from (3,0) back to (0,0).
        assert_eq!(c[0].len(), 4);
        assert!(close(c[0][2], Point2::new(2.0, 0.0)));
        assert!(close(c[0][3], Point2::new(1.0, 0.0)));
    }

    #[test]
    fn offset_rotates_past_owned_points() {
        let s = structure(&["B2 C2 C2 | 1"], BezierDegree::Quadratic);
        let p = pts(&[(0.0, 0.0), (0.5, -1.0), (1.0, 0.0), (0.0, 1.0)]);
        let c = assemble(&s, &p, false).unwrap();
        assert_eq!(c[0][0], p[2]);
        assert_eq!(c[0][3], p[1]);
    }

    #[test]
    fn points_are_consumed_across_faces() {
        let s = structure(&["C2 C2", "C3"], BezierDegree::Quadratic);
        let p = pts(&[(0.0, 0.0), (1.0, 0.0), (5.0, 5.0), (9.0, 9.0)]);
        let c = assemble(&s, &p, false).unwrap();
        assert_eq!(c[1], vec![p[2]]);
    }

    #[test]
    fn missing_points_are_reported() {
        let s = structure(&["B2 C2"], BezierDegree::Cubic);
        let p = pts(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(
            assemble(&s, &p, false),
            Err(CoordError::NotEnoughPoints {
                face: 0,
                needed: 3,
                given: 2
            })
        );
    }
}
