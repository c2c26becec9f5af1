//! Line-oriented input description.
//!
//! Format
//! - A line starting with `f` switches to face mode (the default), `c` to
//!   constraint mode, `p` to point mode. The rest of a header line is free
//!   text (`faces`, `constraints`, `points`, …).
//! - Lines starting with `#` and blank lines are ignored.
//! - Face lines: edge tokens separated by whitespace, optional `| offset`.
//! - Constraint lines: `f1.e1 / f2.e2`.
//! - Point lines: `x y`.
//!
//! Face and constraint lines always start with `B`, `C` or a digit, so the
//! headers cannot be mistaken for data.

use std::str::FromStr;

use nalgebra::Point2;

use crate::error::ParseError;
use crate::face::{BezierDegree, Face};
use crate::structure::{Adjacency, AdjacencyOutcome, Structure, StructureError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Faces,
    Constraints,
    Points,
}

/// Parsed description: initial faces, adjacency constraints and the raw
/// control-point coordinates (in reading order).
#[derive(Clone, Debug, Default)]
pub struct Description {
    pub faces: Vec<Face>,
    pub adjacencies: Vec<Adjacency>,
    pub points: Vec<Point2<f64>>,
}

impl Description {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut out = Description::default();
        let mut section = Section::Faces;
        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            let Some(first) = line.chars().next() else {
                continue;
            };
            match first {
                '#' => continue,
                'f' => {
                    section = Section::Faces;
                    continue;
                }
                'c' => {
                    section = Section::Constraints;
                    continue;
                }
                'p' => {
                    section = Section::Points;
                    continue;
                }
                _ => {}
            }
            let parsed = match section {
                Section::Faces => line.parse::<Face>().map(|f| out.faces.push(f)),
                Section::Constraints => line.parse::<Adjacency>().map(|a| out.adjacencies.push(a)),
                Section::Points => parse_point(line).map(|p| out.points.push(p)),
            };
            parsed.map_err(|e| e.at_line(i + 1))?;
        }
        Ok(out)
    }

    /// Build the structure and register every constraint.
    ///
    /// Returns the structure together with the outcome of each constraint,
    /// in input order. Mismatched constraints are not errors.
    pub fn into_structure(
        self,
        degree: BezierDegree,
    ) -> Result<(Structure, Vec<AdjacencyOutcome>, Vec<Point2<f64>>), StructureError> {
        let mut structure = Structure::new(self.faces, degree);
        let outcomes = self
            .adjacencies
            .into_iter()
            .map(|a| structure.add_adjacency(a))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((structure, outcomes, self.points))
    }
}

impl FromStr for Description {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_point(line: &str) -> Result<Point2<f64>, ParseError> {
    let err = || ParseError::Point {
        text: line.to_string(),
    };
    let mut it = line.split_whitespace();
    let x: f64 = it.next().and_then(|t| t.parse().ok()).ok_or_else(err)?;
    let y: f64 = it.next().and_then(|t| t.parse().ok()).ok_or_else(err)?;
    if it.next().is_some() {
        return Err(err());
    }
    Ok(Point2::new(x, y))
}
