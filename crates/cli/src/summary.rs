//! JSON view of a closed structure.

use autofrac::{Adjacency, Structure};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Summary {
    pub degree: &'static str,
    pub faces: Vec<FaceState>,
    pub edges: Vec<String>,
    pub roots: Vec<usize>,
    pub adjacencies: Vec<String>,
    pub rejected: Vec<String>,
    pub control_points: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct FaceState {
    pub name: String,
    pub ident: String,
    pub children: Vec<usize>,
}

impl Summary {
    pub fn of(structure: &Structure) -> Self {
        let closure = structure.closure();
        let faces = closure
            .faces()
            .iter()
            .enumerate()
            .map(|(i, f)| FaceState {
                name: f.name(),
                ident: f.ident(),
                children: closure.children(i).to_vec(),
            })
            .collect();
        let text = |adjs: &[Adjacency]| -> Vec<String> {
            adjs.iter().map(ToString::to_string).collect()
        };
        Self {
            degree: if structure.is_bezier_cubic() {
                "cubic"
            } else {
                "quadratic"
            },
            faces,
            edges: closure.edges().iter().map(|e| e.name()).collect(),
            roots: closure.roots().to_vec(),
            adjacencies: text(structure.adjacencies()),
            rejected: text(structure.rejected_adjacencies()),
            control_points: (0..structure.faces().len())
                .map(|i| structure.nb_control_points_of_face(i))
                .collect(),
        }
    }
}
