//! Finite automaton of a self-similar surface.
//!
//! The surface is described by polygonal faces whose boundaries are built
//! from self-similar edge rules (Cantor-like and Bezier-like, optionally
//! delayed). Unrolling the self-similarity gives an infinite tree of states;
//! this crate computes its finite quotient under structural equality and the
//! control-point layout a solver needs to work on it.
//!
//! Modules, leaf first
//! - `edge`: edge rules and their one-level subdivision.
//! - `canonical`: insertion-ordered interning table.
//! - `face`: face states, subdivision into child faces, control-point layout.
//! - `closure`: worklist fixed point over face states.
//! - `structure`: initial faces, adjacencies, control-point queries.
//! - `description`, `coords`, `script`: input text, initial control points,
//!   solver script export.

pub mod canonical;
pub mod closure;
pub mod coords;
pub mod description;
pub mod edge;
pub mod error;
pub mod face;
pub mod script;
pub mod structure;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use canonical::CanonicalSet;
pub use closure::Closure;
pub use edge::{Edge, EdgeKind};
pub use error::ParseError;
pub use face::{BezierDegree, Face};
pub use structure::{Adjacency, AdjacencyOutcome, Structure, StructureError};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::coords::{assemble, CoordError, FaceCoords};
    pub use crate::description::Description;
    pub use crate::script::{render, ExportCfg};
    pub use crate::{
        Adjacency, AdjacencyOutcome, BezierDegree, CanonicalSet, Closure, Edge, EdgeKind, Face,
        ParseError, Structure, StructureError,
    };
}
