//! Parse errors shared by the textual layers (edge tokens, face lines,
//! adjacency constraints, input descriptions).

use std::fmt;

/// Errors surfaced while reading the textual grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Edge token that does not match `<T><arity>[_<delay>]` or `<T>_<arity>_<delay>`.
    EdgeToken { token: String, reason: &'static str },
    /// Face line without any edge token.
    EmptyFace,
    /// Face offset suffix that is not an unsigned integer.
    Offset { text: String },
    /// Adjacency constraint not of the form `f1.e1 / f2.e2`.
    Adjacency { text: String },
    /// Point line not of the form `x y`.
    Point { text: String },
    /// Wraps any of the above with the 1-based line of the description.
    AtLine { line: usize, source: Box<ParseError> },
}

impl ParseError {
    pub(crate) fn edge(token: &str, reason: &'static str) -> Self {
        Self::EdgeToken {
            token: token.to_string(),
            reason,
        }
    }

    pub(crate) fn at_line(self, line: usize) -> Self {
        Self::AtLine {
            line,
            source: Box::new(self),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EdgeToken { token, reason } => {
                write!(f, "malformed edge token {token:?}: {reason}")
            }
            Self::EmptyFace => write!(f, "face has no edges"),
            Self::Offset { text } => write!(f, "malformed face offset {text:?}"),
            Self::Adjacency { text } => write!(
                f,
                "malformed adjacency {text:?} (expected `face.edge / face.edge`)"
            ),
            Self::Point { text } => write!(f, "malformed point {text:?} (expected `x y`)"),
            Self::AtLine { line, source } => write!(f, "line {line}: {source}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AtLine { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
