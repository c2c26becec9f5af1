//! Self-similar edge rules (Cantor and Bezier) and their one-level subdivision.
//!
//! Purpose
//! - An `Edge` is the atomic boundary rule of a face: a kind, an arity `n`
//!   (number of self-similar pieces) and a delay counter.
//! - A delayed edge is an opaque placeholder for `delay` generations: each
//!   subdivision only decrements the counter. At delay 0 it exposes its rule.
//!
//! Why this design
//! - `Edge` is a small `Copy` value; equality and hashing over all three
//!   fields make it directly usable as an interning key by the closure.
//! - Delay staging returns a new value (`decreased_delay`, `with_delay`)
//!   so no edge instance is ever shared mutably between faces.
//!
//! Token grammar
//! - `<T><arity>[_<delay>]` with `T ∈ {C, B}`, delay printed only when > 0.
//! - The long form `<T>_<arity>_<delay>` (e.g. `B_3_0`) is accepted on input.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Family of the self-similar rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    Cantor,
    Bezier,
}

impl EdgeKind {
    pub fn letter(self) -> char {
        match self {
            EdgeKind::Cantor => 'C',
            EdgeKind::Bezier => 'B',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        match c {
            'C' => Some(EdgeKind::Cantor),
            'B' => Some(EdgeKind::Bezier),
            _ => None,
        }
    }
}

/// Boundary rule: kind, arity and delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    kind: EdgeKind,
    arity: u32,
    delay: u32,
}

impl Edge {
    /// # Panics
    /// If `arity == 0`.
    pub fn new(kind: EdgeKind, arity: u32, delay: u32) -> Self {
        assert!(arity >= 1, "edge arity must be >= 1");
        Self { kind, arity, delay }
    }

    #[inline]
    pub fn cantor(arity: u32) -> Self {
        Self::new(EdgeKind::Cantor, arity, 0)
    }

    #[inline]
    pub fn bezier(arity: u32) -> Self {
        Self::new(EdgeKind::Bezier, arity, 0)
    }

    #[inline]
    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    #[inline]
    pub fn arity(&self) -> u32 {
        self.arity
    }

    #[inline]
    pub fn delay(&self) -> u32 {
        self.delay
    }

    #[inline]
    pub fn is_delayed(&self) -> bool {
        self.delay > 0
    }

    #[inline]
    pub fn is_bezier(&self) -> bool {
        self.kind == EdgeKind::Bezier
    }

    /// Bezier edge that already exposes its rule (interior control points live).
    #[inline]
    pub fn is_active_bezier(&self) -> bool {
        self.is_bezier() && !self.is_delayed()
    }

    /// Number of pieces one subdivision step actually produces for the rule
    /// itself: 1 while delayed, else the arity.
    #[inline]
    pub fn actual_subdivision_count(&self) -> u32 {
        if self.is_delayed() {
            1
        } else {
            self.arity
        }
    }

    /// Same rule with the delay decremented (saturating at 0).
    #[inline]
    pub fn decreased_delay(self) -> Self {
        Self {
            delay: self.delay.saturating_sub(1),
            ..self
        }
    }

    #[inline]
    pub fn with_delay(self, delay: u32) -> Self {
        Self { delay, ..self }
    }

    /// One-level subdivision of this edge.
    ///
    /// `context` is the edge that occupies the boundary position being
    /// subdivided; a Cantor rule uses two copies of it to flank every gap.
    ///
    /// - delayed: `[self with delay − 1]`
    /// - Cantor `n`: `(C_n, ctx, ctx) × (n − 1)` then `C_n`, so `3(n−1)+1` edges
    /// - Bezier `n`: `B_n × n`
    pub fn subdivide(&self, context: Edge) -> Vec<Edge> {
        if self.is_delayed() {
            return vec![self.decreased_delay()];
        }
        let n = self.arity as usize;
        match self.kind {
            EdgeKind::Cantor => {
                let bridge = Edge::cantor(self.arity);
                let mut out = Vec::with_capacity(3 * (n - 1) + 1);
                for _ in 0..n - 1 {
                    out.push(bridge);
                    out.push(context);
                    out.push(context);
                }
                out.push(bridge);
                out
            }
            EdgeKind::Bezier => vec![Edge::bezier(self.arity); n],
        }
    }

    /// Length of [`Edge::subdivide`]: 1 while delayed, `3(n−1)+1` for a
    /// Cantor rule, `n` for a Bezier rule.
    pub fn piece_count(&self) -> usize {
        if self.is_delayed() {
            return 1;
        }
        let n = self.arity as usize;
        match self.kind {
            EdgeKind::Cantor => 3 * (n - 1) + 1,
            EdgeKind::Bezier => n,
        }
    }

    /// Canonical token, e.g. `B3`, `C5_2`.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.letter(), self.arity)?;
        if self.is_delayed() {
            write!(f, "_{}", self.delay)?;
        }
        Ok(())
    }
}

impl FromStr for Edge {
    type Err = ParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut chars = token.chars();
        let kind = chars
            .next()
            .and_then(EdgeKind::from_letter)
            .ok_or_else(|| ParseError::edge(token, "type must be `C` or `B`"))?;
        let rest = chars.as_str();
        // Long form `B_3_0` carries a leading separator and a mandatory delay.
        let (arity_txt, delay_txt) = match rest.strip_prefix('_') {
            Some(long) => match long.split_once('_') {
                Some((a, d)) => (a, Some(d)),
                None => return Err(ParseError::edge(token, "long form needs `_<arity>_<delay>`")),
            },
            None => match rest.split_once('_') {
                Some((a, d)) => (a, Some(d)),
                None => (rest, None),
            },
        };
        let arity = parse_count(arity_txt).ok_or_else(|| ParseError::edge(token, "bad arity"))?;
        if arity == 0 {
            return Err(ParseError::edge(token, "arity must be >= 1"));
        }
        let delay = match delay_txt {
            Some(d) => parse_count(d).ok_or_else(|| ParseError::edge(token, "bad delay"))?,
            None => 0,
        };
        Ok(Edge::new(kind, arity, delay))
    }
}

fn parse_count(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
