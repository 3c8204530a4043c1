//! State copying strategies.
//!
//! The engine keeps three independent copies of the caller's state at all
//! times: the current point, the last accepted point, and the best point
//! found so far. Every snapshot taken at an accept/reject/re-anchor
//! boundary goes through [`StateCopier`], and mutating any one copy must
//! never affect another.

use crate::error::AnnealError;

/// How the engine duplicates a state.
///
/// The strategy is a configuration choice, never auto-detected. Selecting
/// a strategy the state type does not support fails at the first copy with
/// [`AnnealError::UnsupportedCopyStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CopyStrategy {
    /// Full structural duplication. Always correct for any state shape;
    /// cost proportional to the state size.
    Deep,
    /// Flat-sequence duplication. Valid only when the state is a flat
    /// ordered sequence with no nested mutable structure.
    Slice,
    /// Delegation to a clone capability supplied by the state type.
    Method,
}

impl Default for CopyStrategy {
    fn default() -> Self {
        CopyStrategy::Deep
    }
}

/// Copy capabilities a state type can offer.
///
/// `deep_copy` is mandatory and must produce a value with no shared
/// mutable substructure. The other two default to `None`, meaning the
/// state type does not support that strategy.
///
/// Implementations are provided for `f64` and `Vec<T: Clone>`; custom
/// state types implement whichever strategies are sound for their shape.
pub trait CopyState: Sized {
    /// Full structural duplication.
    fn deep_copy(&self) -> Self;

    /// Flat-sequence duplication, when the state is a flat sequence.
    fn slice_copy(&self) -> Option<Self> {
        None
    }

    /// Duplication through a type-supplied clone capability.
    fn method_copy(&self) -> Option<Self> {
        None
    }
}

impl CopyState for f64 {
    fn deep_copy(&self) -> Self {
        *self
    }

    fn method_copy(&self) -> Option<Self> {
        Some(*self)
    }
}

impl<T: Clone> CopyState for Vec<T> {
    fn deep_copy(&self) -> Self {
        self.clone()
    }

    fn slice_copy(&self) -> Option<Self> {
        Some(self[..].to_vec())
    }

    fn method_copy(&self) -> Option<Self> {
        Some(self.clone())
    }
}

/// Applies the configured [`CopyStrategy`] to produce independent state
/// copies.
#[derive(Debug, Clone, Copy)]
pub struct StateCopier {
    strategy: CopyStrategy,
}

impl StateCopier {
    /// Creates a copier for the given strategy.
    pub fn new(strategy: CopyStrategy) -> Self {
        Self { strategy }
    }

    /// The strategy this copier applies.
    pub fn strategy(&self) -> CopyStrategy {
        self.strategy
    }

    /// Copies a state.
    ///
    /// Fails with [`AnnealError::UnsupportedCopyStrategy`] when the state
    /// type does not offer the configured strategy.
    pub fn copy<S: CopyState>(&self, state: &S) -> Result<S, AnnealError> {
        let copied = match self.strategy {
            CopyStrategy::Deep => Some(state.deep_copy()),
            CopyStrategy::Slice => state.slice_copy(),
            CopyStrategy::Method => state.method_copy(),
        };
        copied.ok_or(AnnealError::UnsupportedCopyStrategy {
            strategy: self.strategy,
        })
    }
}
