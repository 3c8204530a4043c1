//! State persistence collaborator.
//!
//! Persistence is opaque to the engine: it saves the best state through
//! this interface when configured to, and can load an initial state from
//! it, but never dictates a format. I/O failures propagate to the caller
//! unmodified; nothing is retried.

use std::io;

use crate::state::CopyState;

/// Opaque save/load collaborator for annealing states.
///
/// `save` returns a handle that `load` accepts back; what the handle
/// means (a path, a key, an index) is the store's business.
pub trait StateStore<S> {
    /// Identifies a saved state.
    type Handle;

    /// Persists a state, returning a handle for later retrieval.
    fn save(&mut self, state: &S) -> io::Result<Self::Handle>;

    /// Retrieves a previously saved state.
    fn load(&mut self, handle: &Self::Handle) -> io::Result<S>;
}

/// In-memory store; handles are indices into the stored sequence.
///
/// Useful for tests and for embedders that checkpoint within a process.
#[derive(Debug)]
pub struct MemoryStore<S> {
    states: Vec<S>,
}

impl<S> MemoryStore<S> {
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    /// Number of saved states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl<S> Default for MemoryStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CopyState> StateStore<S> for MemoryStore<S> {
    type Handle = usize;

    fn save(&mut self, state: &S) -> io::Result<usize> {
        self.states.push(state.deep_copy());
        Ok(self.states.len() - 1)
    }

    fn load(&mut self, handle: &usize) -> io::Result<S> {
        self.states
            .get(*handle)
            .map(CopyState::deep_copy)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no saved state at handle {handle}"),
                )
            })
    }
}
