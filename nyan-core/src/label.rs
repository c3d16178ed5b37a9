//! Identifying scripts and communicators within an [`crate::Engine`].

/// Identifies a [`crate::Script`] within an [`crate::Engine`]'s arena.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ScriptId(pub usize);

/// Identifies a [`crate::Communicator`] within an [`crate::Engine`]'s
/// arena.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CommunicatorId(pub usize);
