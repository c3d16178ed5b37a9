//! Runtime configuration: the behavioral choices the language leaves
//! historically ambiguous, reified as explicit, documented defaults.

/// What to do when a port write targets an already-full mailbox slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FullSlotPolicy
{
    /// Overwrite the pending value. This is the default: it matches the
    /// final design described for the Communicator, where only the
    /// receiver ever clears a slot and a second send before a receive
    /// simply replaces the pending value.
    Overwrite,

    /// Reject the write with [`crate::RuntimeError::SlotFull`]. Matches
    /// an earlier, stricter design for callers that want it.
    Error,
}

/// What to do when two different scripts' manifests both bind the same
/// port on a third script (the "diamond" case).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DuplicateBindingPolicy
{
    /// Reject the second binding. This is the default: silently
    /// overwriting the first binding would sever an existing script's
    /// connectivity with no diagnostic.
    Error,

    /// Allow the second binding to replace the first, matching the
    /// original implementation's permissive (if surprising) behavior.
    Overwrite,
}

/// Runtime configuration threaded through [`crate::Engine::new`].
#[derive(Clone, Copy, Debug)]
pub struct Config
{
    /// Enables `tracing` scheduler/interpreter events and switches `.`
    /// to print the cell's decimal value instead of a code point.
    pub debug: bool,

    pub full_slot_policy: FullSlotPolicy,

    pub duplicate_binding_policy: DuplicateBindingPolicy,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self{
            debug: false,
            full_slot_policy: FullSlotPolicy::Overwrite,
            duplicate_binding_policy: DuplicateBindingPolicy::Error,
        }
    }
}
