//! The half-duplex, two-slot mailbox connecting exactly two scripts.

use crate::{config::FullSlotPolicy, error::RuntimeError, label::ScriptId};

#[derive(Clone, Copy, Debug, Default)]
struct Slot
{
    value: i64,
    filled: bool,
}

/// A single port between two scripts, identified by their [`ScriptId`]s.
///
/// Owned outright by the [`crate::Engine`]'s arena and referenced by
/// [`crate::CommunicatorId`]; this avoids the back-pointer ownership
/// cycle a direct `Script <-> Communicator <-> Script` graph would
/// otherwise require.
#[derive(Clone, Copy, Debug)]
pub struct Communicator
{
    a: ScriptId,
    b: ScriptId,
    a_to_b: Slot,
    b_to_a: Slot,
}

impl Communicator
{
    /// A fresh, empty Communicator between `a` and `b`.
    pub fn new(a: ScriptId, b: ScriptId) -> Self
    {
        Self{a, b, a_to_b: Slot::default(), b_to_a: Slot::default()}
    }

    /// The script on the other end, from `caller`'s point of view.
    ///
    /// Panics if `caller` is neither endpoint; that would indicate a bug
    /// in the engine's bookkeeping, not a recoverable runtime condition.
    pub fn peer(&self, caller: ScriptId) -> ScriptId
    {
        if caller == self.a {
            self.b
        } else if caller == self.b {
            self.a
        } else {
            panic!("{caller:?} is not an endpoint of this communicator");
        }
    }

    /// Send `value` from `caller` toward its peer.
    pub fn send(&mut self, caller: ScriptId, value: i64, policy: FullSlotPolicy, port: i64)
        -> Result<(), RuntimeError>
    {
        let slot = self.outgoing_slot_mut(caller);
        if slot.filled && policy == FullSlotPolicy::Error {
            return Err(RuntimeError::SlotFull{port});
        }
        slot.value = value;
        slot.filled = true;
        Ok(())
    }

    /// Receive a value addressed to `caller`, if one is pending.
    pub fn receive(&mut self, caller: ScriptId) -> Option<i64>
    {
        let slot = self.incoming_slot_mut(caller);
        if slot.filled {
            slot.filled = false;
            Some(slot.value)
        } else {
            None
        }
    }

    fn outgoing_slot_mut(&mut self, caller: ScriptId) -> &mut Slot
    {
        if caller == self.a {
            &mut self.a_to_b
        } else {
            &mut self.b_to_a
        }
    }

    fn incoming_slot_mut(&mut self, caller: ScriptId) -> &mut Slot
    {
        if caller == self.a {
            &mut self.b_to_a
        } else {
            &mut self.a_to_b
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn send_then_receive_round_trips()
    {
        let a = ScriptId(0);
        let b = ScriptId(1);
        let mut c = Communicator::new(a, b);

        c.send(a, 65, FullSlotPolicy::Overwrite, 0).unwrap();
        assert_eq!(c.receive(a), None); // a cannot read its own outgoing slot
        assert_eq!(c.receive(b), Some(65));
        assert_eq!(c.receive(b), None); // consumed
    }

    #[test]
    fn overwrite_policy_replaces_pending_value()
    {
        let a = ScriptId(0);
        let b = ScriptId(1);
        let mut c = Communicator::new(a, b);

        c.send(a, 1, FullSlotPolicy::Overwrite, 0).unwrap();
        c.send(a, 2, FullSlotPolicy::Overwrite, 0).unwrap();
        assert_eq!(c.receive(b), Some(2));
    }

    #[test]
    fn error_policy_rejects_second_send()
    {
        let a = ScriptId(0);
        let b = ScriptId(1);
        let mut c = Communicator::new(a, b);

        c.send(a, 1, FullSlotPolicy::Error, 0).unwrap();
        assert!(matches!(c.send(a, 2, FullSlotPolicy::Error, 0), Err(RuntimeError::SlotFull{port: 0})));
    }

    #[test]
    fn peer_resolves_either_direction()
    {
        let a = ScriptId(0);
        let b = ScriptId(1);
        let c = Communicator::new(a, b);
        assert_eq!(c.peer(a), b);
        assert_eq!(c.peer(b), a);
    }

    #[test]
    fn directions_are_independent()
    {
        let a = ScriptId(0);
        let b = ScriptId(1);
        let mut c = Communicator::new(a, b);

        c.send(a, 10, FullSlotPolicy::Overwrite, 0).unwrap();
        c.send(b, 20, FullSlotPolicy::Overwrite, 0).unwrap();
        assert_eq!(c.receive(b), Some(10));
        assert_eq!(c.receive(a), Some(20));
    }
}
