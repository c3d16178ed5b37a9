//! The sparse integer cell array addressed by a script's data pointer.

use std::collections::HashMap;

/// A sparse, unbounded array of 64-bit signed cells. Absent keys read as
/// zero; any write (including writing zero) materializes the entry.
///
/// Writing zero is not special-cased to remove the entry: the observable
/// behavior (a subsequent read returns 0 either way) is identical, and
/// removing the entry would only save memory on a path that isn't worth
/// the extra branch for this runtime's expected tape sizes.
#[derive(Clone, Debug, Default)]
pub struct Tape
{
    cells: HashMap<i64, i64>,
}

impl Tape
{
    /// A fresh, all-zero tape.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Read the cell at `index`, or 0 if never written.
    pub fn get(&self, index: i64) -> i64
    {
        self.cells.get(&index).copied().unwrap_or(0)
    }

    /// Overwrite the cell at `index`.
    pub fn set(&mut self, index: i64, value: i64)
    {
        self.cells.insert(index, value);
    }

    /// Increment the cell at `index` by one, with two's-complement
    /// wraparound on overflow.
    pub fn increment(&mut self, index: i64)
    {
        let value = self.get(index).wrapping_add(1);
        self.set(index, value);
    }

    /// Decrement the cell at `index` by one, with two's-complement
    /// wraparound on underflow.
    pub fn decrement(&mut self, index: i64)
    {
        let value = self.get(index).wrapping_sub(1);
        self.set(index, value);
    }

    /// Remove every cell, restoring an all-zero tape.
    pub fn clear(&mut self)
    {
        self.cells.clear();
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn unwritten_cells_read_zero()
    {
        let tape = Tape::new();
        assert_eq!(tape.get(0), 0);
        assert_eq!(tape.get(-5), 0);
    }

    #[test]
    fn increment_and_decrement_wrap()
    {
        let mut tape = Tape::new();
        tape.set(0, i64::MAX);
        tape.increment(0);
        assert_eq!(tape.get(0), i64::MIN);

        tape.set(0, i64::MIN);
        tape.decrement(0);
        assert_eq!(tape.get(0), i64::MAX);
    }

    #[test]
    fn clear_resets_all_cells()
    {
        let mut tape = Tape::new();
        tape.set(3, 42);
        tape.clear();
        assert_eq!(tape.get(3), 0);
    }

    #[test]
    fn negative_indices_are_independent_of_positive()
    {
        let mut tape = Tape::new();
        tape.set(1, 10);
        tape.set(-1, 20);
        assert_eq!(tape.get(1), 10);
        assert_eq!(tape.get(-1), 20);
    }
}
