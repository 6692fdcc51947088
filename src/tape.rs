//! The machine's tape: a finite, growable run of symbols standing in for an infinite one.
//!
//! The head is an explicit index into the cell vector. When a move would take it past
//! either end, a chunk of zero cells is added on that side first, and the head index is
//! shifted so it keeps pointing at the same logical cell.

use std::fmt;
use std::iter;

use crate::config::MachineConfig;
use crate::types::{Symbol, TuringMachineError};

/// The side of the tape that was extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    Left,
    Right,
}

impl fmt::Display for Growth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Growth::Left => write!(f, "left"),
            Growth::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Symbol>,
    head: usize,
    chunk: usize,
}

impl Tape {
    /// Creates a tape of `length` zero cells with the head on the first cell.
    ///
    /// # Arguments
    ///
    /// * `length` - Initial number of cells, at least 1.
    /// * `chunk` - Number of cells added whenever the head runs off an end, at least 1.
    pub fn new(length: usize, chunk: usize) -> Result<Self, TuringMachineError> {
        Self::with_cells(vec![Symbol::Zero; length], 0, chunk)
    }

    /// Creates a blank tape sized according to `config`.
    pub fn from_config(config: &MachineConfig) -> Result<Self, TuringMachineError> {
        Self::new(config.initial_tape_length, config.growth_chunk)
    }

    /// Creates a tape holding `cells` with the head at index `head`.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::InvalidConfig)` if the tape is empty, the head is out
    ///   of bounds or the growth chunk is zero.
    pub fn with_cells(
        cells: Vec<Symbol>,
        head: usize,
        chunk: usize,
    ) -> Result<Self, TuringMachineError> {
        if chunk == 0 {
            return Err(TuringMachineError::InvalidConfig(
                "tape growth chunk must be at least 1".to_string(),
            ));
        }

        if head >= cells.len() {
            return Err(TuringMachineError::InvalidConfig(format!(
                "head position {} is outside a tape of {} cells",
                head,
                cells.len()
            )));
        }

        Ok(Self { cells, head, chunk })
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> Symbol {
        self.cells[self.head]
    }

    /// Writes `symbol` under the head.
    pub fn write(&mut self, symbol: Symbol) {
        self.cells[self.head] = symbol;
    }

    /// Moves the head one cell to the left, growing the tape first if the head is on
    /// the leftmost cell.
    pub fn move_left(&mut self) -> Result<Option<Growth>, TuringMachineError> {
        let growth = if self.head == 0 {
            self.grow(Growth::Left)?;
            Some(Growth::Left)
        } else {
            None
        };

        self.head -= 1;
        Ok(growth)
    }

    /// Moves the head one cell to the right, growing the tape first if the head is on
    /// the rightmost cell.
    pub fn move_right(&mut self) -> Result<Option<Growth>, TuringMachineError> {
        let growth = if self.head + 1 == self.cells.len() {
            self.grow(Growth::Right)?;
            Some(Growth::Right)
        } else {
            None
        };

        self.head += 1;
        Ok(growth)
    }

    /// Adds one chunk of zero cells on `side` and re-anchors the head.
    ///
    /// Prepending shifts every cell right by the number of inserted cells, so the
    /// head index moves by the same amount. Appending leaves it alone. Either way the
    /// head must still be inside the tape and over the symbol it was over before.
    fn grow(&mut self, side: Growth) -> Result<(), TuringMachineError> {
        let symbol = self.read();
        let old_head = self.head;
        let old_len = self.cells.len();
        let padding = iter::repeat(Symbol::Zero).take(self.chunk);

        let expected = match side {
            Growth::Left => {
                self.cells.splice(0..0, padding);
                self.head += self.cells.len() - old_len;
                old_head + self.chunk
            }
            Growth::Right => {
                self.cells.extend(padding);
                old_head
            }
        };

        if self.head != expected || self.cells.get(self.head) != Some(&symbol) {
            return Err(TuringMachineError::TapeCorruption {
                expected,
                actual: self.head,
                len: self.cells.len(),
            });
        }

        tracing::debug!(%side, length = self.cells.len(), head = self.head, "tape grown");
        Ok(())
    }

    /// Snapshot of every cell, leftmost first.
    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    /// Index of the head within [`Tape::cells`].
    pub fn head(&self) -> usize {
        self.head
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; a tape has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Counts the cells holding `symbol`.
    pub fn count(&self, symbol: Symbol) -> usize {
        self.cells.iter().filter(|&&cell| cell == symbol).count()
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells
            .iter()
            .try_for_each(|cell| write!(f, "{}", cell))
    }
}
