//! Formats what the machine prints while it runs: step log lines or full tape dumps,
//! tape growth notices, and the halt statistics.

use std::fmt;
use std::io::Write;

use crate::config::DisplayOptions;
use crate::tape::{Growth, Tape};
use crate::types::{HaltStats, Tick, TuringMachineError};

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sequence: {}, head read: {}, current state: {}, next state: ",
            self.step, self.read, self.state
        )?;

        match self.next_state {
            Some(state) => write!(f, "{}", state),
            None => write!(f, "NULL"),
        }
    }
}

/// Writes machine output to `W` according to the display options.
pub struct Reporter<W: Write> {
    out: W,
    options: DisplayOptions,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, options: DisplayOptions) -> Self {
        Self { out, options }
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Reports one cycle: the whole tape in tape display mode, otherwise a step log
    /// line if the step falls on the logging cadence.
    ///
    /// Sparse log lines past the threshold are flushed right away, as the run may
    /// only end by interruption.
    pub fn tick(&mut self, tick: &Tick, tape: &Tape) -> Result<(), TuringMachineError> {
        if self.options.show_tape {
            writeln!(self.out, "{}", tape)?;
        } else if self.options.logs_step(tick.step) {
            writeln!(self.out, "{}", tick)?;
            if tick.step >= self.options.log_threshold {
                self.out.flush()?;
            }
        }

        Ok(())
    }

    /// Reports that the tape ran out on one side. Silent in tape display mode,
    /// where it would break up the stream of tape dumps.
    pub fn growth(&mut self, growth: Growth) -> Result<(), TuringMachineError> {
        if !self.options.show_tape {
            writeln!(self.out, "Out of tape: adding more ({}).", growth)?;
            self.out.flush()?;
        }

        Ok(())
    }

    /// Reports the final tape and the halt statistics.
    pub fn halt(&mut self, stats: &HaltStats, tape: &Tape) -> Result<(), TuringMachineError> {
        // In tape display mode the final tape was already printed by the last tick.
        if !self.options.show_tape && !self.options.suppress_halt_tape {
            writeln!(self.out, "{}", tape)?;
        }

        writeln!(self.out, "HALT")?;
        writeln!(self.out, "Ones (Score): {}", stats.ones)?;
        writeln!(self.out, "Zeroes: {}", stats.zeroes)?;
        writeln!(self.out, "Tape length: {}", stats.tape_length)?;
        writeln!(self.out, "Halt sequence: {}", stats.steps)?;
        self.out.flush()?;

        Ok(())
    }

    /// Reports that the run was cut short by the configured step limit.
    pub fn step_limit(&mut self, steps: u64) -> Result<(), TuringMachineError> {
        writeln!(self.out, "STEP LIMIT")?;
        writeln!(self.out, "Stopped after: {}", steps)?;
        self.out.flush()?;

        Ok(())
    }

    /// Consumes the reporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
