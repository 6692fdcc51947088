//! This module defines the `TuringMachine` struct, which runs a validated transition table
//! against a growable tape. It owns the machine state and drives the read, write, move and
//! transition cycle until the halt state is reached.

use std::io::Write;

use crate::analyzer::{analyze, TransitionTable};
use crate::config::MachineConfig;
use crate::reporter::Reporter;
use crate::tape::{Growth, Tape};
use crate::types::{Direction, HaltStats, RawTable, State, Step, Symbol, Tick, TuringMachineError};

/// Everything that changes while the machine runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineState {
    pub current_state: State,
    /// The state the last transition started from, `None` before the first transition.
    pub previous_state: Option<State>,
    /// Number of transitions executed.
    pub step_count: u64,
    pub tape: Tape,
}

/// How a call to [`TuringMachine::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The machine reached the halt state.
    Halted(HaltStats),
    /// The configured step limit was reached first.
    StepLimit(u64),
}

/// A two-symbol, single-tape Turing machine.
///
/// The machine starts in the table's initial state on a blank tape with the head on
/// the first cell, and is either running or halted. It halts exactly when its current
/// state is `H`.
pub struct TuringMachine {
    table: TransitionTable,
    config: MachineConfig,
    initial: MachineState,
    machine: MachineState,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` for a validated table.
    ///
    /// # Arguments
    ///
    /// * `table` - The transition table to run.
    /// * `config` - Tape sizes and the optional step limit.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::InvalidConfig)` if `config` does not validate.
    pub fn new(table: TransitionTable, config: MachineConfig) -> Result<Self, TuringMachineError> {
        config.validate()?;

        let initial = MachineState {
            current_state: table.initial_state(),
            previous_state: None,
            step_count: 0,
            tape: Tape::from_config(&config)?,
        };

        Ok(Self {
            table,
            config,
            machine: initial.clone(),
            initial,
        })
    }

    /// Validates `raw` with the configured halt rule and creates a machine for it.
    pub fn from_raw(raw: &RawTable, config: MachineConfig) -> Result<Self, TuringMachineError> {
        let table = analyze(raw, config.halt_rule)?;
        Self::new(table, config)
    }

    /// Reads the head and describes the current cycle without changing anything.
    pub fn tick(&self) -> Tick {
        let machine = &self.machine;

        Tick {
            step: machine.step_count,
            read: machine.tape.read(),
            state: machine.previous_state.unwrap_or(machine.current_state),
            next_state: machine.previous_state.map(|_| machine.current_state),
        }
    }

    /// Executes a single transition.
    ///
    /// Reads the head, writes the transition's symbol, moves the head (growing the tape
    /// if needed) and enters the next state.
    ///
    /// # Returns
    ///
    /// * `Step::Halt` if the machine is in the halt state. Nothing is read or written.
    /// * `Step::Continue(growth)` after a transition, with the tape growth it caused.
    pub fn step(&mut self) -> Result<Step, TuringMachineError> {
        if self.is_halted() {
            return Ok(Step::Halt);
        }

        let state = self.machine.current_state;
        let read = self.machine.tape.read();
        let transition = *self
            .table
            .get(state, read)
            .ok_or_else(|| TuringMachineError::UndefinedTransition(state, read))?;

        let tape = &mut self.machine.tape;
        tape.write(transition.write);
        let growth = match transition.direction {
            Direction::Left => tape.move_left()?,
            Direction::Right => tape.move_right()?,
            Direction::Stay => None,
        };

        self.machine.previous_state = Some(state);
        self.machine.current_state = transition.next_state;
        self.machine.step_count += 1;

        Ok(Step::Continue(growth))
    }

    /// Runs the machine until it halts, reporting every cycle to `reporter`.
    ///
    /// A machine that never halts runs forever unless a step limit is configured.
    pub fn run<W: Write>(
        &mut self,
        reporter: &mut Reporter<W>,
    ) -> Result<Outcome, TuringMachineError> {
        tracing::debug!(state = %self.machine.current_state, "machine started");

        loop {
            reporter.tick(&self.tick(), &self.machine.tape)?;

            if self.is_halted() {
                let stats = self.halt_stats();
                tracing::info!(steps = stats.steps, ones = stats.ones, "machine halted");
                reporter.halt(&stats, &self.machine.tape)?;
                return Ok(Outcome::Halted(stats));
            }

            if let Some(limit) = self.config.step_limit {
                if self.machine.step_count >= limit {
                    tracing::info!(limit, "step limit reached");
                    reporter.step_limit(self.machine.step_count)?;
                    return Ok(Outcome::StepLimit(self.machine.step_count));
                }
            }

            if let Step::Continue(Some(growth)) = self.step()? {
                self.report_growth(reporter, growth)?;
            }
        }
    }

    fn report_growth<W: Write>(
        &self,
        reporter: &mut Reporter<W>,
        growth: Growth,
    ) -> Result<(), TuringMachineError> {
        tracing::trace!(
            %growth,
            step = self.machine.step_count,
            length = self.machine.tape.len(),
            "out of tape"
        );
        reporter.growth(growth)
    }

    /// Counts the tape for the halt report.
    pub fn halt_stats(&self) -> HaltStats {
        let tape = &self.machine.tape;

        HaltStats {
            ones: tape.count(Symbol::One),
            zeroes: tape.count(Symbol::Zero),
            tape_length: tape.len(),
            steps: self.machine.step_count,
        }
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> State {
        self.machine.current_state
    }

    /// Returns the total number of steps executed.
    pub fn step_count(&self) -> u64 {
        self.machine.step_count
    }

    /// Checks if the machine is in the halt state.
    pub fn is_halted(&self) -> bool {
        self.machine.current_state.is_halt()
    }

    pub fn tape(&self) -> &Tape {
        &self.machine.tape
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn machine_state(&self) -> &MachineState {
        &self.machine
    }

    /// Resets the machine to its initial configuration: initial state, blank tape,
    /// head on the first cell and a step count of zero.
    pub fn reset(&mut self) {
        self.machine = self.initial.clone();
    }
}
