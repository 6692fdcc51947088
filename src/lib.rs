//! This crate provides the core logic for a two-symbol Turing machine simulator of the
//! busy-beaver class. It includes modules for validating transition tables, the growable
//! tape, the execution engine and its reporter, compact machine notation, and a small
//! collection of built-in programs.

pub mod analyzer;
pub mod config;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod reporter;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the validator entry point, its error type and the validated table.
pub use analyzer::{analyze, AnalysisError, TransitionTable};
/// Re-exports the configuration types.
pub use config::{DisplayOptions, HaltRule, MachineConfig};
/// Re-exports the compact notation encoder.
pub use encoder::encode;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the execution engine.
pub use machine::{MachineState, Outcome, TuringMachine};
/// Re-exports the compact notation parser.
pub use parser::parse;
/// Re-exports `Program`, `ProgramInfo`, `ProgramManager` and `PROGRAMS` from the programs module.
pub use programs::{Program, ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the reporter.
pub use reporter::Reporter;
/// Re-exports the tape.
pub use tape::{Growth, Tape};
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{
    Direction, HaltStats, RawTable, State, Step, Symbol, Tick, Transition, TuringMachineError,
};
