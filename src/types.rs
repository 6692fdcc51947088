//! This module defines the core data structures and types used throughout the simulator,
//! including symbols, states, transitions, the raw transition table handed over by callers,
//! per-step reports and error types.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::analyzer::AnalysisError;
use crate::Rule;

/// Number of cells on a freshly created tape.
pub const INITIAL_TAPE_LENGTH: usize = 20;
/// Number of zero cells added to either end of the tape when the head runs out of it.
pub const TAPE_GROWTH_CHUNK: usize = 1000;
/// Below this step count every step is logged.
pub const STEP_LOG_THRESHOLD: u64 = 10_000;
/// Above the threshold, only steps that are a multiple of this interval are logged.
pub const STEP_LOG_INTERVAL: u64 = 50_000;
/// The maximum allowed size for a program file in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB

/// A tape symbol. The tape only ever holds zeroes and ones.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    #[default]
    Zero,
    One,
}

impl Symbol {
    /// Parses `'0'` or `'1'`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Symbol::Zero),
            '1' => Some(Symbol::One),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::Zero => '0',
            Symbol::One => '1',
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A state label: a single uppercase ASCII letter.
///
/// `H` is reserved for the halt state. It may be the target of a transition
/// but never has transitions of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State(char);

impl State {
    /// The unique halt state.
    pub const HALT: State = State('H');

    /// Creates a state from a letter, normalizing it to uppercase.
    /// Returns `None` for anything that is not an ASCII letter.
    pub fn new(label: char) -> Option<Self> {
        label
            .is_ascii_alphabetic()
            .then(|| State(label.to_ascii_uppercase()))
    }

    pub fn label(self) -> char {
        self.0
    }

    pub fn is_halt(self) -> bool {
        self == Self::HALT
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Parses a move code (`L`, `R` or `N`), ignoring case.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            'N' => Some(Direction::Stay),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'N',
        }
    }
}

/// What the machine does for one `(state, read symbol)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The symbol written under the head.
    pub write: Symbol,
    /// Where the head moves after writing.
    pub direction: Direction,
    /// The state the machine transitions to.
    pub next_state: State,
}

impl Transition {
    /// The three-character output code, e.g. `1RB`.
    pub fn code(&self) -> String {
        format!(
            "{}{}{}",
            self.write,
            self.direction.code(),
            self.next_state
        )
    }
}

/// An unvalidated transition table, exactly as a caller supplied it.
///
/// Each entry maps a two-character input code (read symbol followed by the
/// current state, e.g. `0A`) to a three-character output code (write symbol,
/// move, next state, e.g. `1RB`). Entry order is preserved: the first state
/// on the left-hand side becomes the initial state.
///
/// In JSON a raw table is an object, `{"0A": "1RB", "1A": "1LB", ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    entries: Vec<(String, String)>,
}

impl RawTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. Duplicated inputs are kept and left for validation to reject.
    pub fn insert(&mut self, input: impl Into<String>, output: impl Into<String>) {
        self.entries.push((input.into(), output.into()));
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(input, output)| (input.as_str(), output.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<I: Into<String>, O: Into<String>> FromIterator<(I, O)> for RawTable {
    fn from_iter<T: IntoIterator<Item = (I, O)>>(iter: T) -> Self {
        let mut table = RawTable::new();
        for (input, output) in iter {
            table.insert(input, output);
        }
        table
    }
}

impl Serialize for RawTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(input, output)| (input, output)))
    }
}

impl<'de> Deserialize<'de> for RawTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RawTableVisitor)
    }
}

struct RawTableVisitor;

impl<'de> Visitor<'de> for RawTableVisitor {
    type Value = RawTable;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of two-character input codes to three-character output codes")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawTable, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((input, output)) = map.next_entry::<String, String>()? {
            entries.push((input, output));
        }

        Ok(RawTable { entries })
    }
}

/// A snapshot of one cycle of the machine, taken after reading the head
/// and before the halt check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Number of transitions executed so far.
    pub step: u64,
    /// The symbol under the head.
    pub read: Symbol,
    /// The state the last transition started from (the initial state before any transition).
    pub state: State,
    /// The state the last transition moved to, `None` before the first transition.
    pub next_state: Option<State>,
}

/// Statistics reported once the machine halts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaltStats {
    /// Number of one cells, the busy-beaver score.
    pub ones: usize,
    pub zeroes: usize,
    pub tape_length: usize,
    /// Step count at which the halt state was reached.
    pub steps: u64,
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine performed a transition. Carries the tape growth it caused, if any.
    Continue(Option<crate::tape::Growth>),
    /// The machine is in the halt state.
    Halt,
}

/// Represents various errors that can occur while loading, validating or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// The transition table failed validation.
    #[error(transparent)]
    Validation(#[from] AnalysisError),
    /// Indicates that there's no rule defined for a state and symbol.
    #[error("No rule defined for state {0} and symbol {1}")]
    UndefinedTransition(State, Symbol),
    /// The head did not land where it should after the tape grew.
    #[error("Tape corruption: head at {actual}, expected {expected} (tape length {len})")]
    TapeCorruption {
        expected: usize,
        actual: usize,
        len: usize,
    },
    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Indicates an error while parsing a machine written in compact notation.
    #[error("Program parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates that a JSON table could not be decoded.
    #[error("JSON error: {0}")]
    JsonError(String),
    /// Indicates an error related to file system operations, such as reading program files.
    #[error("File error: {0}")]
    FileError(String),
    /// Writing a report failed.
    #[error("Output error: {0}")]
    OutputError(String),
    /// No built-in program carries the requested name.
    #[error("Program '{0}' not found")]
    ProgramNotFound(String),
}

impl From<serde_json::Error> for TuringMachineError {
    fn from(error: serde_json::Error) -> Self {
        TuringMachineError::JsonError(error.to_string())
    }
}

impl From<std::io::Error> for TuringMachineError {
    fn from(error: std::io::Error) -> Self {
        TuringMachineError::OutputError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        let stay_json = serde_json::to_string(&Direction::Stay).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(stay_json, "\"Stay\"");

        let stay: Direction = serde_json::from_str(&stay_json).unwrap();
        assert_eq!(stay, Direction::Stay);
    }

    #[test]
    fn test_direction_codes_ignore_case() {
        assert_eq!(Direction::from_code('l'), Some(Direction::Left));
        assert_eq!(Direction::from_code('R'), Some(Direction::Right));
        assert_eq!(Direction::from_code('n'), Some(Direction::Stay));
        assert_eq!(Direction::from_code('S'), None);
        assert_eq!(Direction::Stay.code(), 'N');
    }

    #[test]
    fn test_state_normalization() {
        assert_eq!(State::new('b'), State::new('B'));
        assert_eq!(State::new('h'), Some(State::HALT));
        assert!(State::new('1').is_none());
        assert!(State::new('-').is_none());
    }

    #[test]
    fn test_symbol_parsing() {
        assert_eq!(Symbol::from_char('0'), Some(Symbol::Zero));
        assert_eq!(Symbol::from_char('1'), Some(Symbol::One));
        assert_eq!(Symbol::from_char('2'), None);
        assert_eq!(Symbol::One.to_string(), "1");
    }

    #[test]
    fn test_transition_code() {
        let transition = Transition {
            write: Symbol::One,
            direction: Direction::Left,
            next_state: State::HALT,
        };

        assert_eq!(transition.code(), "1LH");
    }

    #[test]
    fn test_raw_table_keeps_json_order() {
        let json = r#"{"1B": "1RH", "0A": "1RB", "0B": "1LA", "1A": "1LB"}"#;
        let table: RawTable = serde_json::from_str(json).unwrap();

        let inputs: Vec<&str> = table.iter().map(|(input, _)| input).collect();
        assert_eq!(inputs, vec!["1B", "0A", "0B", "1A"]);

        let back = serde_json::to_string(&table).unwrap();
        assert_eq!(back, r#"{"1B":"1RH","0A":"1RB","0B":"1LA","1A":"1LB"}"#);
    }

    #[test]
    fn test_raw_table_rejects_non_string_codes() {
        let result: Result<RawTable, _> = serde_json::from_str(r#"{"0A": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::TapeCorruption {
            expected: 999,
            actual: 1000,
            len: 1020,
        };

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Tape corruption"));
        assert!(error_msg.contains("999"));
    }
}
