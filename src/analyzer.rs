//! This module validates raw transition tables and turns them into `TransitionTable`s.
//!
//! Validation is a single pass over the raw entries. Each entry is checked for its
//! shape, symbols, state letters and move code, and the first failure aborts the pass.
//! Whole-table rules (halt reference, complete symbol pairs, defined targets) are
//! checked afterwards, in that order.

use crate::config::HaltRule;
use crate::types::{Direction, RawTable, State, Symbol, Transition, TuringMachineError};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Which side of a raw entry a problem was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The input code, read symbol followed by the current state.
    Left,
    /// The output code, write symbol, move and next state.
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "Left"),
            Side::Right => write!(f, "Right"),
        }
    }
}

/// Whether an invalid symbol was found where the machine reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Read => write!(f, "reading"),
            Access::Write => write!(f, "writing"),
        }
    }
}

/// Represents the ways a raw transition table can fail validation.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum AnalysisError {
    /// An input code is not two characters long, or an output code not three.
    #[error("{side} side of the instructions block must have a length of {expected}, got {code:?}")]
    MalformedEntry {
        side: Side,
        expected: usize,
        code: String,
    },
    /// A read or write symbol is neither `0` nor `1`.
    #[error("Only use the numbers 0 and 1 for {access}, got {symbol:?} in \"{entry}\"")]
    InvalidSymbol {
        access: Access,
        symbol: char,
        entry: String,
    },
    /// A state is not a letter, or the halt state is given transitions of its own.
    #[error("States must be letters and H cannot have instructions, got {label:?} in \"{entry}\"")]
    InvalidState { label: char, entry: String },
    /// A move code is not one of `L`, `R` or `N`.
    #[error("Only use the letters L, R or N for movements, got {code:?} in \"{entry}\"")]
    InvalidMove { code: char, entry: String },
    /// The number of transitions into `H` does not satisfy the halt rule.
    #[error("The instructions must contain one and only one halt state, found {0} halting transitions")]
    MissingOrDuplicateHalt(usize),
    /// A state lacks its transition for one of the symbols, or defines one twice.
    #[error("The instructions must come in symbol pairs for each state, state {0} does not")]
    IncompleteStatePair(State),
    /// A transition targets a state that has no instructions.
    #[error("The state {0} on the right side of the instructions block does not exist on the left side")]
    UndefinedStateReference(State),
}

/// A validated transition table.
///
/// Every state has exactly one transition per symbol and every target is either
/// defined or the halt state. The table can only be built through [`analyze`] and
/// is never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    initial_state: State,
    states: Vec<State>,
    rules: HashMap<State, [Transition; 2]>,
}

impl TransitionTable {
    /// The first state defined in the raw table.
    pub fn initial_state(&self) -> State {
        self.initial_state
    }

    /// All defined states, in the order they first appeared.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Returns the transition for `state` reading `symbol`, or `None` for the halt state.
    pub fn get(&self, state: State, symbol: Symbol) -> Option<&Transition> {
        self.rules.get(&state).map(|pair| &pair[slot(symbol)])
    }

    /// Number of defined (non-halt) states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of transitions pointing at the halt state.
    pub fn halt_count(&self) -> usize {
        self.rules
            .values()
            .flatten()
            .filter(|transition| transition.next_state.is_halt())
            .count()
    }

    /// Canonical raw form: states in definition order, symbol `0` before `1`, uppercase codes.
    pub fn to_raw(&self) -> RawTable {
        self.states
            .iter()
            .flat_map(|state| {
                let pair = &self.rules[state];
                [Symbol::Zero, Symbol::One]
                    .into_iter()
                    .map(move |symbol| (format!("{}{}", symbol, state), pair[slot(symbol)].code()))
            })
            .collect()
    }
}

fn slot(symbol: Symbol) -> usize {
    match symbol {
        Symbol::Zero => 0,
        Symbol::One => 1,
    }
}

/// Validates a raw table and builds the `TransitionTable` the machine runs on.
///
/// # Arguments
///
/// * `raw` - The table as supplied by the caller.
/// * `halt_rule` - How transitions into the halt state are counted.
///
/// # Returns
///
/// * `Ok(TransitionTable)` if every check passes.
/// * `Err(TuringMachineError::Validation)` carrying the first failure found.
pub fn analyze(raw: &RawTable, halt_rule: HaltRule) -> Result<TransitionTable, TuringMachineError> {
    build_table(raw, halt_rule).map_err(|error| {
        tracing::warn!(%error, "transition table rejected");
        error.into()
    })
}

fn build_table(raw: &RawTable, halt_rule: HaltRule) -> Result<TransitionTable, AnalysisError> {
    let mut states: Vec<State> = Vec::new();
    let mut counts: HashMap<State, [usize; 2]> = HashMap::new();
    let mut pairs: HashMap<State, [Option<Transition>; 2]> = HashMap::new();
    let mut targets: Vec<State> = Vec::new();
    let mut halts = 0;

    for (input, output) in raw.iter() {
        let (state, read, transition) = parse_entry(input, output)?;

        if transition.next_state.is_halt() {
            halts += 1;
        } else {
            targets.push(transition.next_state);
        }

        if !counts.contains_key(&state) {
            states.push(state);
        }
        counts.entry(state).or_default()[slot(read)] += 1;
        pairs.entry(state).or_default()[slot(read)] = Some(transition);
    }

    check_halt(halts, halt_rule)?;
    check_state_pairs(&states, &counts)?;
    check_undefined_states(&states, &targets)?;

    let rules = pairs
        .into_iter()
        .filter_map(|(state, pair)| match pair {
            [Some(zero), Some(one)] => Some((state, [zero, one])),
            _ => None,
        })
        .collect();

    tracing::debug!(states = states.len(), halts, "transition table validated");

    Ok(TransitionTable {
        initial_state: states[0],
        states,
        rules,
    })
}

/// Checks the shape and contents of a single raw entry.
///
/// # Returns
///
/// * `Ok((state, read, transition))` for a well-formed entry.
/// * `Err(AnalysisError)` describing the first problem, checked in the order
///   length, read symbol, write symbol, move code, state letters.
fn parse_entry(input: &str, output: &str) -> Result<(State, Symbol, Transition), AnalysisError> {
    let entry = || format!("{}: {}", input, output);
    let input_chars: Vec<char> = input.chars().collect();
    let output_chars: Vec<char> = output.chars().collect();

    let &[read, state] = input_chars.as_slice() else {
        return Err(AnalysisError::MalformedEntry {
            side: Side::Left,
            expected: 2,
            code: input.to_string(),
        });
    };

    let &[write, direction, next_state] = output_chars.as_slice() else {
        return Err(AnalysisError::MalformedEntry {
            side: Side::Right,
            expected: 3,
            code: output.to_string(),
        });
    };

    let read = Symbol::from_char(read).ok_or_else(|| AnalysisError::InvalidSymbol {
        access: Access::Read,
        symbol: read,
        entry: entry(),
    })?;

    let write = Symbol::from_char(write).ok_or_else(|| AnalysisError::InvalidSymbol {
        access: Access::Write,
        symbol: write,
        entry: entry(),
    })?;

    let direction = Direction::from_code(direction).ok_or_else(|| AnalysisError::InvalidMove {
        code: direction,
        entry: entry(),
    })?;

    let invalid_state = |label| AnalysisError::InvalidState {
        label,
        entry: entry(),
    };
    let current = State::new(state)
        .filter(|current| !current.is_halt())
        .ok_or_else(|| invalid_state(state))?;
    let next = State::new(next_state).ok_or_else(|| invalid_state(next_state))?;

    Ok((
        current,
        read,
        Transition {
            write,
            direction,
            next_state: next,
        },
    ))
}

/// Checks the number of halting transitions against the configured rule.
fn check_halt(halts: usize, rule: HaltRule) -> Result<(), AnalysisError> {
    if !rule.accepts(halts) {
        return Err(AnalysisError::MissingOrDuplicateHalt(halts));
    }

    Ok(())
}

/// Checks that every state has exactly one transition for `0` and one for `1`.
///
/// States are visited in definition order so the reported state is deterministic.
fn check_state_pairs(
    states: &[State],
    counts: &HashMap<State, [usize; 2]>,
) -> Result<(), AnalysisError> {
    match states.iter().find(|state| counts[*state] != [1, 1]) {
        Some(state) => Err(AnalysisError::IncompleteStatePair(*state)),
        None => Ok(()),
    }
}

/// Checks that all non-halt targets are defined on the left-hand side.
fn check_undefined_states(states: &[State], targets: &[State]) -> Result<(), AnalysisError> {
    let defined: HashSet<&State> = states.iter().collect();

    match targets.iter().find(|target| !defined.contains(target)) {
        Some(target) => Err(AnalysisError::UndefinedStateReference(*target)),
        None => Ok(()),
    }
}
