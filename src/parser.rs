//! This module provides the parser for machines written in compact notation, utilizing the
//! `pest` crate. The grammar lives in `grammar.pest`; a machine such as `1RB1LB_1LA1RH` is
//! turned into a `RawTable` and then validated like any other table.

use crate::{
    analyzer::{analyze, TransitionTable},
    config::HaltRule,
    types::{RawTable, State, Symbol, TuringMachineError},
};
use pest::{
    error::{Error, ErrorVariant},
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;

/// Transition code marking an undefined transition in other tools' notation.
const UNDEFINED_TRANSITION: &str = "---";

/// Derives a `PestParser` for the compact notation defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct MachineParser;

/// Parses and validates a machine written in compact notation.
///
/// # Arguments
///
/// * `input` - The machine, e.g. `1RB1LB_1LA1RH`.
/// * `halt_rule` - How transitions into the halt state are counted during validation.
///
/// # Returns
///
/// * `Ok(TransitionTable)` if the input is well formed and validates.
/// * `Err(TuringMachineError::ParseError)` if there are any syntax errors.
/// * `Err(TuringMachineError::Validation)` if the table fails validation.
pub fn parse(input: &str, halt_rule: HaltRule) -> Result<TransitionTable, TuringMachineError> {
    let raw = parse_raw(input)?;
    analyze(&raw, halt_rule)
}

/// Parses compact notation into an unvalidated `RawTable`.
///
/// The n-th group defines the n-th state letter (see [`state_label`]), reading `0`
/// first and `1` second.
pub fn parse_raw(input: &str) -> Result<RawTable, TuringMachineError> {
    let pairs = MachineParser::parse(Rule::machine, input.trim())
        .map_err(|e| TuringMachineError::ParseError(Box::new(e)))?;

    let groups = pairs
        .flat_map(|machine| machine.into_inner())
        .filter(|pair| pair.as_rule() == Rule::group);

    let mut raw = RawTable::new();
    for (index, group) in groups.enumerate() {
        let state = state_label(index)
            .ok_or_else(|| parse_error("Too many states for compact notation", group.as_span()))?;

        for (symbol, transition) in [Symbol::Zero, Symbol::One]
            .into_iter()
            .zip(group.into_inner())
        {
            if transition.as_str() == UNDEFINED_TRANSITION {
                return Err(parse_error(
                    "Undefined transitions are not supported, every state needs both symbols",
                    transition.as_span(),
                ));
            }

            raw.insert(format!("{}{}", symbol, state), transition.as_str());
        }
    }

    Ok(raw)
}

/// Returns the letter of the state defined by the group at `index`:
/// `A` to `Z` in order, skipping the halt state `H`.
pub fn state_label(index: usize) -> Option<State> {
    ('A'..='Z')
        .filter(|&label| label != State::HALT.label())
        .nth(index)
        .and_then(State::new)
}

/// Creates a `TuringMachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TuringMachineError {
    TuringMachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}
