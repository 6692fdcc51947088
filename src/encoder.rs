//! This module provides encoding of validated tables into compact notation, the
//! single-line form read back by [`crate::parser::parse`].

use crate::analyzer::TransitionTable;
use crate::parser::state_label;
use crate::types::{State, Symbol};
use std::collections::HashMap;

/// Encodes a transition table into compact notation.
///
/// Format: one group per state in definition order, groups separated by `_`, each
/// group holding the transition for `0` followed by the one for `1`. States are
/// relabelled by position (`A`, `B`, ... skipping `H`) so that parsing the result
/// assigns every group its original state.
///
/// # Returns
///
/// * `Some(String)` - The encoded machine, e.g. `1RB1LB_1LA1RH`.
/// * `None` if the table has more states than there are letters to name them.
pub fn encode(table: &TransitionTable) -> Option<String> {
    let mapping = create_state_mapping(table)?;

    let groups: Vec<String> = table
        .states()
        .iter()
        .map(|&state| {
            [Symbol::Zero, Symbol::One]
                .into_iter()
                .filter_map(|symbol| table.get(state, symbol))
                .map(|transition| {
                    let next = mapping
                        .get(&transition.next_state)
                        .copied()
                        .unwrap_or(transition.next_state);
                    format!("{}{}{}", transition.write, transition.direction.code(), next)
                })
                .collect::<String>()
        })
        .collect();

    Some(groups.join("_"))
}

/// Maps every defined state to the label its position gives it. The halt state
/// keeps its own label.
fn create_state_mapping(table: &TransitionTable) -> Option<HashMap<State, State>> {
    table
        .states()
        .iter()
        .enumerate()
        .map(|(index, &state)| state_label(index).map(|label| (state, label)))
        .collect()
}
