use busybeaver::{
    analyze, encode, parse, AnalysisError, DisplayOptions, Growth, HaltRule, MachineConfig,
    Outcome, RawTable, Reporter, State, Symbol, Tape, TuringMachine, TuringMachineError,
};
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::HashMap;

const LABELS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];
const MOVES: [char; 3] = ['L', 'R', 'N'];

prop_compose! {
    /// A valid table over 1 to 5 states. Its last entry always halts; any other
    /// entry may halt too.
    fn arb_table()(states in 1usize..=5)(
        codes in prop::collection::vec((0u8..2, 0usize..3, 0usize..=states), states * 2),
        states in Just(states),
    ) -> RawTable {
        let last = codes.len() - 1;
        codes
            .iter()
            .enumerate()
            .map(|(i, &(write, direction, next))| {
                let next = if i == last || next == states { 'H' } else { LABELS[next] };
                (
                    format!("{}{}", i % 2, LABELS[i / 2]),
                    format!("{}{}{}", write, MOVES[direction], next),
                )
            })
            .collect()
    }
}

fn symbol(bit: bool) -> Symbol {
    if bit {
        Symbol::One
    } else {
        Symbol::Zero
    }
}

fn run_to_string(raw: &RawTable, config: MachineConfig) -> (Outcome, String) {
    let mut machine = TuringMachine::from_raw(raw, config).unwrap();
    let mut reporter = Reporter::new(Vec::new(), DisplayOptions::default());
    let outcome = machine.run(&mut reporter).unwrap();
    (outcome, String::from_utf8(reporter.into_inner()).unwrap())
}

proptest! {
    #[test]
    fn tape_growth_preserves_cells(
        bits in prop::collection::vec(any::<bool>(), 1..40),
        chunk in 1usize..16,
        left in any::<bool>(),
    ) {
        let cells: Vec<Symbol> = bits.iter().copied().map(symbol).collect();
        let head = if left { 0 } else { cells.len() - 1 };
        let mut tape = Tape::with_cells(cells.clone(), head, chunk).unwrap();

        let growth = if left { tape.move_left() } else { tape.move_right() }.unwrap();
        prop_assert_eq!(growth, Some(if left { Growth::Left } else { Growth::Right }));
        prop_assert_eq!(tape.len(), cells.len() + chunk);

        let offset = if left { chunk } else { 0 };
        prop_assert_eq!(&tape.cells()[offset..offset + cells.len()], &cells[..]);
        prop_assert!(tape.cells()[..offset].iter().all(|&cell| cell == Symbol::Zero));
        prop_assert!(tape.cells()[offset + cells.len()..].iter().all(|&cell| cell == Symbol::Zero));

        let back = if left { tape.move_right() } else { tape.move_left() };
        prop_assert_eq!(back.unwrap(), None);
        prop_assert_eq!(tape.read(), cells[head]);
    }

    #[test]
    fn tape_matches_unbounded_model(
        ops in prop::collection::vec((any::<bool>(), 0usize..3), 0..200),
        length in 1usize..6,
        chunk in 1usize..6,
    ) {
        let mut tape = Tape::new(length, chunk).unwrap();
        let mut model: HashMap<i64, Symbol> = HashMap::new();
        let mut position: i64 = 0;

        for (bit, direction) in ops {
            tape.write(symbol(bit));
            model.insert(position, symbol(bit));

            match MOVES[direction] {
                'L' => {
                    tape.move_left().unwrap();
                    position -= 1;
                }
                'R' => {
                    tape.move_right().unwrap();
                    position += 1;
                }
                _ => {}
            }

            prop_assert!(tape.head() < tape.len());
            prop_assert_eq!(tape.read(), model.get(&position).copied().unwrap_or_default());
        }

        prop_assert_eq!(tape.count(Symbol::One), model.values().filter(|&&s| s == Symbol::One).count());
    }

    #[test]
    fn validation_is_idempotent(raw in arb_table()) {
        let table = analyze(&raw, HaltRule::AtLeastOne).unwrap();

        let again = analyze(&table.to_raw(), HaltRule::AtLeastOne).unwrap();
        prop_assert_eq!(&again, &table);

        let notation = encode(&table).unwrap();
        prop_assert_eq!(parse(&notation, HaltRule::AtLeastOne).unwrap(), table);
    }

    #[test]
    fn missing_symbol_is_an_incomplete_pair(raw in arb_table(), pick in any::<Index>()) {
        let entries = raw.entries();
        // The last entry is kept so the table still halts.
        let dropped = pick.index(entries.len() - 1);
        let partial: RawTable = entries
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != dropped)
            .map(|(_, entry)| entry.clone())
            .collect();

        let label = entries[dropped].0.chars().nth(1).unwrap();
        prop_assert_eq!(
            analyze(&partial, HaltRule::AtLeastOne),
            Err(TuringMachineError::Validation(AnalysisError::IncompleteStatePair(
                State::new(label).unwrap()
            )))
        );
    }

    #[test]
    fn unknown_target_is_undefined(raw in arb_table(), pick in any::<Index>()) {
        let entries = raw.entries();
        let changed = pick.index(entries.len() - 1);
        let broken: RawTable = entries
            .iter()
            .enumerate()
            .map(|(i, (input, output))| {
                if i == changed {
                    (input.clone(), format!("{}Z", &output[..2]))
                } else {
                    (input.clone(), output.clone())
                }
            })
            .collect();

        prop_assert_eq!(
            analyze(&broken, HaltRule::AtLeastOne),
            Err(TuringMachineError::Validation(AnalysisError::UndefinedStateReference(
                State::new('Z').unwrap()
            )))
        );
    }

    #[test]
    fn runs_are_deterministic(raw in arb_table()) {
        let config = MachineConfig {
            initial_tape_length: 4,
            growth_chunk: 3,
            halt_rule: HaltRule::AtLeastOne,
            step_limit: Some(300),
        };

        let (first_outcome, first_out) = run_to_string(&raw, config.clone());
        let (second_outcome, second_out) = run_to_string(&raw, config);

        prop_assert_eq!(first_outcome, second_outcome);
        prop_assert_eq!(first_out, second_out);

        if let Outcome::Halted(stats) = first_outcome {
            prop_assert!(stats.steps <= 300);
            prop_assert_eq!(stats.ones + stats.zeroes, stats.tape_length);
        }
    }
}

#[test]
fn short_left_code_is_rejected_before_running() {
    let raw: RawTable = [("0", "1RH")].into_iter().collect();

    let result = TuringMachine::from_raw(&raw, MachineConfig::default());
    assert!(matches!(
        result,
        Err(TuringMachineError::Validation(AnalysisError::MalformedEntry { .. }))
    ));
}
