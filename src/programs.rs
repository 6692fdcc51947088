use crate::analyzer::analyze;
use crate::config::HaltRule;
use crate::loader::ProgramLoader;
use crate::types::{RawTable, TuringMachineError};

// Default embedded programs
const PROGRAM_TEXTS: [(&str, &str); 3] = [
    (
        "busy-beaver-2",
        include_str!("../programs/busy-beaver-2.json"),
    ),
    (
        "busy-beaver-3",
        include_str!("../programs/busy-beaver-3.json"),
    ),
    (
        "busy-beaver-4",
        include_str!("../programs/busy-beaver-4.json"),
    ),
];

/// The program that runs when no table is supplied.
pub const DEMO_PROGRAM: &str = "busy-beaver-4";

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<Program> = load();
}

/// A named, embedded transition table.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: String,
    pub table: RawTable,
}

fn load() -> Vec<Program> {
    PROGRAM_TEXTS
        .iter()
        .filter_map(
            |&(name, text)| match ProgramLoader::load_program_from_string(text) {
                Ok(table) => Some(Program {
                    name: name.to_string(),
                    table,
                }),
                Err(error) => {
                    tracing::error!(name, %error, "failed to parse embedded program");
                    None
                }
            },
        )
        .collect()
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, TuringMachineError> {
        PROGRAMS
            .get(index)
            .cloned()
            .ok_or_else(|| TuringMachineError::ProgramNotFound(format!("#{}", index)))
    }

    /// Get a program by its name
    pub fn get_program_by_name(name: &str) -> Result<Program, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|program| program.name == name)
            .cloned()
            .ok_or_else(|| TuringMachineError::ProgramNotFound(name.to_string()))
    }

    /// The program run when the caller supplies no table.
    pub fn demo() -> Result<Program, TuringMachineError> {
        Self::get_program_by_name(DEMO_PROGRAM)
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS
            .iter()
            .map(|program| program.name.clone())
            .collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let program = Self::get_program_by_index(index)?;
        let table = analyze(&program.table, HaltRule::default())?;

        Ok(ProgramInfo {
            index,
            name: program.name,
            initial_state: table.initial_state().to_string(),
            state_count: table.state_count(),
            transition_count: program.table.len(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub initial_state: String,
    pub state_count: usize,
    pub transition_count: usize,
}
