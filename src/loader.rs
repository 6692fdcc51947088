//! This module provides the `ProgramLoader` struct, responsible for loading raw transition
//! tables written as JSON from files, strings and readers such as stdin.

use crate::types::{RawTable, TuringMachineError, MAX_PROGRAM_SIZE};
use std::fs;
use std::io::Read;
use std::path::Path;

/// `ProgramLoader` is a utility struct for loading transition tables.
///
/// A table is a JSON object mapping input codes to output codes:
///
/// ```json
/// {"0A": "1RB", "1A": "1LB", "0B": "1LA", "1B": "1RH"}
/// ```
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a raw table from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(RawTable)` if the file is read and holds a JSON table.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read or is too large.
    /// * `Err(TuringMachineError::JsonError)` if the content is not a JSON table.
    pub fn load_program(path: &Path) -> Result<RawTable, TuringMachineError> {
        let file = fs::File::open(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_program_from_reader(file).map_err(|e| match e {
            TuringMachineError::FileError(msg) => {
                TuringMachineError::FileError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Loads a raw table from JSON held in a string.
    pub fn load_program_from_string(content: &str) -> Result<RawTable, TuringMachineError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Loads a raw table from JSON read out of `reader`, e.g. piped stdin.
    ///
    /// At most `MAX_PROGRAM_SIZE` bytes are accepted.
    pub fn load_program_from_reader<R: Read>(reader: R) -> Result<RawTable, TuringMachineError> {
        let mut content = String::new();
        reader
            .take(MAX_PROGRAM_SIZE as u64 + 1)
            .read_to_string(&mut content)
            .map_err(|e| TuringMachineError::FileError(format!("Failed to read input: {}", e)))?;

        if content.len() > MAX_PROGRAM_SIZE {
            return Err(TuringMachineError::FileError(format!(
                "Program exceeds the maximum size of {} bytes",
                MAX_PROGRAM_SIZE
            )));
        }

        Self::load_program_from_string(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_valid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bb2.json");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(br#"{"0A": "1RB", "1A": "1LB", "0B": "1LA", "1B": "1RH"}"#)
            .unwrap();

        let table = ProgramLoader::load_program(&file_path).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.entries()[0], ("0A".to_string(), "1RB".to_string()));
    }

    #[test]
    fn test_load_invalid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.json");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"This is not a valid program").unwrap();

        let result = ProgramLoader::load_program(&file_path);
        assert!(matches!(result, Err(TuringMachineError::JsonError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();

        let result = ProgramLoader::load_program(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_load_from_reader() {
        let input = br#"{"0A": "1NH", "1A": "1NH"}"#;

        let table = ProgramLoader::load_program_from_reader(&input[..]).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_oversized_input_is_rejected() {
        let input = format!(r#"{{"0A": "{}"}}"#, "1".repeat(MAX_PROGRAM_SIZE));

        let result = ProgramLoader::load_program_from_reader(input.as_bytes());
        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_json_array_is_rejected() {
        let result = ProgramLoader::load_program_from_string(r#"["0A", "1RB"]"#);
        assert!(matches!(result, Err(TuringMachineError::JsonError(_))));
    }
}
