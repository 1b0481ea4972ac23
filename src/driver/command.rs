//! Generator invocation templates.

use std::path::{Path, PathBuf};
use std::process::Command;

/// How to invoke the generator under audit.
///
/// The generator contract is `<program> <selector> <count-flag> <N>`:
/// produce N sample units from the symbol set named by the selector.
#[derive(Debug, Clone)]
pub struct GeneratorCommand {
    program: PathBuf,
    count_flag: String,
}

impl GeneratorCommand {
    /// Creates a command template for the given program with the default
    /// `-p` count flag.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            count_flag: "-p".to_string(),
        }
    }

    /// Overrides the flag used to pass the unit count.
    pub fn with_count_flag(mut self, flag: impl Into<String>) -> Self {
        self.count_flag = flag.into();
        self
    }

    /// Path of the generator executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    pub(crate) fn build(&self, selector: &str, units: u64) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(selector)
            .arg(&self.count_flag)
            .arg(units.to_string());
        command
    }
}
