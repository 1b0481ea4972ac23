//! Driving the generator under audit as a subprocess.
//!
//! The generator is an opaque collaborator: this module launches it,
//! streams its standard output incrementally, drains its standard error
//! into a bounded diagnostics buffer, and reports its exit status. No
//! part of the output is ever held in memory as a whole.

mod command;
mod process;

pub use command::GeneratorCommand;
pub use process::{DriverError, GeneratorExit, GeneratorProcess};
