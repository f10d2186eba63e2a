//! External collaborator ports

pub mod provider;

pub use provider::{NullSourceLocator, ProgramProvider, SimpleProgram, SourceLocator};
