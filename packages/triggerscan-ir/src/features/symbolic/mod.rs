//! Symbolic value and tag propagation model

pub mod contextual;
pub mod value;

pub use contextual::ContextualValues;
pub use value::{CallShape, SymbolicStore, SymbolicValue};
