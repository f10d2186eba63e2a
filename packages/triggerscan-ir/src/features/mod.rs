//! Feature slices of the analysis engine

pub mod call_graph;
pub mod detection;
pub mod preconditions;
pub mod recognizers;
pub mod symbolic;
pub mod traversal;
