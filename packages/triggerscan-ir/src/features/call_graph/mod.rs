//! Call graph store: canonical, condition-annotated edges per snapshot

pub mod store;

pub use store::CallGraphStore;
