//! Cycle-safe, direction-parameterized ICFG traversal engine

pub mod color;
pub mod engine;

pub use color::NodeColor;
pub use engine::{
    Backward, Forward, IcfgTraversal, NullVisitor, TraversalDirection, TraversalVisitor,
};
