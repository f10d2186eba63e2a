//! Shared models and ports

pub mod models;
pub mod ports;
