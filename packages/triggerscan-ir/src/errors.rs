//! Error types for triggerscan-ir
//!
//! Provides unified error handling across the crate.

use thiserror::Error;

/// Main error type for triggerscan-ir operations
#[derive(Debug, Error)]
pub enum TriggerScanError {
    /// The program representation provider returned something unusable
    #[error("Provider error: {0}")]
    Provider(String),

    /// Analysis error (traversal, recognizer or extraction failure)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Parse error (condition text, signatures, literals)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report serialization error
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

impl TriggerScanError {
    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        TriggerScanError::Provider(msg.into())
    }

    /// Create an analysis error
    pub fn analysis(msg: impl Into<String>) -> Self {
        TriggerScanError::Analysis(msg.into())
    }

    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        TriggerScanError::Parse(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        TriggerScanError::Config(msg.into())
    }
}

/// Result type alias for triggerscan operations
pub type Result<T> = std::result::Result<T, TriggerScanError>;
