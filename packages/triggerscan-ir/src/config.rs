//! Analysis configuration
//!
//! One `AnalysisConfig` is owned per analysis session. Traversal work is
//! unbounded unless `max_steps` sets an explicit budget.

use crate::errors::{Result, TriggerScanError};
use crate::shared::models::ApiLevel;

/// Namespaces treated as graph leaves: interprocedural propagation stops
/// at these boundaries instead of attempting unsupported analysis.
pub const DEFAULT_LIBRARY_PREFIXES: &[&str] =
    &["java.", "javax.", "android.", "dalvik.", "kotlin."];

/// Configuration for one analysis session
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Platform snapshots to analyze, one independent pass each
    pub api_levels: Vec<ApiLevel>,

    /// Optional budget on traversal steps (statements entered).
    /// `None` = unlimited.
    pub max_steps: Option<usize>,

    /// Namespace prefixes that stop interprocedural descent
    pub library_prefixes: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_levels: vec![ApiLevel(0)],
            max_steps: None,
            library_prefixes: DEFAULT_LIBRARY_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl AnalysisConfig {
    /// Create configuration for a single platform snapshot
    pub fn for_api_level(api_level: ApiLevel) -> Self {
        Self {
            api_levels: vec![api_level],
            ..Self::default()
        }
    }

    /// Set the traversal step budget
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Check whether a signature belongs to a library namespace
    pub fn is_library(&self, signature: &str) -> bool {
        self.library_prefixes
            .iter()
            .any(|p| signature.starts_with(p.as_str()))
    }

    /// Validate configuration before a run
    pub fn validate(&self) -> Result<()> {
        if self.api_levels.is_empty() {
            return Err(TriggerScanError::config("no API levels configured"));
        }
        if self.max_steps == Some(0) {
            return Err(TriggerScanError::config("max_steps must be non-zero"));
        }
        if self.library_prefixes.iter().any(|p| p.is_empty()) {
            return Err(TriggerScanError::config("empty library prefix"));
        }
        Ok(())
    }
}
