//! # triggerscan-ir
//!
//! Static detection of trigger-gated behavior in compiled programs:
//! conditional logic that fires only at a certain time, place, or on a
//! certain incoming message. The engine walks the interprocedural
//! control-flow graph of an externally provided program representation,
//! propagates symbolic provenance tags (`#now`, `#here`, `#sms` and their
//! components) through assignments and recognized API calls, and reports
//! every sensitive comparison or guarded call together with the guard
//! conditions, the reach conditions and the caller chain that protect it.
//!
//! ## Architecture
//!
//! - `shared`: statement model, signatures, tags and the provider ports
//! - `features::traversal`: direction-parameterized three-color ICFG walker
//! - `features::call_graph`: per-snapshot call graph with condition-annotated
//!   edges and constructor expansion
//! - `features::symbolic`: symbolic values, tag sets and reaching-definition
//!   histories
//! - `features::recognizers`: per-domain rule chains over recognized APIs
//! - `features::preconditions`: guard extraction and structural dedup
//! - `features::detection`: the two-phase pass, findings and reports
//!
//! ## Usage
//!
//! ```
//! use triggerscan_ir::config::AnalysisConfig;
//! use triggerscan_ir::features::detection::AnalysisSession;
//! use triggerscan_ir::shared::models::ApiLevel;
//! use triggerscan_ir::shared::ports::{NullSourceLocator, SimpleProgram};
//!
//! let program = SimpleProgram::new();
//! let config = AnalysisConfig::for_api_level(ApiLevel(19));
//! let mut session = AnalysisSession::new(&program, &NullSourceLocator, config);
//! let findings = session.run().unwrap();
//! assert!(findings.is_empty());
//! ```

pub mod config;
pub mod errors;
pub mod features;
pub mod shared;

pub use config::AnalysisConfig;
pub use errors::{Result, TriggerScanError};
pub use features::detection::{AnalysisSession, Finding, FindingSet};
pub use shared::models::{ApiLevel, Tag};
pub use shared::ports::{ProgramProvider, SourceLocator};
