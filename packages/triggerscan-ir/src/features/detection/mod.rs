//! Detection pipeline: call-graph build, trigger detection, reporting

pub mod builder;
pub mod detector;
pub mod finding;
pub mod report;
pub mod session;

pub use builder::CallGraphBuilder;
pub use detector::{PendingFinding, TriggerDetector};
pub use finding::{Finding, FindingSet};
pub use session::AnalysisSession;
