//! Findings and the cross-pass dedup set

use std::collections::BTreeSet;

use serde::Serialize;

use crate::features::preconditions::{Precondition, PreconditionSet};
use crate::shared::models::{ApiLevel, Tag};

/// One deduplicated analysis result
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Platform snapshot the pass ran against
    pub api_level: ApiLevel,
    /// Procedure containing the flagged call
    pub procedure: String,
    /// Source line of the flagged call
    pub line: u32,
    /// Flagged callee signature
    pub callee: String,
    /// Provenance observed at the call site
    pub tags: BTreeSet<Tag>,
    /// Guards protecting the call on the traversed path
    pub precondition: Precondition,
    /// Conditions under which the containing procedure is ever reached
    pub reach_conditions: Vec<String>,
    /// Indented caller-chain trace
    pub call_stack: String,
    /// Original source text, when the locator found any
    pub source_text: Option<String>,
}

/// Findings deduplicated by structural precondition hash
///
/// Lives for the whole session, so logically identical findings from
/// re-analysis or from different API-level passes collapse to one.
#[derive(Debug, Default)]
pub struct FindingSet {
    findings: Vec<Finding>,
    seen: PreconditionSet,
}

impl FindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the finding was new
    pub fn insert(&mut self, finding: Finding) -> bool {
        if !self.seen.insert(&finding.precondition) {
            return false;
        }
        self.findings.push(finding);
        true
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::preconditions::PreconditionItem;

    fn finding(api_level: ApiLevel) -> Finding {
        Finding {
            api_level,
            procedure: "com.app.Main#check".to_string(),
            line: 5,
            callee: "com.app.Main#sink".to_string(),
            tags: BTreeSet::new(),
            precondition: Precondition {
                attribute: "seconds".to_string(),
                declaring_type: "com.app.Main".to_string(),
                declaring_class: "com.app.Main".to_string(),
                items: vec![PreconditionItem {
                    procedure: "com.app.Main#check".to_string(),
                    line: 4,
                    attribute: "seconds".to_string(),
                    operator: ">".to_string(),
                    value: "30".to_string(),
                    branch_taken: true,
                }],
            },
            reach_conditions: Vec::new(),
            call_stack: String::new(),
            source_text: None,
        }
    }

    #[test]
    fn test_identical_findings_across_api_levels_collapse() {
        let mut set = FindingSet::new();
        assert!(set.insert(finding(ApiLevel(19))));
        assert!(!set.insert(finding(ApiLevel(21))));
        assert_eq!(set.len(), 1);
    }
}
