//! Per-variable reaching-definition histories
//!
//! `ContextualValues` remembers, for every variable, which symbolic values
//! each definition site contributed. A rule that discovers a tag at a *use*
//! site (say, "this argument is a coordinate") retrieves the most recent
//! coherent group for the variable and pushes the tag back onto the values
//! that produced it, letting tags flow against the direction of computation
//! where needed.

use rustc_hash::FxHashMap;

use crate::shared::models::{StmtId, VarId};

/// Reaching-definition history per variable
///
/// Each definition event contributes one group of value keys; the group's
/// first key is the defining statement itself.
#[derive(Debug, Clone, Default)]
pub struct ContextualValues {
    history: FxHashMap<VarId, Vec<Vec<StmtId>>>,
}

impl ContextualValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a definition of `var` contributing `values`
    pub fn record(&mut self, var: VarId, values: Vec<StmtId>) {
        self.history.entry(var).or_default().push(values);
    }

    /// Most recent coherent group of value keys for a variable.
    /// Empty when the variable has no recorded definition.
    pub fn latest_coherent(&self, var: VarId) -> &[StmtId] {
        self.history
            .get(&var)
            .and_then(|groups| groups.last())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
