//! Symbolic values and the session-owned value store
//!
//! One `SymbolicValue` wraps one IR value, identified by the statement that
//! defined it. Its tag set only grows within a pass: a tag, once attached,
//! is never retracted by a later rule application. The terminal
//! `suspicious` classification is equally monotone.
//!
//! A value produced by a call additionally retains the call's receiver and
//! full ordered argument list (`CallShape`), so a rule can correlate
//! receiver and arguments jointly instead of seeing only the return value.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::shared::models::{StmtId, Tag};

/// Receiver and ordered arguments of a call, resolved to value keys
///
/// Each operand resolves to the keys of its reaching definitions; literal
/// operands resolve to an empty group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallShape {
    pub signature: String,
    pub receiver: Vec<StmtId>,
    pub args: Vec<Vec<StmtId>>,
}

/// One IR value with its provenance tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolicValue {
    tags: BTreeSet<Tag>,
    suspicious: bool,
    call: Option<CallShape>,
}

impl SymbolicValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a tag. Monotone; re-adding is a no-op.
    pub fn add_tag(&mut self, tag: Tag) -> bool {
        self.tags.insert(tag)
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// Whether any tag sits at or below the given hierarchy root
    pub fn has_root(&self, root: &str) -> bool {
        self.tags.iter().any(|t| t.root() == root)
    }

    /// Raise the terminal classification
    pub fn mark_suspicious(&mut self) {
        self.suspicious = true;
    }

    pub fn is_suspicious(&self) -> bool {
        self.suspicious
    }

    pub fn set_call(&mut self, call: CallShape) {
        self.call = Some(call);
    }

    pub fn call(&self) -> Option<&CallShape> {
        self.call.as_ref()
    }
}

/// All symbolic values of one analysis session, keyed by defining statement
///
/// An explicit store owned by the session and passed where needed, not
/// hidden shared state.
#[derive(Debug, Clone, Default)]
pub struct SymbolicStore {
    values: FxHashMap<StmtId, SymbolicValue>,
}

impl SymbolicStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, key: StmtId) -> Option<&SymbolicValue> {
        self.values.get(&key)
    }

    pub fn value_mut(&mut self, key: StmtId) -> &mut SymbolicValue {
        self.values.entry(key).or_default()
    }

    pub fn add_tag(&mut self, key: StmtId, tag: Tag) {
        self.value_mut(key).add_tag(tag);
    }

    /// Attach a tag to every value in a key group
    pub fn add_tag_all(&mut self, keys: &[StmtId], tag: &Tag) {
        for key in keys {
            self.value_mut(*key).add_tag(tag.clone());
        }
    }

    pub fn mark_suspicious(&mut self, key: StmtId) {
        self.value_mut(key).mark_suspicious();
    }

    pub fn mark_all_suspicious(&mut self, keys: &[StmtId]) {
        for key in keys {
            self.value_mut(*key).mark_suspicious();
        }
    }

    pub fn is_suspicious(&self, key: StmtId) -> bool {
        self.values.get(&key).map_or(false, |v| v.is_suspicious())
    }

    /// Merged tag set of a key group
    pub fn tags_of(&self, keys: &[StmtId]) -> BTreeSet<Tag> {
        let mut merged = BTreeSet::new();
        for key in keys {
            if let Some(value) = self.values.get(key) {
                merged.extend(value.tags().iter().cloned());
            }
        }
        merged
    }

    /// Whether any value in a key group carries a tag under `root`
    pub fn any_has_root(&self, keys: &[StmtId], root: &str) -> bool {
        keys.iter()
            .any(|k| self.values.get(k).map_or(false, |v| v.has_root(root)))
    }

    /// Tags of one value, including those visible through its call shape:
    /// a call-produced value exposes the tags of the call's receiver and
    /// arguments, so provenance survives a call no rule handles. One level
    /// deep; nested shapes are not chased.
    pub fn tags_through_call(&self, key: StmtId) -> BTreeSet<Tag> {
        let mut merged = BTreeSet::new();
        let Some(value) = self.values.get(&key) else {
            return merged;
        };
        merged.extend(value.tags().iter().cloned());
        if let Some(shape) = value.call() {
            merged.extend(self.tags_of(&shape.receiver));
            for group in &shape.args {
                merged.extend(self.tags_of(group));
            }
        }
        merged
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
