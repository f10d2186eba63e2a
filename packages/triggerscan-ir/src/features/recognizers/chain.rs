//! Recognizer protocol and chain evaluation
//!
//! A chain is an ordered list of rules evaluated by first-match fold. A rule
//! either handles the call (tagging values or raising the terminal
//! suspicious classification through the context) or defers to the next
//! rule; an exhausted chain reports unhandled.

use std::collections::BTreeSet;

use crate::errors::Result;
use crate::features::symbolic::SymbolicStore;
use crate::shared::models::signature;
use crate::shared::models::{CallExpr, Literal, StmtId, Tag};

/// Mutable view of one call site handed to recognizers
///
/// Receiver and arguments are resolved to value-key groups (the reaching
/// definitions of the respective operands); mutation goes through the
/// session's symbolic store so tag growth stays monotone.
pub struct RecognizerCtx<'a> {
    /// Callee signature under consideration (oracle-resolved)
    pub signature: &'a str,
    /// The call expression as written
    pub call: &'a CallExpr,
    /// Value key of the call's result
    pub result: StmtId,
    /// Reaching-definition keys of the receiver
    pub receiver_keys: &'a [StmtId],
    /// Reaching-definition keys per ordered argument
    pub arg_keys: &'a [Vec<StmtId>],
    /// Session symbolic store
    pub store: &'a mut SymbolicStore,
    raised: bool,
}

impl<'a> RecognizerCtx<'a> {
    pub fn new(
        signature: &'a str,
        call: &'a CallExpr,
        result: StmtId,
        receiver_keys: &'a [StmtId],
        arg_keys: &'a [Vec<StmtId>],
        store: &'a mut SymbolicStore,
    ) -> Self {
        Self {
            signature,
            call,
            result,
            receiver_keys,
            arg_keys,
            store,
            raised: false,
        }
    }

    pub fn declaring_type(&self) -> &str {
        signature::declaring_type(self.signature)
    }

    pub fn method(&self) -> &str {
        signature::method_name(self.signature)
    }

    pub fn receiver_has_root(&self, root: &str) -> bool {
        self.store.any_has_root(self.receiver_keys, root)
    }

    pub fn arg_has_root(&self, index: usize, root: &str) -> bool {
        self.arg_keys
            .get(index)
            .map_or(false, |keys| self.store.any_has_root(keys, root))
    }

    /// Index of the first argument carrying a tag under `root`
    pub fn tagged_arg(&self, root: &str) -> Option<usize> {
        (0..self.arg_keys.len()).find(|i| self.arg_has_root(*i, root))
    }

    pub fn literal_arg(&self, index: usize) -> Option<&Literal> {
        self.call.args.get(index).and_then(|op| op.as_const())
    }

    /// Whether an argument is a literal constant or carries any tag
    pub fn arg_is_literal_or_tagged(&self, index: usize) -> bool {
        if self.literal_arg(index).is_some() {
            return true;
        }
        self.arg_keys
            .get(index)
            .map_or(false, |keys| !self.store.tags_of(keys).is_empty())
    }

    /// Merged tags of one argument's reaching definitions
    pub fn arg_tags(&self, index: usize) -> BTreeSet<Tag> {
        self.arg_keys
            .get(index)
            .map(|keys| self.store.tags_of(keys))
            .unwrap_or_default()
    }

    pub fn tag_result(&mut self, tag: Tag) {
        self.store.add_tag(self.result, tag);
    }

    pub fn tag_receiver(&mut self, tag: &Tag) {
        self.store.add_tag_all(self.receiver_keys, tag);
    }

    pub fn tag_arg(&mut self, index: usize, tag: &Tag) {
        if let Some(keys) = self.arg_keys.get(index) {
            let keys = keys.clone();
            self.store.add_tag_all(&keys, tag);
        }
    }

    /// Raise the terminal classification on the call result
    pub fn suspect_result(&mut self) {
        self.store.mark_suspicious(self.result);
        self.raised = true;
    }

    /// Raise the terminal classification on the receiver's definitions
    pub fn suspect_receiver(&mut self) {
        let keys = self.receiver_keys.to_vec();
        self.store.mark_all_suspicious(&keys);
        self.raised = true;
    }

    /// Raise the terminal classification on one argument's definitions
    pub fn suspect_arg(&mut self, index: usize) {
        if let Some(keys) = self.arg_keys.get(index) {
            let keys = keys.clone();
            self.store.mark_all_suspicious(&keys);
            self.raised = true;
        }
    }

    /// Whether any rule raised the terminal classification at this site
    pub fn raised_suspicion(&self) -> bool {
        self.raised
    }
}

/// One rule in a chain
pub trait Recognizer {
    fn name(&self) -> &'static str;

    /// Apply the rule. `Ok(true)` = handled, stop the chain;
    /// `Ok(false)` = not this rule's call, try the next one.
    fn recognize(&self, ctx: &mut RecognizerCtx<'_>) -> Result<bool>;
}

/// Ordered rule set for one value domain
pub struct RecognizerChain {
    name: &'static str,
    rules: Vec<Box<dyn Recognizer>>,
}

impl RecognizerChain {
    pub fn new(name: &'static str, rules: Vec<Box<dyn Recognizer>>) -> Self {
        Self { name, rules }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// First-match fold over the rules. Reports unhandled when no rule
    /// matches.
    pub fn run(&self, ctx: &mut RecognizerCtx<'_>) -> Result<bool> {
        for rule in &self.rules {
            if rule.recognize(ctx)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl std::fmt::Debug for RecognizerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognizerChain")
            .field("name", &self.name)
            .field("rules", &self.rules.len())
            .finish()
    }
}
