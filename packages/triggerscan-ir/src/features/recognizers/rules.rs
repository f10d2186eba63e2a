//! Generic rule shapes shared by the domain chains
//!
//! Concrete rules match on (declaring type, method name) pairs plus
//! lightweight structural checks: argument is a literal constant, receiver
//! already carries a given tag. Three shapes cover the domains:
//!
//! - `SourceRule` attaches a provenance tag at a source call,
//! - `ComponentRule` attaches a finer sub-tag when a field/component is read
//!   off an already-tagged value, pushing it back onto the receiver's
//!   reaching definitions as well,
//! - `ComparisonSinkRule` raises the terminal suspicious classification at
//!   comparison-like calls,
//! - `CrossArgumentSinkRule` additionally propagates suspicion across
//!   sibling arguments of one call when any one of them is tagged.

use crate::errors::Result;

use super::chain::{Recognizer, RecognizerCtx};
use crate::shared::models::Tag;

/// Attaches a provenance tag at a source call
pub struct SourceRule {
    name: &'static str,
    declaring_type: &'static str,
    method: &'static str,
    tag: &'static str,
}

impl SourceRule {
    pub fn new(
        name: &'static str,
        declaring_type: &'static str,
        method: &'static str,
        tag: &'static str,
    ) -> Self {
        Self {
            name,
            declaring_type,
            method,
            tag,
        }
    }
}

impl Recognizer for SourceRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn recognize(&self, ctx: &mut RecognizerCtx<'_>) -> Result<bool> {
        if ctx.declaring_type() != self.declaring_type || ctx.method() != self.method {
            return Ok(false);
        }
        ctx.tag_result(Tag::new(self.tag));
        Ok(true)
    }
}

/// Attaches a sub-tag when a component is read off a tagged value
///
/// The sub-tag lands on the call result and is pushed back onto the
/// receiver's reaching definitions, so the producing value also records
/// which component was observed.
pub struct ComponentRule {
    name: &'static str,
    declaring_type: &'static str,
    method: &'static str,
    requires_root: &'static str,
    segment: &'static str,
}

impl ComponentRule {
    pub fn new(
        name: &'static str,
        declaring_type: &'static str,
        method: &'static str,
        requires_root: &'static str,
        segment: &'static str,
    ) -> Self {
        Self {
            name,
            declaring_type,
            method,
            requires_root,
            segment,
        }
    }
}

impl Recognizer for ComponentRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn recognize(&self, ctx: &mut RecognizerCtx<'_>) -> Result<bool> {
        if ctx.declaring_type() != self.declaring_type || ctx.method() != self.method {
            return Ok(false);
        }
        if !ctx.receiver_has_root(self.requires_root) {
            return Ok(false);
        }
        let tag = Tag::new(self.requires_root).child(self.segment);
        ctx.tag_result(tag.clone());
        ctx.tag_receiver(&tag);
        Ok(true)
    }
}

/// Raises the terminal suspicious classification at comparison-like calls
///
/// Fires when the receiver carries a tag under any of the sensitive roots
/// and the first argument is a literal constant or itself tagged.
pub struct ComparisonSinkRule {
    name: &'static str,
    declaring_type: Option<&'static str>,
    methods: &'static [&'static str],
    roots: &'static [&'static str],
}

impl ComparisonSinkRule {
    pub fn new(
        name: &'static str,
        declaring_type: Option<&'static str>,
        methods: &'static [&'static str],
        roots: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            declaring_type,
            methods,
            roots,
        }
    }
}

impl Recognizer for ComparisonSinkRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn recognize(&self, ctx: &mut RecognizerCtx<'_>) -> Result<bool> {
        if let Some(ty) = self.declaring_type {
            if ctx.declaring_type() != ty {
                return Ok(false);
            }
        }
        if !self.methods.contains(&ctx.method()) {
            return Ok(false);
        }
        if !self.roots.iter().any(|root| ctx.receiver_has_root(root)) {
            return Ok(false);
        }
        if !ctx.call.args.is_empty() && !ctx.arg_is_literal_or_tagged(0) {
            return Ok(false);
        }
        ctx.suspect_receiver();
        ctx.suspect_result();
        Ok(true)
    }
}

/// Cross-argument taint join for multi-argument sinks
///
/// When any argument of the call carries a tag under `root`, the reaching
/// definitions of every sibling argument are marked suspicious too.
pub struct CrossArgumentSinkRule {
    name: &'static str,
    declaring_type: &'static str,
    method: &'static str,
    root: &'static str,
}

impl CrossArgumentSinkRule {
    pub fn new(
        name: &'static str,
        declaring_type: &'static str,
        method: &'static str,
        root: &'static str,
    ) -> Self {
        Self {
            name,
            declaring_type,
            method,
            root,
        }
    }
}

impl Recognizer for CrossArgumentSinkRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn recognize(&self, ctx: &mut RecognizerCtx<'_>) -> Result<bool> {
        if ctx.declaring_type() != self.declaring_type || ctx.method() != self.method {
            return Ok(false);
        }
        if ctx.tagged_arg(self.root).is_none() {
            return Ok(false);
        }
        for index in 0..ctx.arg_keys.len() {
            ctx.suspect_arg(index);
        }
        ctx.suspect_result();
        Ok(true)
    }
}
