//! Numeric-result domain rules
//!
//! Arithmetic on tagged values keeps the provenance alive (tags copy through
//! `java.lang.Math` calls); boxed-number comparisons against a `#now`-tagged
//! receiver are sinks.

use super::chain::{Recognizer, RecognizerChain, RecognizerCtx};
use super::rules::ComparisonSinkRule;
use crate::errors::Result;
use crate::shared::models::tag::TAG_NOW;

const MATH: &str = "java.lang.Math";

/// Copies argument tags onto the result of arithmetic helper calls
struct ArithmeticPropagation;

impl Recognizer for ArithmeticPropagation {
    fn name(&self) -> &'static str {
        "math-propagation"
    }

    fn recognize(&self, ctx: &mut RecognizerCtx<'_>) -> Result<bool> {
        if ctx.declaring_type() != MATH {
            return Ok(false);
        }
        let mut tags = Vec::new();
        for index in 0..ctx.arg_keys.len() {
            tags.extend(ctx.arg_tags(index));
        }
        if tags.is_empty() {
            return Ok(false);
        }
        for tag in tags {
            ctx.tag_result(tag);
        }
        Ok(true)
    }
}

pub fn chain() -> RecognizerChain {
    RecognizerChain::new(
        "numeric",
        vec![
            Box::new(ArithmeticPropagation),
            Box::new(ComparisonSinkRule::new(
                "long-comparison",
                Some("java.lang.Long"),
                &["compareTo", "equals"],
                &[TAG_NOW],
            )),
            Box::new(ComparisonSinkRule::new(
                "integer-comparison",
                Some("java.lang.Integer"),
                &["compareTo", "equals"],
                &[TAG_NOW],
            )),
        ],
    )
}
