//! Boolean-result domain rules
//!
//! String-comparison-like calls whose receiver carries a sensitive tag and
//! whose argument is a literal or itself tagged raise the terminal
//! suspicious classification.

use super::chain::RecognizerChain;
use super::rules::ComparisonSinkRule;
use crate::shared::models::tag::{TAG_HERE, TAG_NOW, TAG_SMS};

const STRING: &str = "java.lang.String";

/// String comparison methods treated as sinks
const STRING_COMPARISONS: &[&str] = &[
    "equals",
    "equalsIgnoreCase",
    "contains",
    "startsWith",
    "endsWith",
    "matches",
];

pub fn chain() -> RecognizerChain {
    RecognizerChain::new(
        "boolean",
        vec![Box::new(ComparisonSinkRule::new(
            "string-comparison",
            Some(STRING),
            STRING_COMPARISONS,
            &[TAG_SMS, TAG_HERE, TAG_NOW],
        ))],
    )
}
