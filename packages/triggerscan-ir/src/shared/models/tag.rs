//! Hierarchical provenance tags
//!
//! A tag labels one symbolic value with the semantic origin of its data:
//! `#now` for wall-clock time, `#here/#latitude` for the latitude component
//! of a device position, `#sms/#body` for SMS message content. Tags form a
//! hierarchy through `/`-joined segments; `#now/#seconds` is a descendant of
//! `#now`. The terminal `#Suspicious` classification is kept separate on the
//! symbolic value itself, not modeled as a tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Segment separator inside a hierarchical tag
const TAG_SEPARATOR: char = '/';

/// Wall-clock / current-time provenance
pub const TAG_NOW: &str = "#now";
/// Device-position provenance
pub const TAG_HERE: &str = "#here";
/// SMS-content provenance
pub const TAG_SMS: &str = "#sms";

/// One hierarchical provenance tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Create a tag from its full path, e.g. `#now` or `#now/#seconds`
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Derive a child tag: `Tag::new("#now").child("#seconds")` ->
    /// `#now/#seconds`
    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{}{}{}", self.0, TAG_SEPARATOR, segment))
    }

    /// Root segment of the hierarchy (`#now/#seconds` -> `#now`)
    pub fn root(&self) -> &str {
        self.0.split(TAG_SEPARATOR).next().unwrap_or(&self.0)
    }

    /// Whether this tag sits at or below `ancestor` in the hierarchy
    pub fn is_descendant_of(&self, ancestor: &Tag) -> bool {
        self.0 == ancestor.0
            || (self.0.starts_with(&ancestor.0)
                && self.0[ancestor.0.len()..].starts_with(TAG_SEPARATOR))
    }

    /// Full tag path
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(path: &str) -> Self {
        Tag::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_builds_hierarchy() {
        let now = Tag::new(TAG_NOW);
        assert_eq!(now.child("#seconds").as_str(), "#now/#seconds");
    }

    #[test]
    fn test_root() {
        assert_eq!(Tag::new("#here/#latitude").root(), "#here");
        assert_eq!(Tag::new("#sms").root(), "#sms");
    }

    #[test]
    fn test_descendant() {
        let here = Tag::new(TAG_HERE);
        assert!(Tag::new("#here/#latitude").is_descendant_of(&here));
        assert!(here.is_descendant_of(&here));
        // `#hereafter` shares the prefix but is not a descendant
        assert!(!Tag::new("#hereafter").is_descendant_of(&here));
        assert!(!Tag::new("#now").is_descendant_of(&here));
    }
}
