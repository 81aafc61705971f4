//! Topic validation
//!
//! Topics are matched exactly. `*` and `>` are reserved for multi-level
//! matching, which is not implemented, so they are rejected like any other
//! illegal character.

use crate::{Error, Result};

/// Characters reserved for wildcard subscriptions (not yet supported)
pub const WILDCARDS: &str = "*>";

/// Check whether `c` is one of the reserved wildcard characters
pub fn is_wildcard(c: char) -> bool {
    WILDCARDS.contains(c)
}

fn is_valid_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_'
}

/// Validate a topic name
///
/// A topic must be non-empty and made only of ASCII letters, digits, `.` and
/// `_`. The first offending character is reported.
pub fn validate_topic(topic: &str) -> Result<()> {
    if topic.is_empty() {
        return Err(Error::EmptyTopic);
    }
    match topic.chars().find(|c| !is_valid_char(*c)) {
        Some(c) => Err(Error::InvalidTopicCharacter(c)),
        None => Ok(()),
    }
}
