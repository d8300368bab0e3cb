//! Age-band record identifiers
//!
//! Records are keyed by a random v4 UUID, stored as its hyphenated text
//! form. Ids arrive from URL paths as raw strings; one that does not parse
//! cannot name a stored record, so callers treat `None` as "not found"
//! rather than as a malformed request.

use uuid::Uuid;

/// Fresh identifier for a new record
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Identifier named by a path segment, if it could name a record
pub fn parse(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
