//! Room identifiers and void markers.
//!
//! Every maze cell holds a room id. Cells without a document hold a void
//! marker: the reserved prefix followed by an integer that increments in slot
//! order, so void identity is as deterministic as document placement.

/// Identifier of a room: a document id or a void marker.
pub type RoomId = String;

/// Reserved prefix for void markers. Document ids may not start with it.
pub const VOID_PREFIX: &str = "__void__:";

/// Builds the void marker for the `n`-th filler cell.
#[must_use]
pub fn void_marker(n: usize) -> RoomId {
    format!("{VOID_PREFIX}{n}")
}

/// Returns true if `id` is a void marker.
#[must_use]
pub fn is_void_room(id: &str) -> bool {
    id.strip_prefix(VOID_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_marker_roundtrip() {
        assert_eq!(void_marker(7), "__void__:7");
        assert!(is_void_room(&void_marker(0)));
        assert!(is_void_room("__void__:123"));
    }

    #[test]
    fn test_documents_are_not_void() {
        assert!(!is_void_room("a.md"));
        assert!(!is_void_room("__void__:"));
        assert!(!is_void_room("__void__:x1"));
        assert!(!is_void_room("notes/__void__:1"));
    }
}
