//! Composite key encoding.
//!
//! Segments are flattened, encoded one by one and joined with [`KEY_DELIMITER`].
//! Pure functions; no side effects.

use super::lexicographic::{decode_number, encode_number};
use super::segment::{KeySegment, Number};

/// Separator placed between encoded segments.
pub const KEY_DELIMITER: &str = "!!";

/// Encodes an ordered list of segments into a single key string.
///
/// Nested lists are flattened in place rather than joined as a sub-key.
///
/// # Examples
///
/// ```
/// use tablekit_core::keys::{encode_key, KeySegment};
///
/// let key = encode_key(&[
///     KeySegment::from("USER"),
///     KeySegment::from(vec![KeySegment::from("a"), KeySegment::from(true)]),
///     KeySegment::sortable(7),
/// ]);
/// assert_eq!(key, "USER!!a!!true!!\" 7");
/// ```
pub fn encode_key(segments: &[KeySegment]) -> String {
    let mut encoded = Vec::with_capacity(segments.len());
    flatten_into(segments, &mut encoded);
    encoded.join(KEY_DELIMITER)
}

fn flatten_into(segments: &[KeySegment], out: &mut Vec<String>) {
    for segment in segments {
        match segment {
            KeySegment::Str(s) => out.push(s.clone()),
            KeySegment::Number(n) => out.push(n.to_string()),
            KeySegment::Sortable(n) => out.push(encode_number(n)),
            KeySegment::Bool(b) => out.push(b.to_string()),
            KeySegment::Date(d) => out.push(KeySegment::date_to_string(d)),
            KeySegment::List(nested) => flatten_into(nested, out),
        }
    }
}

/// A segment recovered from an encoded key.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedSegment {
    /// The segment parsed as a lexicographic number.
    Sortable(Number),
    /// Anything else, verbatim.
    Raw(String),
}

/// Splits an encoded key back into segments.
///
/// This is best-effort and meant for diagnostics: encoding drops type
/// information, so a stringified number, a boolean and a date all come back
/// as [`DecodedSegment::Raw`]. Only segments carrying the lexicographic length
/// prefix are recognised as numbers. Strings that themselves contain the
/// delimiter cannot be told apart from two segments.
pub fn decode_key(key: &str) -> Vec<DecodedSegment> {
    if key.is_empty() {
        return Vec::new();
    }
    key.split(KEY_DELIMITER).map(decode_segment).collect()
}

/// Decodes a single segment. See [`decode_key`].
pub fn decode_segment(segment: &str) -> DecodedSegment {
    match decode_number(segment) {
        Ok(number) => DecodedSegment::Sortable(number),
        Err(_) => DecodedSegment::Raw(segment.to_string()),
    }
}
