//! Composite key construction.

mod composite;
mod error;
mod lexicographic;
mod segment;

pub use composite::{decode_key, decode_segment, encode_key, DecodedSegment, KEY_DELIMITER};
pub use error::{KeyError, Result};
pub use lexicographic::{
    decode_number, encode_number, is_encoded_number, MAX_INLINE_LENGTH, NEGATIVE_MARKER,
    OVERFLOW_MARKER,
};
pub use segment::{KeySegment, Number};
