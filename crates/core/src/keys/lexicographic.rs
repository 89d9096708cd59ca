//! Lexicographic numeric encoding.
//!
//! The store orders sort keys as plain strings, so numbers that must sort
//! numerically are encoded with a self-describing length prefix:
//!
//! - a run of `l <= 92` digits becomes `chr(33 + l)`, a space, then the digits;
//! - longer runs become `~`, the encoded length of the run, a space, then the digits.
//!
//! Decimals encode the integer and fractional digit runs independently and join
//! them with `.`. Negative numbers encode their magnitude, map every non-space
//! character `c` to `chr(159 - c)` (which reverses the order of magnitudes) and
//! are prefixed with [`NEGATIVE_MARKER`].
//!
//! The negative prefix is a space, not the `-` some existing encoders write.
//! `-` sorts above the short length prefixes and puts `-5` after `0`; keys
//! written with a `-` prefix must be re-encoded before they sort alongside
//! these. A space also keeps the translated overflow marker (`~` becomes `!`)
//! from forming the `!!` key delimiter.
//!
//! Ordering is guaranteed for integers. Fractional digit runs are compared by
//! length first, which does not match numeric order.

use super::error::{KeyError, Result};
use super::segment::Number;

/// Longest digit run whose length fits in a single prefix character.
pub const MAX_INLINE_LENGTH: usize = 92;

/// Prefix of a digit run whose length needs its own encoding.
pub const OVERFLOW_MARKER: char = '~';

/// Prefix of an encoded negative number. Sorts below every length prefix.
pub const NEGATIVE_MARKER: char = ' ';

const LENGTH_BASE: u32 = 33;
const TRANSLATION_PIVOT: u32 = 159;

/// Encodes a number so that plain string comparison matches numeric order.
pub fn encode_number(number: &Number) -> String {
    let encoded = encode_magnitude(number.magnitude());
    if number.is_negative() {
        format!("{NEGATIVE_MARKER}{}", translate(&encoded))
    } else {
        encoded
    }
}

/// Decodes a value produced by [`encode_number`].
pub fn decode_number(encoded: &str) -> Result<Number> {
    let (negative, body) = match encoded.strip_prefix(NEGATIVE_MARKER) {
        Some(rest) => (true, translate(rest)),
        None => (false, encoded.to_string()),
    };

    let (integer, rest) = decode_digits(&body)?;
    let magnitude = if rest.is_empty() {
        integer.to_string()
    } else {
        let fraction = rest
            .strip_prefix('.')
            .ok_or_else(|| invalid(encoded, "unexpected trailing characters"))?;
        let (fraction, rest) = decode_digits(fraction)?;
        if !rest.is_empty() {
            return Err(invalid(encoded, "unexpected trailing characters"));
        }
        format!("{integer}.{fraction}")
    };

    if negative {
        Number::parse(&format!("-{magnitude}"))
    } else {
        Number::parse(&magnitude)
    }
}

/// Returns true if `value` is a well-formed lexicographic encoding.
pub fn is_encoded_number(value: &str) -> bool {
    decode_number(value).is_ok()
}

fn encode_magnitude(magnitude: &str) -> String {
    match magnitude.split_once('.') {
        Some((integer, fraction)) => {
            format!("{}.{}", encode_digits(integer), encode_digits(fraction))
        }
        None => encode_digits(magnitude),
    }
}

fn encode_digits(digits: &str) -> String {
    let length = digits.len();
    if length <= MAX_INLINE_LENGTH {
        let prefix = char::from(LENGTH_BASE as u8 + length as u8);
        format!("{prefix} {digits}")
    } else {
        format!(
            "{OVERFLOW_MARKER}{} {digits}",
            encode_digits(&length.to_string())
        )
    }
}

/// Parses one encoded digit run from the front of `input`, returning the digits
/// and whatever follows them.
fn decode_digits(input: &str) -> Result<(&str, &str)> {
    let marker = input
        .chars()
        .next()
        .ok_or_else(|| invalid(input, "empty input"))?;

    let (length, after_prefix) = if marker == OVERFLOW_MARKER {
        let (length_digits, rest) = decode_digits(&input[1..])?;
        let length = length_digits
            .parse::<usize>()
            .map_err(|_| invalid(input, "length prefix out of range"))?;
        (length, rest)
    } else {
        let code = marker as u32;
        if !(LENGTH_BASE + 1..=LENGTH_BASE + MAX_INLINE_LENGTH as u32).contains(&code) {
            return Err(invalid(input, "unknown length prefix"));
        }
        ((code - LENGTH_BASE) as usize, &input[marker.len_utf8()..])
    };

    let body = after_prefix
        .strip_prefix(' ')
        .ok_or_else(|| invalid(input, "missing separator"))?;
    if body.len() < length || !body.is_char_boundary(length) {
        return Err(invalid(input, "truncated digits"));
    }

    let (digits, rest) = body.split_at(length);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(input, "non-digit character"));
    }
    Ok((digits, rest))
}

/// Maps `c` to `chr(159 - c)`, leaving spaces alone. Applying it twice is the identity.
fn translate(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            ' ' => ' ',
            c => char::from_u32(TRANSLATION_PIVOT.saturating_sub(c as u32)).unwrap_or(c),
        })
        .collect()
}

fn invalid(input: &str, reason: &str) -> KeyError {
    KeyError::InvalidEncoding(format!("{reason}: {input:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: i64) -> String {
        encode_number(&Number::from(value))
    }

    fn encode_str(value: &str) -> String {
        encode_number(&Number::parse(value).unwrap())
    }

    #[test]
    fn test_encode_small_integers() {
        assert_eq!(encode(0), "\" 0");
        assert_eq!(encode(5), "\" 5");
        assert_eq!(encode(10), "# 10");
        assert_eq!(encode(100), "$ 100");
    }

    #[test]
    fn test_encode_longest_inline_run() {
        let digits = "9".repeat(92);
        assert_eq!(encode_str(&digits), format!("}} {digits}"));
    }

    #[test]
    fn test_encode_overflow_run() {
        let digits = "1".repeat(93);
        assert_eq!(encode_str(&digits), format!("~# 93 {digits}"));

        let digits = "7".repeat(150);
        assert_eq!(encode_str(&digits), format!("~$ 150 {digits}"));
    }

    #[test]
    fn test_encode_negative() {
        // '"' -> '}', '5' -> 'j'
        assert_eq!(encode(-5), " } j");
        // '#' -> '|', '1' -> 'n', '0' -> 'o'
        assert_eq!(encode(-10), " | no");
    }

    #[test]
    fn test_encode_decimal() {
        assert_eq!(encode_str("3.25"), "\" 3.# 25");
        // '.' -> 'q'
        assert_eq!(encode_str("-3.25"), " } lq| mj");
    }

    #[test]
    fn test_encode_negative_overflow_run() {
        let digits = "3".repeat(93);
        let encoded = encode_str(&format!("-{digits}"));

        // '~' -> '!', '#' -> '|', '9' -> 'f', '3' -> 'l'
        assert!(encoded.starts_with(" !| fl "), "{encoded:?}");
        assert!(!encoded.contains("!!"));
        assert!(encoded < encode(-1));
        assert!(encoded < encode(0));
    }

    #[test]
    fn test_order_preserved_for_non_negative_integers() {
        assert!(encode(5) < encode(10));
        assert!(encode(10) < encode(100));

        let values = [0, 1, 2, 9, 10, 11, 99, 100, 101, 999, 1_000, 65_535, i64::MAX];
        for pair in values.windows(2) {
            assert!(
                encode(pair[0]) < encode(pair[1]),
                "{} should sort before {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_order_preserved_across_inline_and_overflow_lengths() {
        let values: Vec<String> = [1, 91, 92, 93, 94, 99, 100, 1_000]
            .iter()
            .map(|len| format!("1{}", "0".repeat(len - 1)))
            .collect();
        for pair in values.windows(2) {
            assert!(encode_str(&pair[0]) < encode_str(&pair[1]));
        }
    }

    #[test]
    fn test_sign_handling() {
        assert!(encode(-5) < encode(-1));
        assert!(encode(-1) < encode(0));
        assert!(encode(0) < encode(1));

        let values = [-1_000_000, -1_000, -101, -100, -99, -10, -9, -1, 0, 1, 9, 10];
        for pair in values.windows(2) {
            assert!(
                encode(pair[0]) < encode(pair[1]),
                "{} should sort before {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_round_trip() {
        let big = "8".repeat(120);
        let negative_big = format!("-{}", "3".repeat(200));
        let values = [
            "0",
            "1",
            "7",
            "42",
            "1000",
            "18446744073709551615",
            big.as_str(),
            "-1",
            "-42",
            negative_big.as_str(),
            "3.25",
            "-0.5",
            "10.05",
        ];
        for value in values {
            let number = Number::parse(value).unwrap();
            assert_eq!(decode_number(&encode_number(&number)).unwrap(), number);
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_number("").is_err());
        assert!(decode_number("abc").is_err());
        assert!(decode_number("\" 12").is_err());
        assert!(decode_number("# 1").is_err());
        assert!(decode_number("\"5").is_err());
        assert!(decode_number("\" 5x").is_err());
        assert!(!is_encoded_number("USER"));
        assert!(is_encoded_number("\" 5"));
    }
}
