//! Base62 encoding of sequence numbers into short codes.
//!
//! The alphabet is digits, then lowercase, then uppercase letters. The order is
//! part of the public contract: the same sequence number must always produce
//! the same code on every worker and across releases.

use regex::Regex;
use std::sync::LazyLock;

/// Base62 alphabet in canonical order.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE: u64 = 62;

/// Longest code produced for a `u64` (`encode(u64::MAX)`).
pub const MAX_CODE_LEN: usize = 11;

/// Short codes are non-empty and alphanumeric.
static CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-zA-Z]+$").unwrap());

/// Encodes a sequence number as a base62 short code.
///
/// `0` encodes to `"0"`; any other value has no leading zero.
///
/// # Examples
///
/// ```
/// use seqlink::utils::base62::encode;
///
/// assert_eq!(encode(0), "0");
/// assert_eq!(encode(61), "Z");
/// assert_eq!(encode(62), "10");
/// ```
pub fn encode(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(MAX_CODE_LEN);
    while n > 0 {
        digits.push(ALPHABET[(n % BASE) as usize]);
        n /= BASE;
    }
    digits.reverse();

    // Only ASCII bytes from ALPHABET were pushed.
    String::from_utf8(digits).unwrap_or_default()
}

/// Decodes a short code back into its sequence number.
///
/// Returns `None` for empty input, characters outside the alphabet, codes with
/// a leading zero (which `encode` never produces), or values above `u64::MAX`.
pub fn decode(code: &str) -> Option<u64> {
    if code.is_empty() || (code.len() > 1 && code.starts_with('0')) {
        return None;
    }

    code.bytes().try_fold(0u64, |acc, byte| {
        let digit = digit_value(byte)?;
        acc.checked_mul(BASE)?.checked_add(digit)
    })
}

/// Returns true if `code` could have been produced by [`encode`]'s alphabet.
///
/// Used to reject malformed redirect paths before touching the store.
pub fn is_valid_code(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}

fn digit_value(byte: u8) -> Option<u64> {
    let value = match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'z' => byte - b'a' + 10,
        b'A'..=b'Z' => byte - b'A' + 36,
        _ => return None,
    };
    Some(u64::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_zero() {
        assert_eq!(encode(0), "0");
    }

    #[test]
    fn test_encode_first_allocations() {
        assert_eq!(encode(1), "1");
        assert_eq!(encode(2), "2");
        assert_eq!(encode(3), "3");
    }

    #[test]
    fn test_encode_alphabet_order() {
        assert_eq!(encode(9), "9");
        assert_eq!(encode(10), "a");
        assert_eq!(encode(35), "z");
        assert_eq!(encode(36), "A");
        assert_eq!(encode(61), "Z");
    }

    #[test]
    fn test_encode_rolls_over() {
        assert_eq!(encode(62), "10");
        assert_eq!(encode(63), "11");
        assert_eq!(encode(62 * 62), "100");
        assert_eq!(encode(62 * 62 - 1), "ZZ");
    }

    #[test]
    fn test_encode_u64_max() {
        let code = encode(u64::MAX);
        assert_eq!(code, "lYGhA16ahyf");
        assert_eq!(code.len(), MAX_CODE_LEN);
    }

    #[test]
    fn test_encode_i64_max_fits_eleven_chars() {
        assert!(encode(i64::MAX as u64).len() <= MAX_CODE_LEN);
    }

    #[test]
    fn test_decode_inverts_encode() {
        for n in (0..20_000u64).chain([u64::MAX, u64::MAX - 1, i64::MAX as u64]) {
            assert_eq!(decode(&encode(n)), Some(n), "n = {n}");
        }
    }

    #[test]
    fn test_no_leading_zero() {
        for n in 1..10_000u64 {
            assert!(!encode(n).starts_with('0'), "n = {n}");
        }
    }

    #[test]
    fn test_decode_rejects_leading_zero() {
        assert_eq!(decode("01"), None);
        assert_eq!(decode("0"), Some(0));
    }

    #[test]
    fn test_decode_rejects_foreign_characters() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("ab-c"), None);
        assert_eq!(decode("has space"), None);
    }

    #[test]
    fn test_decode_overflow() {
        assert_eq!(decode("lYGhA16ahyg"), None);
        assert_eq!(decode("ZZZZZZZZZZZZ"), None);
    }

    #[test]
    fn test_is_valid_code() {
        assert!(is_valid_code("0"));
        assert!(is_valid_code("doesNotExist"));
        assert!(is_valid_code("aZ09"));

        assert!(!is_valid_code(""));
        assert!(!is_valid_code("has space"));
        assert!(!is_valid_code("semi;colon"));
        assert!(!is_valid_code("dash-ed"));
        assert!(!is_valid_code("ünï"));
    }

    #[test]
    fn test_decode_rejects_overlong() {
        assert_eq!(decode("doesNotExist"), None);
        assert_eq!(decode(&"a".repeat(10_000)), None);
    }
}
