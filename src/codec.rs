//! Crockford Base32 codec for the canonical string form, plus the 7-byte binary form.
//!
//! The encoding is fixed-width and most-significant-symbol-first over an alphabet in ascending
//! ASCII order, so string comparison agrees with numeric comparison of non-negative values.

use crate::{Error, ErrorKind};
use fstr::FStr;

/// Digit characters used in the Crockford Base32 notation (no `I`, `L`, `O` or `U`).
pub const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// An O(1) map from ASCII code points to Base32 digit values.
const DECODE_MAP: [u8; 256] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10, 0x11, 0xff, 0x12, 0x13, 0xff, 0x14, 0x15, 0xff,
    0x16, 0x17, 0x18, 0x19, 0x1a, 0xff, 0x1b, 0x1c, 0x1d, 0x1e, 0x1f, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
];

/// Encodes the lowest `5 * N` bits of `value` into `N` Base32 digits.
///
/// The value is shifted arithmetically, so the digits of a negative value continue its
/// two's-complement bit pattern: `-1` encodes as all `Z`s and `i64::MIN` as `R000000000000`.
///
/// # Examples
///
/// ```rust
/// use ulid_flake::codec::encode;
///
/// assert_eq!(encode::<13>(0), "0000000000000");
/// assert_eq!(encode::<13>(i64::MAX), "7ZZZZZZZZZZZZ");
/// ```
pub const fn encode<const N: usize>(value: i64) -> FStr<N> {
    let mut dst = [b'0'; N];
    let mut value = value;
    let mut i = N;
    while i > 0 {
        i -= 1;
        dst[i] = ALPHABET[(value & 31) as usize];
        value >>= 5;
    }

    // SAFETY: All bytes in `dst` are valid ASCII characters.
    unsafe { FStr::from_inner_unchecked(dst) }
}

/// Decodes a string of Base32 digits into an unsigned 64-bit integer.
///
/// The length is not checked here. Returns [`ErrorKind::InvalidUlid`] on a character outside of
/// [`ALPHABET`] and [`ErrorKind::Overflow`] if the value does not fit in 64 bits.
pub const fn decode(str_value: &str) -> Result<u64, Error> {
    let bytes = str_value.as_bytes();
    let mut int_value = 0u64;
    let mut i = 0;
    while i < bytes.len() {
        let n = DECODE_MAP[bytes[i] as usize];
        if n == 0xff {
            return Err(Error::new(ErrorKind::InvalidUlid));
        }
        int_value = match int_value.checked_mul(32) {
            Some(int_value) => match int_value.checked_add(n as u64) {
                Some(int_value) => int_value,
                None => return Err(Error::new(ErrorKind::Overflow)),
            },
            None => return Err(Error::new(ErrorKind::Overflow)),
        };
        i += 1;
    }
    Ok(int_value)
}

/// Returns the low 56 bits of `value` as a big-endian byte array.
pub const fn to_bytes(value: i64) -> [u8; 7] {
    let b = value.to_be_bytes();
    [b[1], b[2], b[3], b[4], b[5], b[6], b[7]]
}
