//! Synchsafe Integer Codec
//!
//! ID3v2 stores its tag size as four bytes carrying seven bits each, so the
//! size field can never contain a `0xFF 0xE0` frame sync pattern.
//!
//! Only 28 bits fit. Encoding a larger value silently keeps the low 28 bits,
//! and decoding ignores the top bit of every byte instead of rejecting it.
//! Both behaviors are relied upon when segmenting damaged tags.

/// Largest value that survives an encode/decode round trip
pub const SYNCHSAFE_MAX: u32 = (1 << 28) - 1;

const SEVEN_BITS: u64 = 0x7F;

/// Encode `value` as a big-endian synchsafe integer
///
/// Values above [`SYNCHSAFE_MAX`] are truncated to their low 28 bits.
///
/// # Example
/// ```
/// use mp3seg::synchsafe::encode;
/// assert_eq!(encode(128), [0x00, 0x00, 0x01, 0x00]);
/// ```
pub fn encode(value: u64) -> [u8; 4] {
    let mut out = [0u8; 4];
    let mut rest = value;
    for byte in out.iter_mut().rev() {
        *byte = (rest & SEVEN_BITS) as u8;
        rest >>= 7;
    }
    out
}

/// Decode a big-endian synchsafe integer
///
/// The high bit of each byte is masked off, never validated.
///
/// # Example
/// ```
/// use mp3seg::synchsafe::decode;
/// assert_eq!(decode([0x00, 0x00, 0x02, 0x23]), 0x123);
/// ```
#[inline]
pub fn decode(bytes: [u8; 4]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 7) | u32::from(b & 0x7F))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(128, [0x00, 0x00, 0x01, 0x00] ; "one past seven bits")]
    #[test_case(0x80 + 0x11, [0x00, 0x00, 0x01, 0x11] ; "carry plus low bits")]
    #[test_case(150_584_481, [0x47, 0x66, 0x79, 0x21] ; "all four bytes used")]
    #[test_case(0, [0x00, 0x00, 0x00, 0x00] ; "zero")]
    fn test_encode(value: u64, expected: [u8; 4]) {
        assert_eq!(encode(value), expected);
    }

    #[test]
    fn test_overflow_truncates() {
        let encoded = encode(9_999_999_999);
        assert_eq!(encoded, *b" /G\x7f");
        assert_eq!(encoded, [0x20, 0x2F, 0x47, 0x7F]);
        assert_ne!(u64::from(decode(encoded)), 9_999_999_999);
        assert_eq!(u64::from(decode(encoded)), 9_999_999_999 & u64::from(SYNCHSAFE_MAX));
    }

    #[test]
    fn test_decode_ignores_high_bits() {
        assert_eq!(decode([0x80, 0x80, 0x80, 0x81]), 1);
        assert_eq!(decode([0xFF, 0xFF, 0xFF, 0xFF]), SYNCHSAFE_MAX);
        assert_eq!(decode(*b"NNNN"), decode([0x4E, 0x4E, 0x4E, 0x4E]));
    }

    #[test]
    fn test_round_trip_in_range() {
        assert_eq!(decode(encode(1337)), 1337);
        let bytes = [0x00, 0x00, 0x02, 0x23];
        assert_eq!(encode(u64::from(decode(bytes))), bytes);

        // Every bit pattern across the 28-bit range, plus the boundaries.
        let mut value: u32 = 1;
        while value <= SYNCHSAFE_MAX {
            assert_eq!(decode(encode(u64::from(value))), value);
            assert_eq!(decode(encode(u64::from(value - 1))), value - 1);
            value = (value << 1) | 1;
        }
        assert_eq!(decode(encode(u64::from(SYNCHSAFE_MAX))), SYNCHSAFE_MAX);
        assert_eq!(decode(encode(u64::from(SYNCHSAFE_MAX) + 1)), 0);
    }

    #[test]
    fn test_round_trip_strided_sweep() {
        for value in (0..=SYNCHSAFE_MAX).step_by(4093) {
            let encoded = encode(u64::from(value));
            assert!(encoded.iter().all(|b| b & 0x80 == 0), "value {}", value);
            assert_eq!(decode(encoded), value);
        }
    }

    #[test]
    fn test_encoded_bytes_never_set_high_bit() {
        for value in [0u64, 127, 128, 16_383, 16_384, 2_097_151, 9_999_999_999, u64::MAX] {
            assert!(encode(value).iter().all(|b| b & 0x80 == 0), "value {}", value);
        }
    }
}
