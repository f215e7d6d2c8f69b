// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Base-128 varint codec.
//!
//! Varints store an unsigned integer as little-endian groups of 7 bits; each
//! byte carries one group in its low bits and sets `0x80` when more bytes
//! follow. Tags, lengths and native numbers use a 64-bit accumulator. The
//! big-integer path uses a 128-bit accumulator so `uint64`/`int64` values
//! carried as decimal strings never pass through a lossy type.

use crate::core::{CodecError, Result};

/// Longest encoding of a 64-bit varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Longest encoding of a 128-bit varint.
pub const MAX_BIG_VARINT_LEN: usize = 19;

/// Decode a 64-bit varint starting at `cursor`.
///
/// Returns the value and the cursor just past the last byte read.
pub fn decode_varint(buf: &[u8], cursor: usize) -> Result<(u64, usize)> {
    let (value, next) = decode_groups(buf, cursor, u64::BITS)?;
    // decode_groups rejected anything wider than 64 bits
    Ok((value as u64, next))
}

/// Decode a 128-bit varint starting at `cursor`.
pub fn decode_varint_big(buf: &[u8], cursor: usize) -> Result<(u128, usize)> {
    decode_groups(buf, cursor, u128::BITS)
}

fn decode_groups(buf: &[u8], cursor: usize, max_bits: u32) -> Result<(u128, usize)> {
    let mut value: u128 = 0;
    let mut shift: u32 = 0;
    let mut pos = cursor;

    loop {
        let Some(&byte) = buf.get(pos) else {
            return Err(CodecError::buffer_too_short(1, 0, pos as u64));
        };
        pos += 1;

        let group = u128::from(byte & 0x7F);
        if shift >= max_bits || (max_bits - shift < 7 && group >> (max_bits - shift) != 0) {
            return Err(CodecError::varint_overflow(max_bits, cursor as u64));
        }
        value |= group << shift;
        shift += 7;

        if byte & 0x80 == 0 {
            return Ok((value, pos));
        }
    }
}

/// Encode `value` into `buf` at `offset`, returning the offset past the last byte.
///
/// # Panics
///
/// Panics if `buf` has fewer than [`varint_len`]`(value)` bytes after `offset`.
pub fn encode_varint(buf: &mut [u8], offset: usize, value: u64) -> usize {
    encode_biguint(buf, offset, u128::from(value))
}

/// Encode a 128-bit `value` into `buf` at `offset`.
///
/// # Panics
///
/// Panics if `buf` has fewer than [`biguint_len`]`(value)` bytes after `offset`.
pub fn encode_biguint(buf: &mut [u8], offset: usize, mut value: u128) -> usize {
    let mut pos = offset;
    while value > 0x7F {
        buf[pos] = (value as u8 & 0x7F) | 0x80;
        value >>= 7;
        pos += 1;
    }
    buf[pos] = value as u8;
    pos + 1
}

/// Number of bytes [`encode_varint`] writes for `value`.
#[must_use]
pub const fn varint_len(value: u64) -> usize {
    let bits = u64::BITS - (value | 1).leading_zeros();
    bits.div_ceil(7) as usize
}

/// Number of bytes [`encode_biguint`] writes for `value`.
#[must_use]
pub const fn biguint_len(value: u128) -> usize {
    let bits = u128::BITS - (value | 1).leading_zeros();
    bits.div_ceil(7) as usize
}

/// Parse a non-negative decimal integer.
///
/// Surrounding whitespace is ignored. Signs, separators and values wider than
/// 128 bits are rejected.
pub fn parse_biguint(s: &str) -> Result<u128> {
    let digits = s.trim();
    if digits.is_empty() {
        return Err(CodecError::parse("biguint", "empty input"));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::parse(
            "biguint",
            format!("not a non-negative decimal integer: {digits:?}"),
        ));
    }
    digits
        .parse::<u128>()
        .map_err(|e| CodecError::parse("biguint", format!("{digits}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut buf = vec![0u8; varint_len(value)];
        let end = encode_varint(&mut buf, 0, value);
        assert_eq!(end, buf.len());
        buf
    }

    #[test]
    fn test_encode_single_byte() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(1), vec![0x01]);
        assert_eq!(encode(127), vec![0x7F]);
    }

    #[test]
    fn test_encode_multi_byte() {
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xAC, 0x02]);
        assert_eq!(encode(16384), vec![0x80, 0x80, 0x01]);
    }

    #[test]
    fn test_length_boundaries() {
        let cases: [(u64, usize); 10] = [
            (0, 1),
            (127, 1),
            (128, 2),
            (16_383, 2),
            (16_384, 3),
            (2_097_151, 3),
            (2_097_152, 4),
            (268_435_455, 4),
            (268_435_456, 5),
            (2_147_483_647, 5),
        ];
        for (value, len) in cases {
            assert_eq!(varint_len(value), len, "length of {value}");
            let encoded = encode(value);
            assert_eq!(encoded.len(), len, "encoded length of {value}");
            assert_eq!(decode_varint(&encoded, 0).unwrap(), (value, len));
        }
        assert_eq!(varint_len(u64::MAX), MAX_VARINT_LEN);
    }

    #[test]
    fn test_decode_u64_max() {
        let encoded = encode(u64::MAX);
        assert_eq!(
            encoded,
            vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]
        );
        assert_eq!(decode_varint(&encoded, 0).unwrap(), (u64::MAX, 10));
    }

    #[test]
    fn test_decode_at_offset() {
        let data = [0xFF, 0xAC, 0x02, 0x05];
        assert_eq!(decode_varint(&data, 1).unwrap(), (300, 3));
        assert_eq!(decode_varint(&data, 3).unwrap(), (5, 4));
    }

    #[test]
    fn test_decode_truncated() {
        let err = decode_varint(&[0x80, 0x80], 0).unwrap_err();
        assert!(matches!(err, CodecError::BufferTooShort { cursor_pos: 2, .. }));
        assert!(decode_varint(&[], 0).is_err());
    }

    #[test]
    fn test_decode_overflow_64() {
        // 2^64 needs a tenth byte carrying more than one bit
        let data = [0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x02];
        let err = decode_varint(&data, 0).unwrap_err();
        assert_eq!(err, CodecError::varint_overflow(64, 0));

        let data = [0xFF; 11];
        assert!(matches!(
            decode_varint(&data, 0),
            Err(CodecError::VarintOverflow { .. })
        ));
    }

    #[test]
    fn test_big_round_trip_beyond_u64() {
        let value = (1u128 << 64) + 12345;
        let mut buf = vec![0u8; biguint_len(value)];
        let end = encode_biguint(&mut buf, 0, value);
        assert_eq!(end, buf.len());
        assert_eq!(decode_varint_big(&buf, 0).unwrap(), (value, buf.len()));
        assert!(matches!(
            decode_varint(&buf, 0),
            Err(CodecError::VarintOverflow { .. })
        ));
    }

    #[test]
    fn test_big_u128_max() {
        let mut buf = vec![0u8; biguint_len(u128::MAX)];
        assert_eq!(buf.len(), MAX_BIG_VARINT_LEN);
        encode_biguint(&mut buf, 0, u128::MAX);
        assert_eq!(decode_varint_big(&buf, 0).unwrap().0, u128::MAX);
    }

    #[test]
    fn test_biguint_matches_varint_for_small_values() {
        for value in [0u64, 1, 127, 128, 9_007_199_254_740_993, u64::MAX] {
            let mut big = vec![0u8; biguint_len(u128::from(value))];
            encode_biguint(&mut big, 0, u128::from(value));
            assert_eq!(big, encode(value));
        }
    }

    #[test]
    fn test_parse_biguint() {
        assert_eq!(parse_biguint("1000").unwrap(), 1000);
        assert_eq!(parse_biguint(" 42 ").unwrap(), 42);
        assert_eq!(
            parse_biguint("9007199254740993").unwrap(),
            9_007_199_254_740_993
        );
        assert_eq!(
            parse_biguint("340282366920938463463374607431768211455").unwrap(),
            u128::MAX
        );
    }

    #[test]
    fn test_parse_biguint_rejects() {
        for input in ["", "  ", "-1", "+1", "1_000", "1e3", "0x10", "abc"] {
            assert!(parse_biguint(input).is_err(), "accepted {input:?}");
        }
        assert!(parse_biguint("340282366920938463463374607431768211456").is_err());
    }
}
