// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Protobuf wire codec module.
//!
//! Provides schemaless decoding and exact-size encoding of the two wire types
//! RPC gateway messages use: varint and length-delimited.

pub mod decoder;
pub mod hint;
pub mod varint;
pub mod wellknown;
pub mod writer;

pub use decoder::{
    decode_protobuf, decode_protobuf_r0, decode_protobuf_r0_0, DecoderOptions, ProtobufDecoder,
    DEFAULT_MAX_DEPTH,
};
pub use hint::{hints, parse_hints, FieldHint, Hint};
pub use varint::{
    biguint_len, decode_varint, decode_varint_big, encode_biguint, encode_varint, parse_biguint,
    varint_len,
};
pub use wellknown::{any, coin, coins, temporal, AnyMessage, Coin};
pub use writer::{IntoBigUint, IntoVarint, ProtobufWriter};

/// Protobuf wire types handled by this codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    /// int32, int64, uint32, uint64, bool, enum
    Varint = 0,
    /// string, bytes, embedded messages
    LengthDelimited = 2,
}

impl WireType {
    /// Map the low three tag bits to a supported wire type.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Varint),
            2 => Some(Self::LengthDelimited),
            _ => None,
        }
    }

    /// Tag value `(field << 3) | wire_type`.
    #[must_use]
    pub const fn tag(self, field: u32) -> u64 {
        ((field as u64) << 3) | self as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_type_from_bits() {
        assert_eq!(WireType::from_bits(0), Some(WireType::Varint));
        assert_eq!(WireType::from_bits(2), Some(WireType::LengthDelimited));
        for bits in [1, 3, 4, 5, 6, 7] {
            assert_eq!(WireType::from_bits(bits), None);
        }
    }

    #[test]
    fn test_tag() {
        assert_eq!(WireType::Varint.tag(1), 0x08);
        assert_eq!(WireType::LengthDelimited.tag(1), 0x0A);
        assert_eq!(WireType::LengthDelimited.tag(2), 0x12);
        assert_eq!(WireType::Varint.tag(u32::MAX), (u64::from(u32::MAX) << 3));
    }
}
