// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # pbwire
//!
//! Runtime Protocol Buffers wire codec that works without a compiled schema.
//!
//! Generated RPC clients use it to serialize requests and deserialize
//! responses for a blockchain gateway:
//! - **Decoding** in [`encoding::protobuf::decoder`] turns wire bytes into a
//!   sparse field array, guided by per-field [`Hint`]s
//! - **Encoding** in [`encoding::protobuf::writer`] builds a message with an
//!   append-only writer that sizes its output before writing a byte
//! - **Varints** in [`encoding::protobuf::varint`], including a 128-bit path
//!   for `uint64`/`int64` values carried as decimal strings
//! - **Well-known messages** (`Any`, `Coin`, `Timestamp`/`Duration`) in
//!   [`encoding::protobuf::wellknown`]
//!
//! ## Example
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use pbwire::{decode_protobuf, hints, DecodeResult, Hint, ProtobufWriter};
//!
//! let request = ProtobufWriter::new()
//!     .biguint_str("1000")?
//!     .string("uscrt")
//!     .finish();
//!
//! match decode_protobuf(&request, &hints(&[Hint::SINGULAR_BIGINT, Hint::SINGULAR_STRING]))? {
//!     DecodeResult::Structured(message) => {
//!         assert_eq!(message.to_json(), serde_json::json!(["1000", "uscrt"]));
//!     }
//!     DecodeResult::Opaque(bytes) => println!("undecoded: {bytes:?}"),
//! }
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

pub use self::core::{CodecError, DecodeResult, DecodedField, DecodedMessage, DecodedValue, Result};

// Encoding/decoding
pub mod encoding;

pub use encoding::protobuf::{
    decode_protobuf, decode_protobuf_r0, decode_protobuf_r0_0, hints, parse_hints,
    DecoderOptions, FieldHint, Hint, ProtobufDecoder, ProtobufWriter, WireType, DEFAULT_MAX_DEPTH,
};

/// Decoder trait for generic decoding operations.
pub trait Decoder: Send + Sync {
    /// Decode data, using `hints` in place of a schema.
    fn decode(&self, data: &[u8], hints: &[FieldHint]) -> Result<DecodeResult>;
}
