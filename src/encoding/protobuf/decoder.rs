// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Schemaless Protobuf Decoder
//!
//! Decodes protobuf wire data into a sparse field array without a compiled
//! schema, guided only by per-field [`Hint`]s.
//!
//! ## Field-order heuristic
//!
//! Without a schema the decoder cannot know whether a length-delimited
//! payload is bytes, text or an embedded message. It only trusts a field
//! sequence where each field number equals the previous one or exceeds it by
//! exactly one (the first field may be 1 or 2). Anything else, or a wire type
//! other than varint (0) or length-delimited (2), abandons the whole message
//! and returns the input unchanged as [`DecodeResult::Opaque`]. Messages built
//! with [`ProtobufWriter`](super::writer::ProtobufWriter) in ascending field
//! order always satisfy it.
//!
//! Length-delimited payloads are decoded as nested messages unless the field
//! is hinted `STRING`. A nested payload that is not trusted, or does not parse,
//! is kept as [`DecodedValue::Bytes`].
//!
//! ## Example
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use pbwire::encoding::protobuf::{decode_protobuf, hints, Hint, ProtobufWriter};
//! use pbwire::DecodedValue;
//!
//! let data = ProtobufWriter::new()
//!     .field(1)
//!     .biguint_str("1000")?
//!     .field(2)
//!     .string("uscrt")
//!     .finish();
//!
//! let result = decode_protobuf(&data, &hints(&[Hint::SINGULAR_BIGINT, Hint::SINGULAR_STRING]))?;
//! let message = result.as_message().expect("structured");
//! assert_eq!(message.first_value(0), Some(&DecodedValue::BigInt("1000".into())));
//! assert_eq!(message.first_value(1), Some(&DecodedValue::String("uscrt".into())));
//! # Ok(())
//! # }
//! ```

use tracing::debug;

use super::hint::{lookup, FieldHint, Hint};
use super::varint::{decode_varint, decode_varint_big};
use super::WireType;
use crate::core::{CodecError, DecodeResult, DecodedMessage, DecodedValue, Result};

/// Default limit on embedded-message nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Deepest embedded message that is decoded; payloads below it stay bytes
    pub max_depth: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecoderOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Hint-driven protobuf decoder.
#[derive(Debug, Clone, Default)]
pub struct ProtobufDecoder {
    options: DecoderOptions,
}

impl ProtobufDecoder {
    /// Create a decoder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with the given options.
    pub fn with_options(options: DecoderOptions) -> Self {
        Self { options }
    }

    /// Get the decoder options.
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decode a protobuf message.
    ///
    /// # Arguments
    ///
    /// * `data` - The protobuf-encoded message
    /// * `hints` - One hint per field number, indexed by `field_number - 1`
    ///
    /// # Errors
    ///
    /// Fails if the top-level buffer ends inside a varint, a length-delimited
    /// field overruns it, a varint overflows, or a `STRING` field is not UTF-8.
    /// An untrusted field sequence is not an error; see the module docs.
    pub fn decode(&self, data: &[u8], hints: &[FieldHint]) -> Result<DecodeResult> {
        self.decode_at(data, hints, 0)
    }

    fn decode_at(&self, data: &[u8], hints: &[FieldHint], depth: usize) -> Result<DecodeResult> {
        let mut message = DecodedMessage::new();
        let mut pos = 0;
        let mut previous: i64 = 0;

        while pos < data.len() {
            let (tag, next) = decode_varint(data, pos)?;
            pos = next;

            let index = (tag >> 3) as i64 - 1;
            let wire_type = WireType::from_bits((tag & 0x07) as u8);

            let Some(wire_type) = wire_type.filter(|_| index >= previous && index <= previous + 1)
            else {
                debug!(
                    field = index + 1,
                    previous = previous + 1,
                    wire_type = tag & 0x07,
                    depth,
                    "untrusted field sequence, returning opaque bytes"
                );
                return Ok(DecodeResult::Opaque(data.to_vec()));
            };
            previous = index;

            let index = index as usize;
            let field_number = index as u32 + 1;
            let (hint, nested) = lookup(hints, index);

            let value = match wire_type {
                WireType::Varint if hint.is_bigint() => {
                    let (value, next) = decode_varint_big(data, pos)?;
                    pos = next;
                    DecodedValue::BigInt(value.to_string())
                }
                WireType::Varint => {
                    let (value, next) = decode_varint(data, pos)?;
                    pos = next;
                    DecodedValue::Varint(value)
                }
                WireType::LengthDelimited => {
                    let (len, start) = decode_varint(data, pos)?;
                    let available = data.len() - start;
                    let len = usize::try_from(len).unwrap_or(usize::MAX);
                    if len > available {
                        return Err(CodecError::length_exceeded(len, start, data.len()));
                    }
                    pos = start + len;
                    self.decode_payload(&data[start..pos], start, field_number, hint, nested, depth)?
                }
            };

            if hint.is_singular() {
                message.set_singular(index, value);
            } else {
                message.push_repeated(index, value);
            }
        }

        Ok(DecodeResult::Structured(message))
    }

    fn decode_payload(
        &self,
        payload: &[u8],
        position: usize,
        field_number: u32,
        hint: Hint,
        nested: &[FieldHint],
        depth: usize,
    ) -> Result<DecodedValue> {
        if hint.is_string() {
            return String::from_utf8(payload.to_vec())
                .map(DecodedValue::String)
                .map_err(|_| CodecError::invalid_utf8(field_number, position as u64));
        }

        if depth >= self.options.max_depth {
            debug!(
                field = field_number,
                depth,
                max_depth = self.options.max_depth,
                "nesting limit reached, keeping payload as bytes"
            );
            return Ok(DecodedValue::Bytes(payload.to_vec()));
        }

        // The payload is bounded by its length prefix, so a failed nested
        // parse only means the field was not a message.
        Ok(match self.decode_at(payload, nested, depth + 1) {
            Ok(DecodeResult::Structured(message)) => DecodedValue::Message(message),
            Ok(DecodeResult::Opaque(bytes)) => DecodedValue::Bytes(bytes),
            Err(e) => {
                debug!(
                    field = field_number,
                    depth,
                    error = ?e.log_fields(),
                    "nested payload did not parse, keeping bytes"
                );
                DecodedValue::Bytes(payload.to_vec())
            }
        })
    }
}

impl crate::Decoder for ProtobufDecoder {
    fn decode(&self, data: &[u8], hints: &[FieldHint]) -> Result<DecodeResult> {
        ProtobufDecoder::decode(self, data, hints)
    }
}

/// Decode a protobuf message with default options.
pub fn decode_protobuf(data: &[u8], hints: &[FieldHint]) -> Result<DecodeResult> {
    ProtobufDecoder::new().decode(data, hints)
}

/// Decode a response that wraps a single value in field 1.
///
/// Returns the first value of field 1, or `None` when the field is absent or
/// the message fell back to opaque bytes.
pub fn decode_protobuf_r0(data: &[u8], hints: &[FieldHint]) -> Result<Option<DecodedValue>> {
    Ok(decode_protobuf(data, hints)?
        .into_message()
        .and_then(|m| m.into_first_value(0)))
}

/// Decode a response that wraps a message in field 1, which wraps a value in
/// its own field 1.
///
/// `hints` describe the inner message.
pub fn decode_protobuf_r0_0(data: &[u8], hints: &[FieldHint]) -> Result<Option<DecodedValue>> {
    let outer = [FieldHint::message(Hint::NONE, hints.to_vec())];
    Ok(match decode_protobuf_r0(data, &outer)? {
        Some(DecodedValue::Message(inner)) => inner.into_first_value(0),
        _ => None,
    })
}
