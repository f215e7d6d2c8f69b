// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Append-only protobuf message writer.
//!
//! Writes are recorded as a list of nodes, each carrying its exact encoded
//! length. The running total is therefore known before any byte is written,
//! and [`ProtobufWriter::finish`] allocates the output exactly once and fills
//! it in a single pass.
//!
//! Field numbers come from a cursor that starts at 1 and moves to
//! `field + 1` after every write call, including calls that omit their field.
//! [`ProtobufWriter::field`] sets the number used by the next write.
//!
//! The writer does not validate values or field numbers.
//!
//! # Example
//!
//! ```
//! use pbwire::encoding::protobuf::ProtobufWriter;
//!
//! let mut inner = ProtobufWriter::new();
//! inner.string("uscrt").string("1000");
//!
//! let data = ProtobufWriter::new()
//!     .varint(150u32)
//!     .message(&inner)
//!     .finish();
//! assert_eq!(&data[..3], &[0x08, 0x96, 0x01]);
//! ```

use tracing::trace;

use super::varint::{biguint_len, encode_biguint, encode_varint, parse_biguint, varint_len};
use super::WireType;
use crate::core::Result;

/// Values the writer can emit as a varint.
///
/// `None` means the field is absent and nothing is written. Signed values are
/// sign-extended to 64 bits, matching protobuf `int32`/`int64`.
pub trait IntoVarint {
    fn into_varint(self) -> Option<u64>;
}

macro_rules! impl_into_varint {
    (unsigned: $($t:ty),*; signed: $($s:ty),*) => {
        $(impl IntoVarint for $t {
            fn into_varint(self) -> Option<u64> {
                Some(self as u64)
            }
        })*
        $(impl IntoVarint for $s {
            fn into_varint(self) -> Option<u64> {
                Some(self as i64 as u64)
            }
        })*
    };
}

impl_into_varint!(unsigned: u8, u16, u32, u64, usize; signed: i8, i16, i32, i64, isize);

impl IntoVarint for bool {
    fn into_varint(self) -> Option<u64> {
        Some(u64::from(self))
    }
}

impl<T: IntoVarint> IntoVarint for Option<T> {
    fn into_varint(self) -> Option<u64> {
        self.and_then(IntoVarint::into_varint)
    }
}

/// Values the writer can emit on the big-integer path.
pub trait IntoBigUint {
    fn into_biguint(self) -> Option<u128>;
}

macro_rules! impl_into_biguint {
    ($($t:ty),*) => {
        $(impl IntoBigUint for $t {
            fn into_biguint(self) -> Option<u128> {
                Some(u128::from(self))
            }
        })*
    };
}

impl_into_biguint!(u8, u16, u32, u64, u128);

impl<T: IntoBigUint> IntoBigUint for Option<T> {
    fn into_biguint(self) -> Option<u128> {
        self.and_then(IntoBigUint::into_biguint)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum WriteOp {
    Tag(u32, WireType),
    Varint(u64),
    BigVarint(u128),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BufferNode {
    op: WriteOp,
    len: usize,
}

impl BufferNode {
    fn new(op: WriteOp) -> Self {
        let len = match &op {
            WriteOp::Tag(field, wire_type) => varint_len(wire_type.tag(*field)),
            WriteOp::Varint(v) => varint_len(*v),
            WriteOp::BigVarint(v) => biguint_len(*v),
            WriteOp::Bytes(b) => b.len(),
        };
        Self { op, len }
    }

    fn encode(&self, buf: &mut [u8], offset: usize) -> usize {
        match &self.op {
            WriteOp::Tag(field, wire_type) => encode_varint(buf, offset, wire_type.tag(*field)),
            WriteOp::Varint(v) => encode_varint(buf, offset, *v),
            WriteOp::BigVarint(v) => encode_biguint(buf, offset, *v),
            WriteOp::Bytes(b) => {
                buf[offset..offset + b.len()].copy_from_slice(b);
                offset + b.len()
            }
        }
    }
}

/// Builder for one protobuf message.
#[derive(Debug, Clone)]
pub struct ProtobufWriter {
    nodes: Vec<BufferNode>,
    total: usize,
    next_field: u32,
}

impl Default for ProtobufWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtobufWriter {
    /// Create an empty writer positioned at field 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            total: 0,
            next_field: 1,
        }
    }

    /// Encoded size of everything written so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.total
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Field number the next write will use.
    #[must_use]
    pub const fn next_field(&self) -> u32 {
        self.next_field
    }

    /// Use `number` for the next write.
    pub fn field(&mut self, number: u32) -> &mut Self {
        self.next_field = number;
        self
    }

    fn take_field(&mut self) -> u32 {
        let field = self.next_field;
        self.next_field = field.wrapping_add(1);
        field
    }

    fn push(&mut self, op: WriteOp) {
        let node = BufferNode::new(op);
        self.total += node.len;
        self.nodes.push(node);
    }

    fn push_varint(&mut self, field: u32, value: u64) {
        self.push(WriteOp::Tag(field, WireType::Varint));
        self.push(WriteOp::Varint(value));
    }

    fn push_biguint(&mut self, field: u32, value: u128) {
        self.push(WriteOp::Tag(field, WireType::Varint));
        self.push(WriteOp::BigVarint(value));
    }

    fn push_bytes(&mut self, field: u32, payload: Vec<u8>) {
        self.push(WriteOp::Tag(field, WireType::LengthDelimited));
        self.push(WriteOp::Varint(payload.len() as u64));
        self.push(WriteOp::Bytes(payload));
    }

    /// Write a varint field. `None` omits the field.
    pub fn varint<V: IntoVarint>(&mut self, value: V) -> &mut Self {
        let field = self.take_field();
        if let Some(v) = value.into_varint() {
            self.push_varint(field, v);
        }
        self
    }

    /// Write an unsigned integer of up to 128 bits as a varint. `None` omits the field.
    pub fn biguint<V: IntoBigUint>(&mut self, value: V) -> &mut Self {
        let field = self.take_field();
        if let Some(v) = value.into_biguint() {
            self.push_biguint(field, v);
        }
        self
    }

    /// Write a decimal-string integer as a varint.
    ///
    /// # Errors
    ///
    /// Fails if `value` is not a non-negative decimal integer that fits in 128
    /// bits. Nothing is written and the field cursor does not move.
    pub fn biguint_str(&mut self, value: &str) -> Result<&mut Self> {
        let parsed = parse_biguint(value)?;
        Ok(self.biguint(parsed))
    }

    /// Write a length-delimited field holding `payload`.
    pub fn bytes(&mut self, payload: &[u8]) -> &mut Self {
        let field = self.take_field();
        self.push_bytes(field, payload.to_vec());
        self
    }

    /// Write a UTF-8 string field. Empty and `None` strings omit the field.
    pub fn string<'a>(&mut self, value: impl Into<Option<&'a str>>) -> &mut Self {
        let field = self.take_field();
        if let Some(s) = value.into().filter(|s| !s.is_empty()) {
            self.push_bytes(field, s.as_bytes().to_vec());
        }
        self
    }

    /// Write another writer's output as an embedded message.
    pub fn message(&mut self, inner: &ProtobufWriter) -> &mut Self {
        let field = self.take_field();
        self.push_bytes(field, inner.finish());
        self
    }

    /// Write each value under the same field number.
    pub fn repeated_varint<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: IntoVarint,
    {
        let field = self.take_field();
        for v in values.into_iter().filter_map(IntoVarint::into_varint) {
            self.push_varint(field, v);
        }
        self
    }

    /// Write each big integer under the same field number.
    pub fn repeated_biguint<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: IntoBigUint,
    {
        let field = self.take_field();
        for v in values.into_iter().filter_map(IntoBigUint::into_biguint) {
            self.push_biguint(field, v);
        }
        self
    }

    /// Write each decimal-string integer under the same field number.
    ///
    /// # Errors
    ///
    /// Fails if any item is not a non-negative decimal integer that fits in
    /// 128 bits. Nothing is written and the field cursor does not move.
    pub fn repeated_biguint_str<I>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let parsed = values
            .into_iter()
            .map(|v| parse_biguint(v.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.repeated_biguint(parsed))
    }

    /// Write each payload under the same field number.
    pub fn repeated_bytes<I>(&mut self, payloads: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let field = self.take_field();
        for p in payloads {
            self.push_bytes(field, p.as_ref().to_vec());
        }
        self
    }

    /// Write each string under the same field number, skipping empty ones.
    pub fn repeated_string<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let field = self.take_field();
        for s in values {
            let s = s.as_ref();
            if !s.is_empty() {
                self.push_bytes(field, s.as_bytes().to_vec());
            }
        }
        self
    }

    /// Encode everything written so far.
    ///
    /// Does not consume or modify the writer; calling it again returns the
    /// same bytes.
    #[must_use]
    pub fn finish(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.total];
        let mut offset = 0;
        for node in &self.nodes {
            let end = node.encode(&mut buf, offset);
            debug_assert_eq!(end, offset + node.len);
            offset += node.len;
        }
        trace!(
            nodes = self.nodes.len(),
            bytes = self.total,
            "finished protobuf message"
        );
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_new() {
        let writer = ProtobufWriter::new();
        assert!(writer.is_empty());
        assert_eq!(writer.next_field(), 1);
        assert!(writer.finish().is_empty());
    }

    #[test]
    fn test_varint_auto_increment() {
        let data = ProtobufWriter::new().varint(1u8).varint(true).varint(300u32).finish();
        assert_eq!(data, vec![0x08, 0x01, 0x10, 0x01, 0x18, 0xAC, 0x02]);
    }

    #[test]
    fn test_explicit_field_moves_cursor() {
        let mut writer = ProtobufWriter::new();
        writer.field(5).varint(1u8);
        assert_eq!(writer.next_field(), 6);
        writer.varint(2u8);
        assert_eq!(writer.finish(), vec![0x28, 0x01, 0x30, 0x02]);
    }

    #[test]
    fn test_none_is_noop_but_advances() {
        let mut writer = ProtobufWriter::new();
        writer.field(3).varint(None::<u32>);
        assert!(writer.finish().is_empty());
        assert_eq!(writer.next_field(), 4);

        let data = ProtobufWriter::new().varint(None::<u64>).varint(Some(7u64)).finish();
        assert_eq!(data, vec![0x10, 0x07]);
    }

    #[test]
    fn test_zero_is_written() {
        assert_eq!(ProtobufWriter::new().varint(0u32).finish(), vec![0x08, 0x00]);
        assert_eq!(ProtobufWriter::new().varint(false).finish(), vec![0x08, 0x00]);
    }

    #[test]
    fn test_negative_int_sign_extends() {
        let data = ProtobufWriter::new().varint(-1i32).finish();
        assert_eq!(
            data,
            vec![0x08, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]
        );
    }

    #[test]
    fn test_string_omits_empty() {
        let mut writer = ProtobufWriter::new();
        writer.string("").string(None::<&str>).string("hi");
        assert_eq!(writer.finish(), vec![0x1A, 0x02, b'h', b'i']);
    }

    #[test]
    fn test_bytes_writes_empty() {
        let data = ProtobufWriter::new().bytes(&[]).bytes(&[0xFF]).finish();
        assert_eq!(data, vec![0x0A, 0x00, 0x12, 0x01, 0xFF]);
    }

    #[test]
    fn test_biguint_str() {
        let mut writer = ProtobufWriter::new();
        writer.biguint_str("18446744073709551616").unwrap();
        let data = writer.finish();
        assert_eq!(data[0], 0x08);
        assert_eq!(data.len(), 1 + biguint_len(1u128 << 64));

        let mut writer = ProtobufWriter::new();
        assert!(writer.biguint_str("-5").is_err());
        assert_eq!(writer.next_field(), 1);
        assert!(writer.is_empty());
    }

    #[test]
    fn test_repeated_share_field_number() {
        let data = ProtobufWriter::new()
            .repeated_varint([1u8, 2, 3])
            .repeated_string(["a", "", "b"])
            .finish();
        assert_eq!(
            data,
            vec![
                0x08, 0x01, 0x08, 0x02, 0x08, 0x03, // field 1
                0x12, 0x01, b'a', 0x12, 0x01, b'b', // field 2
            ]
        );
    }

    #[test]
    fn test_repeated_empty_still_advances() {
        let data = ProtobufWriter::new()
            .repeated_bytes(Vec::<Vec<u8>>::new())
            .varint(1u8)
            .finish();
        assert_eq!(data, vec![0x10, 0x01]);
    }

    #[test]
    fn test_repeated_biguint() {
        let data = ProtobufWriter::new().repeated_biguint([1u64, 128]).finish();
        assert_eq!(data, vec![0x08, 0x01, 0x08, 0x80, 0x01]);
    }

    #[test]
    fn test_biguint_accepts_every_unsigned_width() {
        let data = ProtobufWriter::new()
            .biguint(1u8)
            .biguint(2u16)
            .biguint(None::<u64>)
            .biguint(Some(4u128))
            .finish();
        assert_eq!(data, vec![0x08, 0x01, 0x10, 0x02, 0x20, 0x04]);
    }

    #[test]
    fn test_repeated_biguint_str() {
        let mut writer = ProtobufWriter::new();
        writer.repeated_biguint_str(["1", " 128 "]).unwrap();
        assert_eq!(writer.finish(), vec![0x08, 0x01, 0x08, 0x80, 0x01]);
        assert_eq!(writer.next_field(), 2);
    }

    #[test]
    fn test_repeated_biguint_str_rejects_without_writing() {
        let mut writer = ProtobufWriter::new();
        assert!(writer.repeated_biguint_str(["1", "x2", "3"]).is_err());
        assert!(writer.is_empty());
        assert_eq!(writer.next_field(), 1);
    }

    #[test]
    fn test_message_embeds_inner() {
        let mut inner = ProtobufWriter::new();
        inner.varint(1u8);
        let data = ProtobufWriter::new().message(&inner).finish();
        assert_eq!(data, vec![0x0A, 0x02, 0x08, 0x01]);
    }

    #[test]
    fn test_len_is_exact_before_finish() {
        let mut writer = ProtobufWriter::new();
        writer
            .varint(u64::MAX)
            .string("héllo wörld")
            .bytes(&[0u8; 200])
            .field(1000)
            .biguint(u128::MAX);
        let expected = writer.len();
        let data = writer.finish();
        assert_eq!(data.len(), expected);
    }

    #[test]
    fn test_finish_is_repeatable() {
        let mut writer = ProtobufWriter::new();
        writer.varint(9u8).string("x");
        let first = writer.finish();
        let second = writer.finish();
        assert_eq!(first, second);
        assert_eq!(writer.len(), first.len());
    }

    #[test]
    fn test_large_field_number_tag() {
        // Tag for field 16 is 0x80 0x01
        let data = ProtobufWriter::new().field(16).varint(1u8).finish();
        assert_eq!(data, vec![0x80, 0x01, 0x01]);
    }
}
