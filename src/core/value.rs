// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decoded value model.
//!
//! The schemaless decoder produces a sparse field array indexed by
//! `field_number - 1`. Every slot is either a single value (when the field was
//! hinted `SINGULAR`) or the ordered list of values seen for that field.
//!
//! All types are serde-serializable; [`DecodeResult::to_json`] renders the
//! JSON-facing shape consumed by generated API clients.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A single decoded wire value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodedValue {
    /// Varint rendered as a native number
    Varint(u64),

    /// Varint rendered as a decimal string (`BIGINT` hint)
    BigInt(String),

    /// Length-delimited payload decoded as UTF-8 (`STRING` hint)
    String(String),

    /// Length-delimited payload that did not decode as a message
    Bytes(Vec<u8>),

    /// Length-delimited payload decoded as a nested message
    Message(DecodedMessage),
}

impl DecodedValue {
    /// Get the native number, if this is a plain varint.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            DecodedValue::Varint(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as a 128-bit integer (plain or big-integer varints).
    pub fn as_u128(&self) -> Option<u128> {
        match self {
            DecodedValue::Varint(v) => Some(u128::from(*v)),
            DecodedValue::BigInt(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Get the text of a string or big-integer value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::String(s) | DecodedValue::BigInt(s) => Some(s),
            _ => None,
        }
    }

    /// Get the raw payload of an undecoded length-delimited value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            DecodedValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get the nested message.
    pub fn as_message(&self) -> Option<&DecodedMessage> {
        match self {
            DecodedValue::Message(m) => Some(m),
            _ => None,
        }
    }

    /// Render as JSON.
    pub fn to_json(&self) -> JsonValue {
        match self {
            DecodedValue::Varint(v) => JsonValue::from(*v),
            DecodedValue::BigInt(s) | DecodedValue::String(s) => JsonValue::String(s.clone()),
            DecodedValue::Bytes(b) => JsonValue::String(hex::encode(b)),
            DecodedValue::Message(m) => m.to_json(),
        }
    }
}

/// All values decoded for one field number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodedField {
    /// Last value seen (`SINGULAR` hint)
    Singular(DecodedValue),

    /// Every value seen, in encounter order
    Repeated(Vec<DecodedValue>),
}

impl DecodedField {
    /// All values of this field as a slice.
    pub fn values(&self) -> &[DecodedValue] {
        match self {
            DecodedField::Singular(v) => std::slice::from_ref(v),
            DecodedField::Repeated(vs) => vs,
        }
    }

    /// First value of this field.
    pub fn first(&self) -> Option<&DecodedValue> {
        self.values().first()
    }

    /// Check if this field was decoded as singular.
    pub fn is_singular(&self) -> bool {
        matches!(self, DecodedField::Singular(_))
    }

    /// Render as JSON: bare value when singular, array otherwise.
    pub fn to_json(&self) -> JsonValue {
        match self {
            DecodedField::Singular(v) => v.to_json(),
            DecodedField::Repeated(vs) => {
                JsonValue::Array(vs.iter().map(DecodedValue::to_json).collect())
            }
        }
    }
}

/// Sparse field array indexed by `field_number - 1`.
///
/// Unpopulated slots are holes, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedMessage {
    fields: Vec<Option<DecodedField>>,
}

impl DecodedMessage {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots, i.e. the highest field number seen.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no field was decoded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get the field at a zero-based slot index.
    pub fn get(&self, index: usize) -> Option<&DecodedField> {
        self.fields.get(index).and_then(Option::as_ref)
    }

    /// Get a field by its one-based protobuf field number.
    pub fn field(&self, number: u32) -> Option<&DecodedField> {
        let index = (number as usize).checked_sub(1)?;
        self.get(index)
    }

    /// First value of the field at a zero-based slot index.
    pub fn first_value(&self, index: usize) -> Option<&DecodedValue> {
        self.get(index).and_then(DecodedField::first)
    }

    /// Consume the message, keeping only the first value at a slot index.
    pub fn into_first_value(self, index: usize) -> Option<DecodedValue> {
        match self.fields.into_iter().nth(index).flatten()? {
            DecodedField::Singular(v) => Some(v),
            DecodedField::Repeated(vs) => vs.into_iter().next(),
        }
    }

    /// Iterate over populated fields as `(field_number, field)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &DecodedField)> {
        self.fields
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().map(|f| (i as u32 + 1, f)))
    }

    /// Store a value at `index`, replacing whatever was there.
    pub(crate) fn set_singular(&mut self, index: usize, value: DecodedValue) {
        *self.slot(index) = Some(DecodedField::Singular(value));
    }

    /// Append a value to the list at `index`.
    pub(crate) fn push_repeated(&mut self, index: usize, value: DecodedValue) {
        let slot = self.slot(index);
        match slot {
            Some(DecodedField::Repeated(values)) => values.push(value),
            _ => *slot = Some(DecodedField::Repeated(vec![value])),
        }
    }

    fn slot(&mut self, index: usize) -> &mut Option<DecodedField> {
        if index >= self.fields.len() {
            self.fields.resize(index + 1, None);
        }
        &mut self.fields[index]
    }

    /// Render as a JSON array with `null` holes.
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Array(
            self.fields
                .iter()
                .map(|f| f.as_ref().map_or(JsonValue::Null, DecodedField::to_json))
                .collect(),
        )
    }
}

/// Outcome of a schemaless decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeResult {
    /// Field sequence was trusted and decoded
    Structured(DecodedMessage),

    /// Field sequence was not trusted; the input bytes, unchanged
    Opaque(Vec<u8>),
}

impl DecodeResult {
    /// Check if the decoder fell back to raw bytes.
    pub fn is_opaque(&self) -> bool {
        matches!(self, DecodeResult::Opaque(_))
    }

    /// Get the structured message, if any.
    pub fn as_message(&self) -> Option<&DecodedMessage> {
        match self {
            DecodeResult::Structured(m) => Some(m),
            DecodeResult::Opaque(_) => None,
        }
    }

    /// Consume into the structured message, if any.
    pub fn into_message(self) -> Option<DecodedMessage> {
        match self {
            DecodeResult::Structured(m) => Some(m),
            DecodeResult::Opaque(_) => None,
        }
    }

    /// Render as JSON. Opaque input becomes `{"opaque": "<hex>"}`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            DecodeResult::Structured(m) => m.to_json(),
            DecodeResult::Opaque(b) => serde_json::json!({ "opaque": hex::encode(b) }),
        }
    }
}
