// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decode hints.
//!
//! Without a compiled schema the decoder cannot tell a repeated field from a
//! singular one, a `uint64` that needs exact decimal rendering from a small
//! number, or a string from bytes or an embedded message. Callers supply one
//! [`FieldHint`] per field number (index `field_number - 1`); a missing entry
//! means [`Hint::NONE`].
//!
//! Hints for an embedded message hang off its field's [`FieldHint::nested`].
//!
//! Hint lists can also be written as JSON for CLI and config use:
//!
//! ```
//! use pbwire::encoding::protobuf::hint::{parse_hints, Hint};
//!
//! // field 1: singular bigint, field 2: singular string,
//! // field 3: repeated message whose field 1 is a singular string
//! let hints = parse_hints(r#"[3, "singular_string", [0, [5]]]"#).unwrap();
//! assert_eq!(hints[0].hint, Hint::SINGULAR_BIGINT);
//! assert_eq!(hints[2].nested[0].hint, Hint::SINGULAR_STRING);
//! ```

use std::ops::BitOr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::core::{CodecError, Result};

/// Decode-shape bit flags for one field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hint(u8);

impl Hint {
    /// Repeated field; varints as numbers; payloads as nested messages.
    pub const NONE: Hint = Hint(0);
    /// Store one value (last seen wins) instead of a list.
    pub const SINGULAR: Hint = Hint(1);
    /// Render varints as decimal strings.
    pub const BIGINT: Hint = Hint(2);
    /// `SINGULAR | BIGINT`
    pub const SINGULAR_BIGINT: Hint = Hint(3);
    /// Decode length-delimited payloads as UTF-8 text.
    pub const STRING: Hint = Hint(4);
    /// `SINGULAR | STRING`
    pub const SINGULAR_STRING: Hint = Hint(5);

    const MASK: u8 = 0b111;

    /// Build a hint from raw bits; unknown bits are dropped.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Hint(bits & Self::MASK)
    }

    /// Raw bit value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Hint) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn is_singular(self) -> bool {
        self.contains(Self::SINGULAR)
    }

    #[must_use]
    pub const fn is_bigint(self) -> bool {
        self.contains(Self::BIGINT)
    }

    #[must_use]
    pub const fn is_string(self) -> bool {
        self.contains(Self::STRING)
    }

    /// Look up a hint by its symbolic name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Some(Self::NONE),
            "singular" => Some(Self::SINGULAR),
            "bigint" => Some(Self::BIGINT),
            "singular_bigint" => Some(Self::SINGULAR_BIGINT),
            "string" => Some(Self::STRING),
            "singular_string" => Some(Self::SINGULAR_STRING),
            _ => None,
        }
    }
}

impl BitOr for Hint {
    type Output = Hint;

    fn bitor(self, rhs: Hint) -> Hint {
        Hint(self.0 | rhs.0)
    }
}

/// Hint for one field, plus hints for its fields when it is a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldHint {
    pub hint: Hint,
    pub nested: Vec<FieldHint>,
}

impl FieldHint {
    /// Hint for a field holding an embedded message.
    pub fn message(hint: Hint, nested: Vec<FieldHint>) -> Self {
        Self { hint, nested }
    }
}

impl From<Hint> for FieldHint {
    fn from(hint: Hint) -> Self {
        Self {
            hint,
            nested: Vec::new(),
        }
    }
}

/// Build a flat hint list.
pub fn hints(flags: &[Hint]) -> Vec<FieldHint> {
    flags.iter().copied().map(FieldHint::from).collect()
}

/// Hint and nested hints for the field at zero-based `index`.
pub(crate) fn lookup(hints: &[FieldHint], index: usize) -> (Hint, &[FieldHint]) {
    hints
        .get(index)
        .map_or((Hint::NONE, &[][..]), |h| (h.hint, h.nested.as_slice()))
}

/// Parse a JSON hint list.
///
/// Each element is a number (`0..=7`), a symbolic name (`"singular_string"`),
/// `null` (same as `0`), or a two-element array `[hint, [nested...]]`.
/// The outer brackets may be omitted: `3,5` is read as `[3,5]`.
pub fn parse_hints(text: &str) -> Result<Vec<FieldHint>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let json: JsonValue = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)
    } else {
        serde_json::from_str(&format!("[{trimmed}]"))
    }
    .map_err(|e| CodecError::parse("hints", e.to_string()))?;

    hints_from_json(&json)
}

/// Convert an already-parsed JSON hint list.
pub fn hints_from_json(json: &JsonValue) -> Result<Vec<FieldHint>> {
    let items = json
        .as_array()
        .ok_or_else(|| CodecError::parse("hints", format!("expected array, got {json}")))?;
    items.iter().map(field_hint_from_json).collect()
}

fn field_hint_from_json(item: &JsonValue) -> Result<FieldHint> {
    match item {
        JsonValue::Array(pair) => match pair.as_slice() {
            [hint, nested] => Ok(FieldHint::message(
                hint_from_json(hint)?,
                hints_from_json(nested)?,
            )),
            _ => Err(CodecError::parse(
                "hints",
                format!("nested hint must be [hint, [..]], got {item}"),
            )),
        },
        other => hint_from_json(other).map(FieldHint::from),
    }
}

fn hint_from_json(item: &JsonValue) -> Result<Hint> {
    match item {
        JsonValue::Null => Ok(Hint::NONE),
        JsonValue::Number(n) => match n.as_u64() {
            Some(bits) if bits <= u64::from(Hint::MASK) => Ok(Hint::from_bits(bits as u8)),
            _ => Err(CodecError::parse("hints", format!("hint out of range: {n}"))),
        },
        JsonValue::String(name) => Hint::from_name(name)
            .ok_or_else(|| CodecError::parse("hints", format!("unknown hint name: {name}"))),
        other => Err(CodecError::parse("hints", format!("invalid hint: {other}"))),
    }
}
