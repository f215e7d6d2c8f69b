// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for pbwire.
//!
//! Covers the hard failures of the wire codec:
//! - Truncated varints and length-delimited payloads
//! - Varints that overflow their accumulator
//! - Invalid UTF-8 in string-hinted fields
//! - Malformed decimal integers and hint specs
//!
//! A field sequence the schemaless decoder does not trust is *not* an error;
//! it is reported as [`DecodeResult::Opaque`](crate::DecodeResult::Opaque).

use std::fmt;

/// Errors that can occur while encoding or decoding wire data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Parse error in textual input (decimal integers, hint specs, hex)
    ParseError {
        /// What was being parsed
        context: String,
        /// Error message
        message: String,
    },

    /// Buffer ended in the middle of a varint
    BufferTooShort {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when error occurred
        cursor_pos: u64,
    },

    /// Length-delimited field declares more bytes than remain
    LengthExceeded {
        /// Declared length
        length: usize,
        /// Position of the payload in the buffer
        position: usize,
        /// Buffer length
        buffer_len: usize,
    },

    /// Varint does not fit the accumulator
    VarintOverflow {
        /// Width of the accumulator in bits
        max_bits: u32,
        /// Position of the first varint byte
        cursor_pos: u64,
    },

    /// String-hinted field is not valid UTF-8
    InvalidUtf8 {
        /// One-based protobuf field number
        field_number: u32,
        /// Position of the payload in the buffer
        cursor_pos: u64,
    },

    /// Other error
    Other(String),
}

impl CodecError {
    /// Create a parse error.
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::ParseError {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a buffer too short error.
    pub fn buffer_too_short(requested: usize, available: usize, cursor_pos: u64) -> Self {
        CodecError::BufferTooShort {
            requested,
            available,
            cursor_pos,
        }
    }

    /// Create a length exceeded error.
    pub fn length_exceeded(length: usize, position: usize, buffer_len: usize) -> Self {
        CodecError::LengthExceeded {
            length,
            position,
            buffer_len,
        }
    }

    /// Create a varint overflow error.
    pub fn varint_overflow(max_bits: u32, cursor_pos: u64) -> Self {
        CodecError::VarintOverflow {
            max_bits,
            cursor_pos,
        }
    }

    /// Create an invalid UTF-8 error.
    pub fn invalid_utf8(field_number: u32, cursor_pos: u64) -> Self {
        CodecError::InvalidUtf8 {
            field_number,
            cursor_pos,
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::ParseError { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            CodecError::BufferTooShort {
                requested,
                available,
                cursor_pos,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("cursor", cursor_pos.to_string()),
            ],
            CodecError::LengthExceeded {
                length,
                position,
                buffer_len,
            } => vec![
                ("length", length.to_string()),
                ("position", position.to_string()),
                ("buffer_len", buffer_len.to_string()),
            ],
            CodecError::VarintOverflow {
                max_bits,
                cursor_pos,
            } => vec![
                ("max_bits", max_bits.to_string()),
                ("cursor", cursor_pos.to_string()),
            ],
            CodecError::InvalidUtf8 {
                field_number,
                cursor_pos,
            } => vec![
                ("field", field_number.to_string()),
                ("cursor", cursor_pos.to_string()),
            ],
            CodecError::Other(msg) => vec![("message", msg.clone())],
        }
    }

    /// Whether this error describes a buffer that ends or overruns early.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            CodecError::BufferTooShort { .. } | CodecError::LengthExceeded { .. }
        )
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::ParseError { context, message } => {
                write!(f, "Parse error in {context}: {message}")
            }
            CodecError::BufferTooShort {
                requested,
                available,
                cursor_pos,
            } => write!(
                f,
                "Buffer too short: requested {requested} bytes at position {cursor_pos}, but only {available} bytes available"
            ),
            CodecError::LengthExceeded {
                length,
                position,
                buffer_len,
            } => write!(
                f,
                "Length {length} exceeds buffer at position {position} (buffer length: {buffer_len})"
            ),
            CodecError::VarintOverflow {
                max_bits,
                cursor_pos,
            } => write!(
                f,
                "Varint at position {cursor_pos} overflows {max_bits}-bit accumulator"
            ),
            CodecError::InvalidUtf8 {
                field_number,
                cursor_pos,
            } => write!(
                f,
                "Field {field_number} at position {cursor_pos} is not valid UTF-8"
            ),
            CodecError::Other(msg) => write!(f, "Other error: {msg}"),
        }
    }
}

impl std::error::Error for CodecError {}

/// Result type for pbwire operations.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error() {
        let err = CodecError::parse("biguint", "empty input");
        assert!(matches!(err, CodecError::ParseError { .. }));
        assert_eq!(err.to_string(), "Parse error in biguint: empty input");
    }

    #[test]
    fn test_buffer_too_short_error() {
        let err = CodecError::buffer_too_short(1, 0, 10);
        assert_eq!(
            err.to_string(),
            "Buffer too short: requested 1 bytes at position 10, but only 0 bytes available"
        );
        assert!(err.is_truncation());
    }

    #[test]
    fn test_length_exceeded_error() {
        let err = CodecError::length_exceeded(1000, 2, 8);
        assert_eq!(
            err.to_string(),
            "Length 1000 exceeds buffer at position 2 (buffer length: 8)"
        );
        assert!(err.is_truncation());
    }

    #[test]
    fn test_varint_overflow_error() {
        let err = CodecError::varint_overflow(64, 3);
        assert_eq!(
            err.to_string(),
            "Varint at position 3 overflows 64-bit accumulator"
        );
        assert!(!err.is_truncation());
    }

    #[test]
    fn test_invalid_utf8_error() {
        let err = CodecError::invalid_utf8(2, 4);
        assert_eq!(err.to_string(), "Field 2 at position 4 is not valid UTF-8");
    }

    #[test]
    fn test_other_error() {
        let err = CodecError::Other("something went wrong".to_string());
        assert_eq!(err.to_string(), "Other error: something went wrong");
    }

    #[test]
    fn test_log_fields_length_exceeded() {
        let err = CodecError::length_exceeded(1000, 500, 800);
        let fields = err.log_fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], ("length", "1000".to_string()));
        assert_eq!(fields[1], ("position", "500".to_string()));
        assert_eq!(fields[2], ("buffer_len", "800".to_string()));
    }

    #[test]
    fn test_log_fields_varint_overflow() {
        let err = CodecError::varint_overflow(128, 7);
        let fields = err.log_fields();
        assert_eq!(fields, vec![("max_bits", "128".to_string()), ("cursor", "7".to_string())]);
    }

    #[test]
    fn test_log_fields_invalid_utf8() {
        let err = CodecError::invalid_utf8(3, 9);
        let fields = err.log_fields();
        assert_eq!(fields[0], ("field", "3".to_string()));
        assert_eq!(fields[1], ("cursor", "9".to_string()));
    }

    #[test]
    fn test_error_clone() {
        let err1 = CodecError::parse("Context", "message");
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
