// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout pbwire.
//!
//! This module provides the foundational types for the library:
//! - [`CodecError`] - Error handling
//! - [`DecodeResult`] - Structured-or-opaque decode outcome
//! - [`DecodedMessage`] / [`DecodedField`] / [`DecodedValue`] - Sparse field array

pub mod error;
pub mod value;

pub use error::{CodecError, Result};
pub use value::{DecodeResult, DecodedField, DecodedMessage, DecodedValue};
