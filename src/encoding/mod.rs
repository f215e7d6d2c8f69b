// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire encodings.
//!
//! - [`protobuf`] - Schemaless Protocol Buffers decoding and message writing

pub mod protobuf;

pub use protobuf::{ProtobufDecoder, ProtobufWriter};
