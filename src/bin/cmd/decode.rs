// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decode command - print protobuf bytes as JSON.

use clap::Args;

use crate::common::{parse_hex, render_json, Result};
use pbwire::{parse_hints, DecoderOptions, ProtobufDecoder, DEFAULT_MAX_DEPTH};

/// Decode hex-encoded protobuf bytes.
#[derive(Args, Clone, Debug)]
pub struct DecodeCmd {
    /// Message bytes as hex (optional 0x prefix)
    #[arg(value_name = "HEX")]
    input: String,

    /// Hint list, e.g. "3,5" or '[0,[5,[3]]]'
    #[arg(long, default_value = "")]
    hints: String,

    /// Deepest embedded message to decode
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print JSON on one line
    #[arg(long)]
    compact: bool,
}

impl DecodeCmd {
    pub fn run(self) -> Result<()> {
        let data = parse_hex(&self.input)?;
        let hints = parse_hints(&self.hints)?;

        let decoder =
            ProtobufDecoder::with_options(DecoderOptions::new().with_max_depth(self.max_depth));
        let result = decoder.decode(&data, &hints)?;

        println!("{}", render_json(&result.to_json(), self.compact)?);
        Ok(())
    }
}
