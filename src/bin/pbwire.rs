// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # pbwire CLI
//!
//! Inspect and build protobuf wire data without a schema.
//!
//! ## Usage
//!
//! ```sh
//! # Decode with hints (field 1 singular bigint, field 2 singular string)
//! pbwire decode 08e80712057573637274 --hints 3,5
//!
//! # Encode a Coin
//! pbwire encode coin uscrt 1000
//!
//! # Show a varint encoding
//! pbwire encode varint 300
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{DecodeCmd, EncodeCmd};
use common::Result;

/// pbwire - schemaless protobuf wire toolkit
#[derive(Parser, Clone)]
#[command(name = "pbwire")]
#[command(about = "Decode and encode protobuf wire data without a schema", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Decode hex bytes into JSON
    Decode(DecodeCmd),

    /// Encode well-known messages and varints as hex
    #[command(subcommand)]
    Encode(EncodeCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode(cmd) => cmd.run(),
        Commands::Encode(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
