// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encode command - build well-known messages and varints.

use clap::Subcommand;

use crate::common::{parse_hex, Result};
use pbwire::encoding::protobuf::{any, biguint_len, coin, encode_biguint, parse_biguint, temporal};

/// Encode a message and print it as hex.
#[derive(Subcommand, Clone, Debug)]
pub enum EncodeCmd {
    /// Cosmos Coin message
    Coin {
        /// Denomination, e.g. uscrt
        denom: String,

        /// Amount as a decimal integer
        amount: String,
    },

    /// Timestamp/Duration message from milliseconds
    Temporal {
        #[arg(value_name = "MILLIS")]
        millis: u64,
    },

    /// Any envelope around a hex payload
    Any {
        /// Type URL, e.g. /cosmos.bank.v1beta1.MsgSend
        type_url: String,

        /// Payload bytes as hex
        #[arg(value_name = "PAYLOAD_HEX")]
        payload: String,
    },

    /// Bare varint of a decimal integer (up to 128 bits)
    Varint {
        #[arg(value_name = "DECIMAL")]
        value: String,
    },
}

impl EncodeCmd {
    pub fn run(self) -> Result<()> {
        match self {
            EncodeCmd::Coin { denom, amount } => {
                let amount = parse_biguint(&amount)?.to_string();
                println!("{}", hex::encode(coin(&denom, &amount)));
            }
            EncodeCmd::Temporal { millis } => {
                println!("{}", hex::encode(temporal(millis)));
            }
            EncodeCmd::Any { type_url, payload } => {
                let payload = parse_hex(&payload)?;
                println!("{}", hex::encode(any(&type_url, &payload)));
            }
            EncodeCmd::Varint { value } => cmd_varint(&value)?,
        }
        Ok(())
    }
}

/// Cmd: Print a varint and its length
fn cmd_varint(value: &str) -> Result<()> {
    let value = parse_biguint(value)?;
    let mut buf = vec![0u8; biguint_len(value)];
    encode_biguint(&mut buf, 0, value);
    println!("{} ({} bytes)", hex::encode(&buf), buf.len());
    Ok(())
}
