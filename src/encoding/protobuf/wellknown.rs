// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Typed codecs for small well-known messages.
//!
//! - `google.protobuf.Any`: `type_url = 1`, `value = 2`
//! - `cosmos.base.v1beta1.Coin`: `denom = 1`, `amount = 2` (both strings)
//! - `google.protobuf.Timestamp` / `Duration`: `seconds = 1`, `nanos = 2`

use serde::{Deserialize, Serialize};

use super::decoder::{DecoderOptions, ProtobufDecoder};
use super::hint::{hints, Hint};
use super::writer::ProtobufWriter;
use crate::core::{CodecError, DecodedMessage, DecodedValue, Result};

const MILLIS_PER_SEC: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;

/// A Cosmos SDK coin amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    /// Decimal integer string
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }

    /// Encode as a `Coin` message.
    pub fn encode(&self) -> Vec<u8> {
        coin(&self.denom, &self.amount)
    }
}

/// An `Any` envelope with its payload left undecoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnyMessage {
    pub type_url: String,
    pub value: Vec<u8>,
}

/// Encode an `Any` envelope.
pub fn any(type_url: &str, value: &[u8]) -> Vec<u8> {
    ProtobufWriter::new().string(type_url).bytes(value).finish()
}

/// Encode a `Coin`. Arguments are in wire order.
pub fn coin(denom: &str, amount: &str) -> Vec<u8> {
    ProtobufWriter::new().string(denom).string(amount).finish()
}

/// Encode each coin, ready for [`ProtobufWriter::repeated_bytes`].
pub fn coins(coins: &[Coin]) -> Vec<Vec<u8>> {
    coins.iter().map(Coin::encode).collect()
}

/// Encode milliseconds since the epoch (or a span in milliseconds) as a
/// `Timestamp`/`Duration` pair.
pub fn temporal(millis: u64) -> Vec<u8> {
    ProtobufWriter::new()
        .varint(millis / MILLIS_PER_SEC)
        .varint((millis % MILLIS_PER_SEC) * NANOS_PER_MILLI)
        .finish()
}

fn decode_structured(context: &str, data: &[u8], hint_list: &[Hint]) -> Result<DecodedMessage> {
    // Depth 0 keeps length-delimited payloads as raw bytes.
    let decoder = ProtobufDecoder::with_options(DecoderOptions::new().with_max_depth(0));
    decoder
        .decode(data, &hints(hint_list))?
        .into_message()
        .ok_or_else(|| CodecError::parse(context, "untrusted field sequence"))
}

fn string_at(message: &DecodedMessage, index: usize) -> String {
    message
        .first_value(index)
        .and_then(DecodedValue::as_str)
        .unwrap_or_default()
        .to_string()
}

fn varint_at(message: &DecodedMessage, index: usize) -> u64 {
    message
        .first_value(index)
        .and_then(DecodedValue::as_u64)
        .unwrap_or_default()
}

/// Decode an `Any` envelope. Missing fields decode as empty.
pub fn decode_any(data: &[u8]) -> Result<AnyMessage> {
    let message = decode_structured("any", data, &[Hint::SINGULAR_STRING, Hint::SINGULAR])?;
    let value = message
        .first_value(1)
        .and_then(DecodedValue::as_bytes)
        .map(<[u8]>::to_vec)
        .unwrap_or_default();
    Ok(AnyMessage {
        type_url: string_at(&message, 0),
        value,
    })
}

/// Decode a `Coin`. Missing fields decode as empty strings.
pub fn decode_coin(data: &[u8]) -> Result<Coin> {
    let message = decode_structured(
        "coin",
        data,
        &[Hint::SINGULAR_STRING, Hint::SINGULAR_STRING],
    )?;
    Ok(Coin {
        denom: string_at(&message, 0),
        amount: string_at(&message, 1),
    })
}

/// Decode each encoded coin.
pub fn decode_coins<I>(payloads: I) -> Result<Vec<Coin>>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    payloads
        .into_iter()
        .map(|p| decode_coin(p.as_ref()))
        .collect()
}

/// Decode a `Timestamp`/`Duration` pair into milliseconds.
pub fn decode_temporal(data: &[u8]) -> Result<u64> {
    let message = decode_structured("temporal", data, &[Hint::SINGULAR, Hint::SINGULAR])?;
    let seconds = varint_at(&message, 0);
    let nanos = varint_at(&message, 1);
    seconds
        .checked_mul(MILLIS_PER_SEC)
        .and_then(|ms| ms.checked_add(nanos / NANOS_PER_MILLI))
        .ok_or_else(|| CodecError::parse("temporal", format!("{seconds}s overflows u64 millis")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_wire_order() {
        let data = coin("uscrt", "1000");
        let mut expected = vec![0x0A, 0x05];
        expected.extend_from_slice(b"uscrt");
        expected.extend_from_slice(&[0x12, 0x04]);
        expected.extend_from_slice(b"1000");
        assert_eq!(data, expected);
    }

    #[test]
    fn test_coin_round_trip() {
        let c = Coin::new("uscrt", "123456789012345678901234567890");
        assert_eq!(decode_coin(&c.encode()).unwrap(), c);
    }

    #[test]
    fn test_coin_empty_denom() {
        let c = Coin::new("", "5");
        assert_eq!(decode_coin(&c.encode()).unwrap(), c);
    }

    #[test]
    fn test_coins_round_trip() {
        let list = vec![Coin::new("uscrt", "1"), Coin::new("uatom", "22")];
        let encoded = coins(&list);
        assert_eq!(encoded.len(), 2);
        assert_eq!(decode_coins(&encoded).unwrap(), list);
    }

    #[test]
    fn test_any_round_trip() {
        let payload = coin("uscrt", "1");
        let data = any("/cosmos.base.v1beta1.Coin", &payload);
        let decoded = decode_any(&data).unwrap();
        assert_eq!(decoded.type_url, "/cosmos.base.v1beta1.Coin");
        assert_eq!(decoded.value, payload);
    }

    #[test]
    fn test_temporal_encoding() {
        assert_eq!(temporal(1_500), vec![0x08, 0x01, 0x10, 0x80, 0xCA, 0xB5, 0xEE, 0x01]);
        assert_eq!(temporal(0), vec![0x08, 0x00, 0x10, 0x00]);
    }

    #[test]
    fn test_temporal_round_trip() {
        for millis in [0u64, 1, 999, 1_000, 1_700_000_000_123] {
            assert_eq!(decode_temporal(&temporal(millis)).unwrap(), millis);
        }
    }

    #[test]
    fn test_decode_rejects_untrusted() {
        // Field 3 first
        let data = [0x18, 0x01];
        assert!(decode_temporal(&data).is_err());
        assert!(decode_coin(&data).is_err());
    }
}
