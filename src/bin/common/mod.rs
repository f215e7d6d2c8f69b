// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Parse hex input, ignoring an optional `0x` prefix and any whitespace.
pub fn parse_hex(s: &str) -> CliResult<Vec<u8>> {
    let trimmed = s.trim();
    let digits: String = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    hex::decode(&digits).map_err(|e| anyhow::anyhow!("Invalid hex input: {e}"))
}

/// Render JSON, pretty unless `compact`.
pub fn render_json(value: &serde_json::Value, compact: bool) -> CliResult<String> {
    Ok(if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("0801").unwrap(), vec![0x08, 0x01]);
        assert_eq!(parse_hex("0x0A 02\n6869").unwrap(), vec![0x0A, 0x02, 0x68, 0x69]);
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
        assert!(parse_hex("0g").is_err());
        assert!(parse_hex("abc").is_err());
    }

    #[test]
    fn test_render_json() {
        let value = serde_json::json!([1, "a"]);
        assert_eq!(render_json(&value, true).unwrap(), r#"[1,"a"]"#);
        assert!(render_json(&value, false).unwrap().contains('\n'));
    }
}
