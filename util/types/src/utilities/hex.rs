//! `0x`-prefixed hex strings.

use crate::core::error::EntityError;

/// Encodes bytes as a `0x`-prefixed lower-case hex string.
pub fn encode(bytes: &[u8]) -> String {
    format!("0x{}", faster_hex::hex_string(bytes))
}

/// Decodes a hex string, with or without the `0x` prefix.
pub fn decode(s: &str) -> Result<Vec<u8>, EntityError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() {
        return Ok(Vec::new());
    }
    if digits.len() % 2 != 0 {
        return Err(EntityError::InvalidHex(s.to_owned()));
    }
    let mut bytes = vec![0u8; digits.len() / 2];
    faster_hex::hex_decode(digits.as_bytes(), &mut bytes)
        .map_err(|_| EntityError::InvalidHex(s.to_owned()))?;
    Ok(bytes)
}
