/// Bytes of cell data holding a UDT balance.
pub const UDT_BALANCE_LEN: usize = 16;

/// Decodes the UDT balance, the little-endian `u128` in the first 16 bytes of cell data.
///
/// Shorter data is zero-extended, so empty data holds a zero balance.
pub fn udt_balance(data: &[u8]) -> u128 {
    let mut buf = [0u8; UDT_BALANCE_LEN];
    let len = data.len().min(UDT_BALANCE_LEN);
    buf[..len].copy_from_slice(&data[..len]);
    u128::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::udt_balance;

    #[test]
    fn reads_little_endian_prefix() {
        assert_eq!(udt_balance(&[]), 0);
        assert_eq!(udt_balance(&[1, 1]), 257);
        let mut data = 100u128.to_le_bytes().to_vec();
        data.extend_from_slice(b"trailing");
        assert_eq!(udt_balance(&data), 100);
    }
}
