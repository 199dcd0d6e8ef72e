//! Octet string helpers.

/// 128-bit value (key, nonce, MAC tag), least-significant octet first.
pub type Octet16 = [u8; 16];

/// 256-bit value such as a P-256 X coordinate or a DHKey, least-significant octet first.
pub type Octet32 = [u8; 32];

/// XORs two blocks, writing the result into `dst`.
#[inline]
pub(crate) fn xor_in_place(dst: &mut Octet16, rhs: &Octet16) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}

#[inline]
pub(crate) fn reversed(block: &Octet16) -> Octet16 {
    let mut out = *block;
    out.reverse();
    out
}

/// Parses the most-significant-first hex notation used by the Core Specification's
/// sample data into the crate's octet order.
#[cfg(test)]
pub(crate) fn from_msb_hex<const N: usize>(hex_str: &str) -> [u8; N] {
    let compact: String = hex_str.split_whitespace().collect();
    let mut bytes: [u8; N] = hex::decode(compact)
        .expect("valid hex")
        .try_into()
        .expect("hex length matches");
    bytes.reverse();
    bytes
}
