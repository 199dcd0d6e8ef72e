//! LE legacy pairing and key diversification functions
//! (Core Specification Vol 3, Part H, 2.2.3, 2.2.4 and Appendix B).

use log::trace;

use crate::block::{xor_in_place, Octet16};
use crate::cipher::{encrypt_block, expand_key};
use crate::field::AddressType;

/// Confirm value generation function c1.
///
/// `c1 = e(k, e(k, r XOR p1) XOR p2)` with `p1 = pres || preq || rat' || iat'` and
/// `p2 = padding || ia || ra`. `preq`/`pres` are the 7-octet Pairing Request and Pairing
/// Response PDUs as sent, opcode first.
#[allow(clippy::too_many_arguments)]
pub fn c1(
    k: &Octet16,
    r: &Octet16,
    preq: &[u8; 7],
    pres: &[u8; 7],
    iat: AddressType,
    ia: &[u8; 6],
    rat: AddressType,
    ra: &[u8; 6],
) -> Octet16 {
    trace!("c1");
    let mut p1 = [0u8; 16];
    p1[0] = iat.octet();
    p1[1] = rat.octet();
    p1[2..9].copy_from_slice(preq);
    p1[9..16].copy_from_slice(pres);

    let mut p2 = [0u8; 16];
    p2[0..6].copy_from_slice(ra);
    p2[6..12].copy_from_slice(ia);

    let round_keys = expand_key(k);
    let mut block = *r;
    xor_in_place(&mut block, &p1);
    let mut block = round_keys.encrypt(&block);
    xor_in_place(&mut block, &p2);
    round_keys.encrypt(&block)
}

/// Key generation function s1: `e(k, r1' || r2')` where `r1'`, `r2'` are the least
/// significant 64 bits of `r1` (Srand) and `r2` (Mrand).
pub fn s1(k: &Octet16, r1: &Octet16, r2: &Octet16) -> Octet16 {
    trace!("s1");
    let mut r = [0u8; 16];
    r[..8].copy_from_slice(&r2[..8]);
    r[8..].copy_from_slice(&r1[..8]);
    encrypt_block(k, &r)
}

/// Diversifying function d1: `e(k, padding || r || d)`.
///
/// The LTK is `d1(ER, DIV, 0)` and the CSRK is `d1(ER, DIV, 1)`.
pub fn d1(k: &Octet16, d: u16, r: u16) -> Octet16 {
    trace!("d1: r={r}");
    let mut block = [0u8; 16];
    block[..2].copy_from_slice(&d.to_le_bytes());
    block[2..4].copy_from_slice(&r.to_le_bytes());
    encrypt_block(k, &block)
}

/// Mask generation function dm: `e(k, padding || r) mod 2^16`.
///
/// XORed with DIV to produce EDIV.
pub fn dm(k: &Octet16, r: &[u8; 8]) -> u16 {
    trace!("dm");
    let mut block = [0u8; 16];
    block[..8].copy_from_slice(r);
    let out = encrypt_block(k, &block);
    u16::from_le_bytes([out[0], out[1]])
}
