//! LE Secure Connections security functions (Core Specification Vol 3, Part H, 2.2.6-2.2.11).
//!
//! Each function is one fixed-layout message authenticated with [`aes_cmac`]. The Core
//! Specification lists fields most significant first; in the crate's octet order the message
//! is built from the last field to the first, so the rightmost field sits at offset 0.

use log::trace;
use zeroize::Zeroizing;

use crate::block::{Octet16, Octet32};
use crate::cmac::aes_cmac;
use crate::field::{key_id, Address, IoCap, KeyId};

/// `SALT` of f5: `0x6C888391_AAF5A538_60370BDB_5A6083BE`.
const F5_SALT: Octet16 = [
    0xbe, 0x83, 0x60, 0x5a, 0xdb, 0x0b, 0x37, 0x60, 0x38, 0xa5, 0xf5, 0xaa, 0x91, 0x83, 0x88,
    0x6c,
];

const F5_KEY_ID: KeyId = key_id(b"btle");

/// `Length` of f5 in bits. Fixed at two 128-bit outputs (counter 0 and 1).
const F5_LENGTH: [u8; 2] = 256u16.to_le_bytes();

/// Concatenates `fields` into an `N`-octet message in the order given.
fn concat<const N: usize>(fields: &[&[u8]]) -> [u8; N] {
    let mut msg = [0u8; N];
    let mut pos = 0;
    for field in fields {
        msg[pos..pos + field.len()].copy_from_slice(field);
        pos += field.len();
    }
    debug_assert_eq!(pos, N, "message layout does not fill the buffer");
    msg
}

/// Link key conversion function h6: `AES-CMAC_W(keyID)`.
pub fn h6(w: &Octet16, key_id: &KeyId) -> Octet16 {
    trace!("h6: key id {:02x?}", key_id);
    aes_cmac(w, key_id)
}

/// Link key conversion function h7: `AES-CMAC_SALT(W)`.
pub fn h7(salt: &Octet16, w: &Octet16) -> Octet16 {
    trace!("h7");
    aes_cmac(salt, w)
}

/// Confirm value generation function f4: `AES-CMAC_X(U || V || Z)`.
pub fn f4(u: &Octet32, v: &Octet32, x: &Octet16, z: u8) -> Octet16 {
    trace!("f4: z={z:#04x}");
    let msg: [u8; 65] = concat(&[[z].as_slice(), v.as_slice(), u.as_slice()]);
    aes_cmac(x, &msg)
}

/// Key generation function f5.
///
/// `T = AES-CMAC_SALT(W)`, then `AES-CMAC_T(Counter || keyID || N1 || N2 || A1 || A2 ||
/// Length)` for counter 0 (MacKey) and 1 (LTK). Returns `(MacKey, LTK)`.
pub fn f5(
    w: &Octet32,
    n1: &Octet16,
    n2: &Octet16,
    a1: &Address,
    a2: &Address,
) -> (Octet16, Octet16) {
    trace!("f5");
    let t = Zeroizing::new(aes_cmac(&F5_SALT, w));
    let derive = |counter: u8| {
        let msg: [u8; 53] = concat(&[
            F5_LENGTH.as_slice(),
            a2.as_slice(),
            a1.as_slice(),
            n2.as_slice(),
            n1.as_slice(),
            F5_KEY_ID.as_slice(),
            [counter].as_slice(),
        ]);
        aes_cmac(&t, &msg)
    };
    (derive(0), derive(1))
}

/// Check value generation function f6: `AES-CMAC_W(N1 || N2 || R || IOcap || A1 || A2)`.
pub fn f6(
    w: &Octet16,
    n1: &Octet16,
    n2: &Octet16,
    r: &Octet16,
    io_cap: &IoCap,
    a1: &Address,
    a2: &Address,
) -> Octet16 {
    trace!("f6");
    let msg: [u8; 65] = concat(&[
        a2.as_slice(),
        a1.as_slice(),
        io_cap.as_slice(),
        r.as_slice(),
        n2.as_slice(),
        n1.as_slice(),
    ]);
    aes_cmac(w, &msg)
}

/// Numeric comparison value generation function g2.
///
/// `AES-CMAC_X(U || V || Y) mod 2^32`, reduced to six decimal digits.
pub fn g2(u: &Octet32, v: &Octet32, x: &Octet16, y: &Octet16) -> u32 {
    trace!("g2");
    let msg: [u8; 80] = concat(&[y.as_slice(), v.as_slice(), u.as_slice()]);
    let tag = aes_cmac(x, &msg);
    // Least significant 32 bits of the tag.
    let low = u32::from_le_bytes([tag[0], tag[1], tag[2], tag[3]]);
    low % 1_000_000
}
