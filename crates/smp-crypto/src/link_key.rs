//! Cross-transport key derivation between an LE LTK and a BR/EDR link key
//! (Core Specification Vol 3, Part H, 2.4.2.4 and 2.4.2.5).
//!
//! Both directions run two stages: an intermediate key from h7 with a salt (when both sides
//! set CT2) or from h6 with a `tmp` tag, then h6 with the direction tag. The two functions are
//! not inverses of each other.

use log::trace;
use zeroize::Zeroizing;

use crate::block::Octet16;
use crate::field::{key_id, tag_salt, KeyId};
use crate::kdf::{h6, h7};

const TMP1: KeyId = key_id(b"tmp1");
const TMP2: KeyId = key_id(b"tmp2");
const SALT_TMP1: Octet16 = tag_salt(b"tmp1");
const SALT_TMP2: Octet16 = tag_salt(b"tmp2");
const LEBR: KeyId = key_id(b"lebr");
const BRLE: KeyId = key_id(b"brle");

/// Derives the BR/EDR link key from an LE Secure Connections LTK.
pub fn ltk_to_link_key(ltk: &Octet16, use_h7: bool) -> Octet16 {
    trace!("ltk_to_link_key: use_h7={use_h7}");
    let ilk = Zeroizing::new(if use_h7 {
        h7(&SALT_TMP1, ltk)
    } else {
        h6(ltk, &TMP1)
    });
    h6(&ilk, &LEBR)
}

/// Derives the LE LTK from a BR/EDR Secure Connections link key.
pub fn link_key_to_ltk(link_key: &Octet16, use_h7: bool) -> Octet16 {
    trace!("link_key_to_ltk: use_h7={use_h7}");
    let iltk = Zeroizing::new(if use_h7 {
        h7(&SALT_TMP2, link_key)
    } else {
        h6(link_key, &TMP2)
    });
    h6(&iltk, &BRLE)
}
