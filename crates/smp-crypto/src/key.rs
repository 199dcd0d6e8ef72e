//! Expanded AES-128 key.

use core::fmt;

use aes::cipher::{Key, KeyInit};
use aes::Aes128;

use crate::block::Octet16;

/// Expanded round keys for AES-128, alive for the duration of one call.
///
/// Build with [`crate::expand_key`]. The schedule is zeroized when dropped.
pub struct RoundKeys(pub(crate) Aes128);

impl RoundKeys {
    /// `key` must already be in the cipher's FIPS-197 octet order.
    pub(crate) fn from_cipher_order(key: &Octet16) -> Self {
        Self(Aes128::new(&Key::<Aes128>::from(*key)))
    }
}

impl fmt::Debug for RoundKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RoundKeys(..)")
    }
}
