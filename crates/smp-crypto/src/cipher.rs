//! AES-128 boundary adapter.
//!
//! The rest of the crate keeps octets least-significant first. The block cipher expects the
//! FIPS-197 order, so the key, the plaintext and the ciphertext are reversed here and only
//! here. [`expand_key`] and [`RoundKeys::encrypt`] are the two crossings; no other module
//! reorders octets.

use aes::cipher::BlockEncrypt;

use crate::block::{reversed, Octet16};
use crate::error::{Error, Result};
use crate::key::RoundKeys;

/// Expands a little-endian 128-bit key into AES-128 round keys.
pub fn expand_key(key: &Octet16) -> RoundKeys {
    RoundKeys::from_cipher_order(&reversed(key))
}

impl RoundKeys {
    /// Encrypts a single little-endian block.
    pub fn encrypt(&self, plaintext: &Octet16) -> Octet16 {
        let mut block = aes::Block::from(reversed(plaintext));
        self.0.encrypt_block(&mut block);
        let mut out = [0u8; 16];
        out.copy_from_slice(&block);
        out.reverse();
        out
    }
}

/// Security function `e`: encrypts one block under `key`.
pub fn encrypt_block(key: &Octet16, plaintext: &Octet16) -> Octet16 {
    expand_key(key).encrypt(plaintext)
}

/// Encrypts up to 16 octets of `input`, zero-filling the most significant octets.
pub fn aes_128(key: &Octet16, input: &[u8]) -> Result<Octet16> {
    if input.len() > 16 {
        return Err(Error::InputTooLong(input.len()));
    }
    let mut block = [0u8; 16];
    block[..input.len()].copy_from_slice(input);
    Ok(encrypt_block(key, &block))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::from_msb_hex;

    #[test]
    fn encrypt_matches_nist_vector() {
        let key: Octet16 = from_msb_hex("000102030405060708090a0b0c0d0e0f");
        let plain: Octet16 = from_msb_hex("00112233445566778899aabbccddeeff");
        let expected: Octet16 = from_msb_hex("69c4e0d86a7b0430d8cdb78070b4c55a");
        assert_eq!(encrypt_block(&key, &plain), expected);
    }

    #[test]
    fn reuses_round_keys() {
        let key = [0x42; 16];
        let rks = expand_key(&key);
        for i in 0..4u8 {
            let block = [i; 16];
            assert_eq!(rks.encrypt(&block), encrypt_block(&key, &block));
        }
    }

    #[test]
    fn short_input_is_zero_padded_high() {
        let key: Octet16 = core::array::from_fn(|i| i as u8);
        let mut padded = [0u8; 16];
        padded[..2].copy_from_slice(&[0x01, 0x02]);
        let out = aes_128(&key, &[0x01, 0x02]).expect("two octets fit");
        assert_eq!(out, encrypt_block(&key, &padded));
        assert_eq!(out[..4], [0x93, 0x5b, 0x4b, 0x3b]);
    }

    #[test]
    fn oversized_input_is_rejected() {
        assert_eq!(aes_128(&[0; 16], &[0; 17]), Err(Error::InputTooLong(17)));
    }
}
