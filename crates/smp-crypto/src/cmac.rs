//! AES-CMAC (RFC 4493, NIST SP 800-38B) over little-endian octet strings.
//!
//! Messages are stored least-significant octet first, so the first block in the RFC's sense is
//! the top 16 octets of the buffer. Blocks are consumed from the high end downwards and the
//! final, possibly partial, block is the low end of the buffer with its padding written just
//! below the message octets. The result equals the RFC tag with key, message and tag each
//! reversed.
//!
//! All working state (subkeys, chaining value, the padded last block) lives on the stack of a
//! single call.

use log::trace;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::block::{xor_in_place, Octet16};
use crate::cipher::expand_key;
use crate::error::{Error, Result};
use crate::key::RoundKeys;

const BLOCK_LEN: usize = 16;

/// `Rb` for 128-bit blocks; folds into the least significant octet.
const RB: u8 = 0x87;

/// Subkeys `K1` and `K2` for one key. Wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct Subkeys {
    pub k1: Octet16,
    pub k2: Octet16,
}

impl Subkeys {
    /// `L = E(K, 0)`, `K1 = double(L)`, `K2 = double(K1)`.
    pub(crate) fn derive(round_keys: &RoundKeys) -> Self {
        let l = Zeroizing::new(round_keys.encrypt(&[0u8; BLOCK_LEN]));
        let mut subkeys = Self {
            k1: double(&l),
            k2: [0u8; BLOCK_LEN],
        };
        subkeys.k2 = double(&subkeys.k1);
        subkeys
    }
}

/// Doubling in GF(2^128): `x << 1`, XORed with `Rb` when `MSB(x)` was set.
pub(crate) fn double(x: &Octet16) -> Octet16 {
    let mut out = [0u8; BLOCK_LEN];
    let mut carry = 0u8;
    for (o, b) in out.iter_mut().zip(x.iter()) {
        *o = (b << 1) | carry;
        carry = b >> 7;
    }
    // carry now holds MSB(x); masking keeps the reduction branch-free.
    out[0] ^= RB & carry.wrapping_neg();
    out
}

fn block_count(len: usize) -> usize {
    len.div_ceil(BLOCK_LEN).max(1)
}

/// Builds the final block from the lowest `head.len()` octets of the message.
///
/// A complete block is masked with `K1`; anything shorter, including the empty message, gets
/// `0x80 00..` padding and is masked with `K2`.
fn last_block(head: &[u8], subkeys: &Subkeys) -> Octet16 {
    let mut block = [0u8; BLOCK_LEN];
    let start = BLOCK_LEN - head.len();
    block[start..].copy_from_slice(head);
    if head.len() == BLOCK_LEN {
        xor_in_place(&mut block, &subkeys.k1);
    } else {
        block[start - 1] = 0x80;
        xor_in_place(&mut block, &subkeys.k2);
    }
    block
}

/// Computes the AES-CMAC of `message` under `key`.
pub fn aes_cmac(key: &Octet16, message: &[u8]) -> Octet16 {
    let round_keys = expand_key(key);
    let subkeys = Subkeys::derive(&round_keys);
    let rounds = block_count(message.len());
    trace!("aes_cmac: {} octets, {} rounds", message.len(), rounds);

    let (head, body) = message.split_at(message.len() - (rounds - 1) * BLOCK_LEN);
    let mut x = [0u8; BLOCK_LEN];
    for chunk in body.rchunks_exact(BLOCK_LEN) {
        let mut block = [0u8; BLOCK_LEN];
        block.copy_from_slice(chunk);
        xor_in_place(&mut x, &block);
        x = round_keys.encrypt(&x);
    }
    xor_in_place(&mut x, &last_block(head, &subkeys));
    round_keys.encrypt(&x)
}

/// Computes the AES-CMAC of the first `length` octets of `message`.
///
/// This is the buffer-plus-length form used at the HCI/SMP boundary. An absent buffer is only
/// valid together with a zero length.
pub fn aes_cmac_len(key: &Octet16, message: Option<&[u8]>, length: usize) -> Result<Octet16> {
    match message {
        None if length == 0 => Ok(aes_cmac(key, &[])),
        None => Err(Error::NullMessage { length }),
        Some(buf) => {
            let msg = buf.get(..length).ok_or(Error::MessageTooShort {
                length,
                available: buf.len(),
            })?;
            Ok(aes_cmac(key, msg))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::from_msb_hex;
    use crate::cipher::encrypt_block;
    use cmac::{Cmac, Mac};
    use rand::{Rng, RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    const RFC_KEY: &str = "2b7e151628aed2a6abf7158809cf4f3c";
    const RFC_MESSAGE: &str = "6bc1bee22e409f96e93d7e117393172a\
                               ae2d8a571e03ac9c9eb76fac45af8e51\
                               30c81c46a35ce411e5fbc1191a0a52ef\
                               f69f2445df4f9b17ad2b417be66c3710";

    /// RFC 4493 message prefix of `len` octets, in crate order.
    fn rfc_message(len: usize) -> Vec<u8> {
        let mut msg = hex::decode(RFC_MESSAGE).expect("valid hex");
        msg.truncate(len);
        msg.reverse();
        msg
    }

    /// Reference tag from the RustCrypto implementation, converted to crate order.
    fn reference_cmac(key: &Octet16, message: &[u8]) -> Octet16 {
        let mut k = *key;
        k.reverse();
        let mut m = message.to_vec();
        m.reverse();
        let mut mac = Cmac::<aes::Aes128>::new_from_slice(&k).expect("16-octet key");
        mac.update(&m);
        let mut tag = [0u8; 16];
        tag.copy_from_slice(&mac.finalize().into_bytes());
        tag.reverse();
        tag
    }

    #[test]
    fn subkeys_match_rfc4493() {
        let key: Octet16 = from_msb_hex(RFC_KEY);
        let subkeys = Subkeys::derive(&expand_key(&key));
        let k1: Octet16 = from_msb_hex("fbeed618357133667c85e08f7236a8de");
        let k2: Octet16 = from_msb_hex("f7ddac306ae266ccf90bc11ee46d513b");
        assert_eq!(subkeys.k1, k1);
        assert_eq!(subkeys.k2, k2);
    }

    #[test]
    fn subkeys_are_wiped() {
        let mut subkeys = Subkeys::derive(&expand_key(&[0x02u8; 16]));
        assert_ne!(subkeys.k1, [0u8; 16]);
        subkeys.zeroize();
        assert_eq!(subkeys.k1, [0u8; 16]);
        assert_eq!(subkeys.k2, [0u8; 16]);
    }

    #[test]
    fn tags_match_rfc4493() {
        let key: Octet16 = from_msb_hex(RFC_KEY);
        let cases = [
            (0, "bb1d6929e95937287fa37d129b756746"),
            (16, "070a16b46b4d4144f79bdd9dd04a287c"),
            (40, "dfa66747de9ae63030ca32611497c827"),
            (64, "51f0bebf7e3b9d92fc49741779363cfe"),
        ];
        for (len, tag_hex) in cases {
            let expected: Octet16 = from_msb_hex(tag_hex);
            assert_eq!(aes_cmac(&key, &rfc_message(len)), expected, "len {len}");
        }
    }

    #[test]
    fn double_without_carry_is_plain_shift() {
        let mut x = [0u8; 16];
        x[0] = 0x01;
        x[7] = 0x80;
        let mut expected = [0u8; 16];
        expected[0] = 0x02;
        expected[8] = 0x01;
        assert_eq!(double(&x), expected);
    }

    #[test]
    fn double_with_carry_folds_rb() {
        // Top two bits set: both K1 and K2 take the reduction branch.
        let mut l = [0u8; 16];
        l[15] = 0xc0;
        let k1 = double(&l);
        let mut expected_k1 = [0u8; 16];
        expected_k1[15] = 0x80;
        expected_k1[0] = 0x87;
        assert_eq!(k1, expected_k1);

        let mut expected_k2 = [0u8; 16];
        expected_k2[0] = 0x0e ^ 0x87;
        expected_k2[1] = 0x01;
        assert_eq!(double(&k1), expected_k2);
    }

    #[test]
    fn key_forcing_both_reductions() {
        // E(K, 0) for this key has its two top bits set.
        let key = [0x02u8; 16];
        let l = encrypt_block(&key, &[0u8; 16]);
        assert_eq!(l[15] & 0xc0, 0xc0);

        let subkeys = Subkeys::derive(&expand_key(&key));
        let k1: Octet16 = hex::decode("8b7b4fb769751c7297d055847e9ec996")
            .expect("valid hex")
            .try_into()
            .expect("16 octets");
        let k2: Octet16 = hex::decode("91f79e6ed3ea38e42ea1ab08fd3c932d")
            .expect("valid hex")
            .try_into()
            .expect("16 octets");
        assert_eq!(subkeys.k1, k1);
        assert_eq!(subkeys.k2, k2);

        assert_eq!(
            hex::encode(aes_cmac(&key, b"")),
            "6ff6081f516bc9dfd171cae3fa70dd2d"
        );
        assert_eq!(
            hex::encode(aes_cmac(&key, b"SMP")),
            "fd0ac98d3b8baa5d047fe50ca3c953fc"
        );
        let counting: Vec<u8> = (0..32).collect();
        assert_eq!(
            hex::encode(aes_cmac(&key, &counting)),
            "ee56d611be42d87790b62d3ef1592f30"
        );
    }

    #[test]
    fn matches_reference_cmac_on_random_input() {
        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        for len in 0..100 {
            let mut key = [0u8; 16];
            rng.fill_bytes(&mut key);
            let mut msg = vec![0u8; len];
            rng.fill_bytes(&mut msg);
            assert_eq!(aes_cmac(&key, &msg), reference_cmac(&key, &msg), "len {len}");
        }
    }

    #[test]
    fn deterministic() {
        let mut rng = ChaCha20Rng::from_seed([9u8; 32]);
        let key: Octet16 = rng.gen();
        let msg: [u8; 53] = core::array::from_fn(|_| rng.gen());
        let first = aes_cmac(&key, &msg);
        for _ in 0..8 {
            assert_eq!(aes_cmac(&key, &msg), first);
        }
    }

    #[test]
    fn concurrent_calls_do_not_interfere() {
        let inputs: Vec<(Octet16, Vec<u8>)> = (0..8u8)
            .map(|i| ([i; 16], (0..(i as usize * 9)).map(|b| b as u8).collect()))
            .collect();
        let expected: Vec<Octet16> = inputs.iter().map(|(k, m)| aes_cmac(k, m)).collect();
        std::thread::scope(|s| {
            let handles: Vec<_> = inputs
                .iter()
                .map(|(k, m)| s.spawn(move || (0..200).map(|_| aes_cmac(k, m)).last()))
                .collect();
            for (handle, want) in handles.into_iter().zip(expected.iter()) {
                assert_eq!(handle.join().expect("thread"), Some(*want));
            }
        });
    }

    #[test]
    fn length_form_accepts_prefix() {
        let key: Octet16 = from_msb_hex(RFC_KEY);
        let msg = rfc_message(64);
        assert_eq!(
            aes_cmac_len(&key, Some(msg.as_slice()), 40),
            Ok(aes_cmac(&key, &msg[..40]))
        );
        assert_eq!(aes_cmac_len(&key, None, 0), Ok(aes_cmac(&key, &[])));
    }

    #[test]
    fn length_form_rejects_contract_violations() {
        let key = [0u8; 16];
        assert_eq!(
            aes_cmac_len(&key, None, 5),
            Err(Error::NullMessage { length: 5 })
        );
        assert_eq!(
            aes_cmac_len(&key, Some(&[1u8, 2, 3][..]), 4),
            Err(Error::MessageTooShort {
                length: 4,
                available: 3
            })
        );
    }
}
