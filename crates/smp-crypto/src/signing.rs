//! Data signing with the Connection Signature Resolving Key
//! (Core Specification Vol 3, Part H, 2.4.5 and Part C, 10.4.1).

use log::trace;
use subtle::ConstantTimeEq;

use crate::block::Octet16;
use crate::cmac::aes_cmac;
use crate::error::{Error, Result};

/// Octets of MAC carried in a signature.
pub const MAC_LEN: usize = 8;

/// Octets of a signature: sign counter followed by MAC.
pub const SIGNATURE_LEN: usize = 4 + MAC_LEN;

/// Authentication signature appended to signed data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    /// Sign counter the MAC was computed over.
    pub counter: u32,
    /// Most significant 64 bits of the CMAC, least-significant octet first.
    pub mac: [u8; MAC_LEN],
}

impl Signature {
    /// Encodes the signature as it trails a signed PDU.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        out[..4].copy_from_slice(&self.counter.to_le_bytes());
        out[4..].copy_from_slice(&self.mac);
        out
    }

    /// Decodes a trailing signature.
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LEN]) -> Self {
        let mut mac = [0u8; MAC_LEN];
        mac.copy_from_slice(&bytes[4..]);
        Self {
            counter: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            mac,
        }
    }
}

fn mac(csrk: &Octet16, data: &[u8], counter: u32) -> [u8; MAC_LEN] {
    let mut buf = Vec::with_capacity(data.len() + 4);
    buf.extend_from_slice(data);
    buf.extend_from_slice(&counter.to_le_bytes());
    let tag = aes_cmac(csrk, &buf);
    let mut out = [0u8; MAC_LEN];
    out.copy_from_slice(&tag[16 - MAC_LEN..]);
    out
}

/// Signs `data` with `csrk` under the given sign counter.
pub fn sign(csrk: &Octet16, data: &[u8], counter: u32) -> Signature {
    trace!("sign: {} octets, counter {counter}", data.len());
    Signature {
        counter,
        mac: mac(csrk, data, counter),
    }
}

/// Verifies a received signature. The MAC comparison runs in constant time.
pub fn verify(csrk: &Octet16, data: &[u8], signature: &Signature) -> Result<()> {
    trace!("verify: {} octets, counter {}", data.len(), signature.counter);
    let expected = mac(csrk, data, signature.counter);
    if bool::from(expected[..].ct_eq(&signature.mac[..])) {
        Ok(())
    } else {
        Err(Error::SignatureMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::d1;

    fn csrk() -> Octet16 {
        let er: Octet16 = core::array::from_fn(|i| i as u8);
        d1(&er, 0x1234, 1)
    }

    const DATA: &[u8] = b"\x12\x34\x00write";

    #[test]
    fn mac_is_top_of_cmac_over_data_and_counter() {
        let sig = sign(&csrk(), DATA, 7);
        assert_eq!(sig.counter, 7);
        assert_eq!(hex::encode(sig.mac), "f3a4e3e5228692dd");
    }

    #[test]
    fn verify_accepts_own_signature() {
        let sig = sign(&csrk(), DATA, 42);
        assert_eq!(verify(&csrk(), DATA, &sig), Ok(()));
    }

    #[test]
    fn verify_rejects_tampering() {
        let sig = sign(&csrk(), DATA, 42);
        let mut bad_mac = sig;
        bad_mac.mac[0] ^= 0x01;
        assert_eq!(verify(&csrk(), DATA, &bad_mac), Err(Error::SignatureMismatch));

        let replayed = Signature { counter: 43, ..sig };
        assert_eq!(verify(&csrk(), DATA, &replayed), Err(Error::SignatureMismatch));

        assert_eq!(verify(&csrk(), b"other", &sig), Err(Error::SignatureMismatch));
    }

    #[test]
    fn verify_rejects_any_flipped_mac_bit() {
        let sig = sign(&csrk(), DATA, 9);
        for octet in 0..MAC_LEN {
            for bit in 0..8 {
                let mut forged = sig;
                forged.mac[octet] ^= 1 << bit;
                assert_eq!(
                    verify(&csrk(), DATA, &forged),
                    Err(Error::SignatureMismatch),
                    "octet {octet} bit {bit}"
                );
            }
        }
    }

    #[test]
    fn wire_layout_is_counter_then_mac() {
        let sig = Signature {
            counter: 0x0403_0201,
            mac: [0xa0, 0xa1, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6, 0xa7],
        };
        let bytes = sig.to_bytes();
        assert_eq!(bytes[..4], [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(bytes[4..], sig.mac);
        assert_eq!(Signature::from_bytes(&bytes), sig);
    }
}
