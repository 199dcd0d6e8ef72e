//! Cryptographic toolbox for Bluetooth pairing.
//!
//! This crate provides the primitives the Security Manager needs and nothing more:
//! - AES-128 single-block encryption behind one octet-order adapter.
//! - AES-CMAC (RFC 4493 / NIST SP 800-38B).
//! - The LE Secure Connections functions h6, h7, f4, f5, f6 and g2.
//! - Cross-transport conversion between an LE LTK and a BR/EDR link key.
//! - The LE legacy pairing functions c1, s1, d1, dm and CSRK data signing.
//!
//! All values are held least-significant octet first, the order SMP carries them on the air.
//! Every function is pure: no state survives a call and all of them may run concurrently.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod cmac;
mod error;
mod field;
mod kdf;
mod key;
mod legacy;
mod link_key;
mod signing;

pub use crate::block::{Octet16, Octet32};
pub use crate::cipher::{aes_128, encrypt_block, expand_key};
pub use crate::cmac::{aes_cmac, aes_cmac_len};
pub use crate::error::{Error, Result};
pub use crate::field::{
    address, fixed, io_cap, key_id, tag_salt, Address, AddressType, IoCap, KeyId,
};
pub use crate::kdf::{f4, f5, f6, g2, h6, h7};
pub use crate::key::RoundKeys;
pub use crate::legacy::{c1, d1, dm, s1};
pub use crate::link_key::{link_key_to_ltk, ltk_to_link_key};
pub use crate::signing::{sign, verify, Signature, MAC_LEN, SIGNATURE_LEN};
