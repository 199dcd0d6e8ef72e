//! Fixed-width fields that make up the key derivation messages.

use crate::block::Octet16;
use crate::error::{Error, Result};

/// `A1`/`A2`: a device address with its type octet on top, least-significant octet first.
pub type Address = [u8; 7];

/// `IOcap`: IO capability, OOB data flag and AuthReq, least-significant octet first.
pub type IoCap = [u8; 3];

/// Four-octet ASCII key identifier in message order (see [`key_id`]).
pub type KeyId = [u8; 4];

/// Type of a Bluetooth LE device address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressType {
    /// Public device address.
    Public,
    /// Random device address (static, resolvable or non-resolvable).
    Random,
}

impl AddressType {
    /// Octet carried in `A1`/`A2` and in `iat'`/`rat'`.
    pub const fn octet(self) -> u8 {
        match self {
            Self::Public => 0x00,
            Self::Random => 0x01,
        }
    }
}

impl TryFrom<u8> for AddressType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(Self::Public),
            0x01 => Ok(Self::Random),
            other => Err(Error::InvalidAddressType(other)),
        }
    }
}

/// Encodes an ASCII tag such as `b"lebr"` in message order.
///
/// The Core Specification writes key IDs most significant octet first, so `"lebr"` is
/// `0x6c656272` and travels as `72 62 65 6c`.
pub const fn key_id(tag: &[u8; 4]) -> KeyId {
    [tag[3], tag[2], tag[1], tag[0]]
}

/// Encodes an ASCII tag as a 128-bit salt holding the tag in its least significant 32 bits.
pub const fn tag_salt(tag: &[u8; 4]) -> Octet16 {
    let id = key_id(tag);
    let mut salt = [0u8; 16];
    salt[0] = id[0];
    salt[1] = id[1];
    salt[2] = id[2];
    salt[3] = id[3];
    salt
}

/// Builds `A1`/`A2` from a little-endian 48-bit address and its type.
pub fn address(addr: &[u8; 6], addr_type: AddressType) -> Address {
    let mut out = [0u8; 7];
    out[..6].copy_from_slice(addr);
    out[6] = addr_type.octet();
    out
}

/// Builds `IOcap` as `AuthReq || OOB data flag || IO capability`.
pub fn io_cap(auth_req: u8, oob_data: bool, io_capability: u8) -> IoCap {
    [io_capability, u8::from(oob_data), auth_req]
}

/// Converts a caller slice into a fixed-width field, naming the field on failure.
pub fn fixed<const N: usize>(field: &'static str, bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| Error::InvalidLength {
        field,
        expected: N,
        actual: bytes.len(),
    })
}
