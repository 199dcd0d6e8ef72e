//! Caller-contract violations.

use thiserror::Error;

/// Errors reported when a caller hands the toolbox malformed input.
///
/// The typed API takes fixed-size arrays, so these only arise where raw slices cross into the
/// crate. None of them is transient; a pairing attempt that hits one must be abandoned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A non-zero message length was given without a message buffer.
    #[error("message buffer is absent but length is {length}")]
    NullMessage {
        /// Requested message length.
        length: usize,
    },

    /// The requested message length runs past the end of the buffer.
    #[error("message length {length} exceeds the {available}-octet buffer")]
    MessageTooShort {
        /// Requested message length.
        length: usize,
        /// Octets actually available.
        available: usize,
    },

    /// A fixed-width field was built from a slice of the wrong size.
    #[error("{field} must be {expected} octets, got {actual}")]
    InvalidLength {
        /// Name of the field being converted.
        field: &'static str,
        /// Required width.
        expected: usize,
        /// Width supplied.
        actual: usize,
    },

    /// More than one block of input was given to a single-block encryption.
    #[error("AES-128 input is {0} octets, at most 16 allowed")]
    InputTooLong(usize),

    /// An address type octet other than public (0) or random (1).
    #[error("invalid address type {0:#04x}")]
    InvalidAddressType(u8),

    /// A received data signature did not verify.
    #[error("signature mismatch")]
    SignatureMismatch,
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
