//! A wrapper around the `blst` BLS12-381 implementation, exposing only the
//! operations a beacon node needs: signing, verification and signature
//! aggregation using the "minimal pubkey size" scheme.
//!
//! The wrapper types deal in compressed byte encodings and understand the
//! point-at-infinity convention used for empty aggregates.

mod aggregate_signature;
mod public_key;
mod secret_key;
mod signature;

pub use aggregate_signature::AggregateSignature;
pub use public_key::PublicKey;
pub use secret_key::SecretKey;
pub use signature::Signature;

/// Domain separation tag for the `BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_`
/// ciphersuite, as used for all beacon chain signatures.
pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

pub const SECRET_KEY_BYTES_LEN: usize = 32;
pub const PUBLIC_KEY_BYTES_LEN: usize = 48;
pub const SIGNATURE_BYTES_LEN: usize = 96;

/// The compressed encoding of the G2 point at infinity, used to represent a
/// signature over the empty set of keys.
pub const INFINITY_SIGNATURE: [u8; SIGNATURE_BYTES_LEN] = {
    let mut bytes = [0; SIGNATURE_BYTES_LEN];
    bytes[0] = 0xc0;
    bytes
};

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// An error was raised from the `blst` library.
    BlstError(blst::BLST_ERROR),
    /// The provided bytes were an incorrect length.
    InvalidByteLength { got: usize, expected: usize },
}

impl From<blst::BLST_ERROR> for Error {
    fn from(e: blst::BLST_ERROR) -> Error {
        Error::BlstError(e)
    }
}

/// A BLS keypair.
#[derive(Clone)]
pub struct Keypair {
    pub pk: PublicKey,
    pub sk: SecretKey,
}

impl Keypair {
    /// Instantiate a keypair from a secret key, deriving the public key.
    pub fn from_secret_key(sk: SecretKey) -> Self {
        Self {
            pk: sk.public_key(),
            sk,
        }
    }
}

impl std::fmt::Debug for Keypair {
    /// Never print the secret key.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Keypair {{ pk: {:?} }}", self.pk)
    }
}
