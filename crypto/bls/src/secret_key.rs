use crate::{Error, PublicKey, Signature, DST, SECRET_KEY_BYTES_LEN};
use ethereum_types::H256 as Hash256;

/// A BLS secret key.
#[derive(Clone)]
pub struct SecretKey(blst::min_pk::SecretKey);

impl SecretKey {
    /// Derive a secret key from `ikm`, which must supply at least 32 bytes of
    /// input key material.
    pub fn key_gen(ikm: &[u8]) -> Result<Self, Error> {
        blst::min_pk::SecretKey::key_gen(ikm, &[])
            .map(Self)
            .map_err(Into::into)
    }

    /// Return the public key corresponding to `self`.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_point(self.0.sk_to_pk())
    }

    /// Sign `msg` using the beacon chain ciphersuite.
    pub fn sign(&self, msg: Hash256) -> Signature {
        Signature::from_point(self.0.sign(msg.as_bytes(), DST, &[]))
    }

    pub fn serialize(&self) -> [u8; SECRET_KEY_BYTES_LEN] {
        self.0.to_bytes()
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        blst::min_pk::SecretKey::from_bytes(bytes)
            .map(Self)
            .map_err(Into::into)
    }
}

impl std::fmt::Debug for SecretKey {
    /// Never print the secret key bytes.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SecretKey(<redacted>)")
    }
}
