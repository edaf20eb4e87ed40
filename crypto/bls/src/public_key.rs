use crate::{Error, PUBLIC_KEY_BYTES_LEN};

/// A BLS public key.
#[derive(Clone)]
pub struct PublicKey(blst::min_pk::PublicKey);

impl PublicKey {
    pub(crate) fn from_point(point: blst::min_pk::PublicKey) -> Self {
        Self(point)
    }

    pub(crate) fn point(&self) -> &blst::min_pk::PublicKey {
        &self.0
    }

    pub fn serialize(&self) -> [u8; PUBLIC_KEY_BYTES_LEN] {
        self.0.compress()
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        blst::min_pk::PublicKey::from_bytes(bytes)
            .map(Self)
            .map_err(Into::into)
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.serialize() == other.serialize()
    }
}

impl Eq for PublicKey {}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.serialize()))
    }
}
