use crate::{Error, PublicKey, DST, INFINITY_SIGNATURE, SIGNATURE_BYTES_LEN};
use ethereum_types::H256 as Hash256;

/// A BLS signature, possibly the point at infinity.
#[derive(Clone)]
pub struct Signature {
    point: Option<blst::min_pk::Signature>,
}

impl Signature {
    /// The signature over the empty set of keys.
    pub fn empty() -> Self {
        Self { point: None }
    }

    pub(crate) fn from_point(point: blst::min_pk::Signature) -> Self {
        Self { point: Some(point) }
    }

    pub(crate) fn point(&self) -> Option<&blst::min_pk::Signature> {
        self.point.as_ref()
    }

    /// Verify `self` against `msg` and `pk`. The empty signature verifies
    /// nothing.
    pub fn verify(&self, pk: &PublicKey, msg: Hash256) -> bool {
        match &self.point {
            Some(point) => {
                point.verify(true, msg.as_bytes(), DST, &[], pk.point(), true)
                    == blst::BLST_ERROR::BLST_SUCCESS
            }
            None => false,
        }
    }

    pub fn serialize(&self) -> [u8; SIGNATURE_BYTES_LEN] {
        match &self.point {
            Some(point) => point.compress(),
            None => INFINITY_SIGNATURE,
        }
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != SIGNATURE_BYTES_LEN {
            return Err(Error::InvalidByteLength {
                got: bytes.len(),
                expected: SIGNATURE_BYTES_LEN,
            });
        }
        if bytes == INFINITY_SIGNATURE {
            Ok(Self::empty())
        } else {
            blst::min_pk::Signature::from_bytes(bytes)
                .map(Self::from_point)
                .map_err(Into::into)
        }
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.serialize() == other.serialize()
    }
}

impl Eq for Signature {}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.serialize()))
    }
}
