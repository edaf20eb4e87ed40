use crate::{Error, Signature, INFINITY_SIGNATURE, SIGNATURE_BYTES_LEN};
use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssz::{Decode, DecodeError, Encode};
use tree_hash::{PackedEncoding, TreeHash, TreeHashType};

/// An aggregate of BLS signatures, possibly the point at infinity.
///
/// The infinity representation is used both for "no signatures yet" and for
/// deserialized infinity points; the two are indistinguishable on the wire.
#[derive(Clone)]
pub struct AggregateSignature {
    point: Option<blst::min_pk::AggregateSignature>,
}

impl AggregateSignature {
    /// Instantiate as the point at infinity (an aggregate of zero signatures).
    pub fn infinity() -> Self {
        Self { point: None }
    }

    pub fn is_infinity(&self) -> bool {
        self.point.is_none()
    }

    /// Aggregate `other` into `self`.
    pub fn add_assign(&mut self, other: &Signature) {
        if let Some(other_point) = other.point() {
            match &mut self.point {
                Some(agg) => {
                    // The signature was group-checked when it was created or
                    // deserialized, skip the check here.
                    let _ = agg.add_signature(other_point, false);
                }
                None => {
                    self.point = Some(blst::min_pk::AggregateSignature::from_signature(
                        other_point,
                    ))
                }
            }
        }
    }

    /// Aggregate `other` into `self`.
    pub fn add_assign_aggregate(&mut self, other: &Self) {
        if let Some(other_agg) = &other.point {
            self.add_assign(&Signature::from_point(other_agg.to_signature()));
        }
    }

    pub fn serialize(&self) -> [u8; SIGNATURE_BYTES_LEN] {
        match &self.point {
            Some(agg) => agg.to_signature().compress(),
            None => INFINITY_SIGNATURE,
        }
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let signature = Signature::deserialize(bytes)?;
        let mut agg = Self::infinity();
        agg.add_assign(&signature);
        Ok(agg)
    }
}

impl PartialEq for AggregateSignature {
    fn eq(&self, other: &Self) -> bool {
        self.serialize() == other.serialize()
    }
}

impl Eq for AggregateSignature {}

impl std::hash::Hash for AggregateSignature {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.serialize().hash(state)
    }
}

impl std::fmt::Debug for AggregateSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.serialize()))
    }
}

impl Encode for AggregateSignature {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        SIGNATURE_BYTES_LEN
    }

    fn ssz_bytes_len(&self) -> usize {
        SIGNATURE_BYTES_LEN
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.serialize())
    }
}

impl Decode for AggregateSignature {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        SIGNATURE_BYTES_LEN
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::deserialize(bytes)
            .map_err(|e| DecodeError::BytesInvalid(format!("invalid aggregate signature: {:?}", e)))
    }
}

impl TreeHash for AggregateSignature {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Vector
    }

    fn tree_hash_packed_encoding(&self) -> PackedEncoding {
        unreachable!("Vector should never be packed.")
    }

    fn tree_hash_packing_factor() -> usize {
        unreachable!("Vector should never be packed.")
    }

    fn tree_hash_root(&self) -> tree_hash::Hash256 {
        let values_per_chunk = tree_hash::BYTES_PER_CHUNK;
        let minimum_chunk_count = (SIGNATURE_BYTES_LEN + values_per_chunk - 1) / values_per_chunk;
        tree_hash::merkle_root(&self.serialize(), minimum_chunk_count)
    }
}

impl Serialize for AggregateSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(self.serialize())))
    }
}

impl<'de> Deserialize<'de> for AggregateSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(s.trim_start_matches("0x")).map_err(D::Error::custom)?;
        Self::deserialize(&bytes).map_err(|e| D::Error::custom(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SecretKey;
    use ethereum_types::H256 as Hash256;

    fn secret_key(i: u8) -> SecretKey {
        let mut ikm = [i; 32];
        ikm[0] = i.wrapping_add(1);
        SecretKey::key_gen(&ikm).expect("should generate secret key")
    }

    #[test]
    fn infinity_round_trip() {
        let agg = AggregateSignature::infinity();
        assert_eq!(agg.serialize(), INFINITY_SIGNATURE);
        let decoded = AggregateSignature::deserialize(&INFINITY_SIGNATURE).unwrap();
        assert!(decoded.is_infinity());
        assert_eq!(agg, decoded);
    }

    #[test]
    fn aggregation_is_order_independent() {
        let msg = Hash256::repeat_byte(42);
        let sig_a = secret_key(1).sign(msg);
        let sig_b = secret_key(2).sign(msg);

        let mut ab = AggregateSignature::infinity();
        ab.add_assign(&sig_a);
        ab.add_assign(&sig_b);

        let mut ba = AggregateSignature::infinity();
        ba.add_assign(&sig_b);
        ba.add_assign(&sig_a);

        assert_eq!(ab, ba);
        assert!(!ab.is_infinity());
    }

    #[test]
    fn add_assign_aggregate_adopts_other() {
        let msg = Hash256::repeat_byte(7);
        let mut single = AggregateSignature::infinity();
        single.add_assign(&secret_key(3).sign(msg));

        let mut agg = AggregateSignature::infinity();
        agg.add_assign_aggregate(&single);
        assert_eq!(agg, single);
    }
}
