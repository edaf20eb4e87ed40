//! Helpers for building deterministic test data.

use crate::{Keypair, SecretKey};

/// Generate a keypair where the secret key is derived from
/// `validator_index`.
///
/// This is purely for testing; the keys are in no way secret.
pub fn generate_deterministic_keypair(validator_index: usize) -> Keypair {
    let mut ikm = [0x42; 32];
    ikm[0..8].copy_from_slice(&(validator_index as u64).to_le_bytes());
    let sk = SecretKey::key_gen(&ikm).expect("should generate key from fixed ikm");
    Keypair::from_secret_key(sk)
}
