use crate::application_port::{EntropySource, TokenError};
use rand::RngCore;
use rand::rngs::OsRng;

/// Operating system CSPRNG.
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), TokenError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| TokenError::Entropy(e.to_string()))
    }
}
