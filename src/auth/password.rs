//! Password Hashing
//! Mission: Salted one-way hashes; plaintext never leaves this module's callers

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a plaintext password with a per-hash salt
pub fn hash_password(password: &str) -> Result<String> {
    hash(password, DEFAULT_COST).context("Failed to hash password")
}

/// Check a plaintext password against a stored hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    verify(password, password_hash).context("Failed to verify password")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hashed = hash_password("Sup3r@secret").unwrap();

        assert!(verify_password("Sup3r@secret", &hashed).unwrap());
        assert!(!verify_password("wrong-password", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("Same@Pass1").unwrap();
        let b = hash_password("Same@Pass1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }
}
