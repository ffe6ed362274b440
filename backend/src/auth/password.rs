//! bcrypt wrappers. Both are CPU-bound; call them from the blocking pool.

use crate::error::ApiError;

pub fn hash(password: &str, cost: u32) -> Result<String, ApiError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// A malformed stored hash counts as a mismatch rather than an error.
pub fn verify(password: &str, stored_hash: &str) -> bool {
    bcrypt::verify(password, stored_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hashed = hash("x", 4).unwrap();
        assert!(verify("x", &hashed));
        assert!(!verify("y", &hashed));
        assert!(!verify("x", "not-a-hash"));
    }
}
