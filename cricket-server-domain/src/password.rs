use crate::{ServiceError, ServiceResult};

#[cfg(not(test))]
const HASH_COST: u32 = bcrypt::DEFAULT_COST;

#[cfg(test)]
const HASH_COST: u32 = 4;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub fn hash_password(password: &str) -> ServiceResult<String> {
    bcrypt::hash(password, HASH_COST)
        .map_err(|e| ServiceError::Internal(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a stored hash. A malformed hash counts as a
/// mismatch so that login failures stay indistinguishable.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match bcrypt::verify(password, password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            log::warn!("Failed to verify password hash: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret1").unwrap();
        assert_ne!(hash, "secret1");
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
        assert!(!verify_password("secret1", "not-a-hash"));
    }
}
