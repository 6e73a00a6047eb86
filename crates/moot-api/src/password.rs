//! One-way password hashing with argon2.
//!
//! Plaintext passwords exist only between the request body and these
//! functions; the store only ever sees PHC strings, e.g. `$argon2id$v=19$…`.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)?
      .to_string(),
  )
}

/// Check a plaintext password against a stored PHC string. A malformed hash
/// counts as a failed verification.
pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc)
    .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
    .is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_verifies_and_is_not_plaintext() {
    let hash = hash_password("pw").unwrap();
    assert_ne!(hash, "pw");
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("pw", &hash));
  }

  #[test]
  fn wrong_password_fails_verification() {
    let hash = hash_password("pw").unwrap();
    assert!(!verify_password("not-pw", &hash));
  }

  #[test]
  fn malformed_hash_fails_verification() {
    assert!(!verify_password("pw", "not-a-phc-string"));
  }

  #[test]
  fn same_password_hashes_differently() {
    // Fresh salt per hash.
    let a = hash_password("pw").unwrap();
    let b = hash_password("pw").unwrap();
    assert_ne!(a, b);
  }
}
