// Integration tests for password hashing and verification
// Run with: cargo test --test password_test

use reporte_core::auth::{hash_password, verify_password, CredentialHash, PasswordHasher};
use rstest::*;

#[fixture]
fn hasher() -> PasswordHasher {
    PasswordHasher::new(4).expect("cost 4 is within range")
}

#[rstest]
#[case("password123")]
#[case("")]
#[case("pässwörd with ünïcödé")]
#[case("  leading and trailing spaces  ")]
fn hashed_password_verifies(hasher: PasswordHasher, #[case] password: &str) {
    let hashed = hasher.hash(password).unwrap();
    assert!(hasher.verify(password, hashed.as_str()));
}

#[rstest]
#[case("password123", "password124")]
#[case("password123", "Password123")]
#[case("secret", "")]
#[case("", " ")]
fn different_password_does_not_verify(
    hasher: PasswordHasher,
    #[case] stored: &str,
    #[case] candidate: &str,
) {
    let hashed = hasher.hash(stored).unwrap();
    assert!(!hasher.verify(candidate, hashed.as_str()));
}

#[rstest]
fn same_password_hashes_differently(hasher: PasswordHasher) {
    let first = hasher.hash("password123").unwrap();
    let second = hasher.hash("password123").unwrap();

    assert_ne!(first, second, "salts should differ between calls");
    assert!(hasher.verify("password123", first.as_str()));
    assert!(hasher.verify("password123", second.as_str()));
}

#[rstest]
#[case("not-a-valid-hash")]
#[case("")]
#[case("$2b$04$")]
#[case("$2b$04$tooshort")]
#[case("$9z$04$abcdefghijklmnopqrstuuabcdefghijklmnopqrstuvwxyz01234")]
#[case("$2b$99$abcdefghijklmnopqrstuuabcdefghijklmnopqrstuvwxyz01234")]
fn malformed_hash_never_matches(hasher: PasswordHasher, #[case] stored: &str) {
    assert!(!hasher.verify("password123", stored));
    assert!(!verify_password("password123", stored));
}

#[rstest]
fn truncated_hash_never_matches(hasher: PasswordHasher) {
    let hashed = hasher.hash("password123").unwrap();
    let truncated = &hashed.as_str()[..hashed.as_str().len() - 1];
    assert!(!hasher.verify("password123", truncated));
}

#[rstest]
fn hash_from_other_cost_still_verifies(hasher: PasswordHasher) {
    let stronger = PasswordHasher::new(6).unwrap();
    let hashed = stronger.hash("password123").unwrap();

    assert_eq!(hashed.cost(), Some(6));
    assert!(hasher.verify("password123", hashed.as_str()));
}

#[test]
fn default_helpers_round_trip() {
    let hashed = hash_password("password123").unwrap();
    assert_eq!(hashed.cost(), Some(bcrypt::DEFAULT_COST));
    assert!(verify_password("password123", hashed.as_str()));
    assert!(!verify_password("wrongpassword", hashed.as_str()));
}

#[test]
fn credential_hash_displays_as_stored_string() {
    let hashed = CredentialHash::new("$2b$04$abc".to_string());
    assert_eq!(hashed.to_string(), "$2b$04$abc");
    assert_eq!(hashed.clone().into_string(), "$2b$04$abc");
}

#[rstest]
fn credential_hash_serializes_as_plain_string(hasher: PasswordHasher) {
    let hashed = hasher.hash("password123").unwrap();

    let json = serde_json::to_string(&hashed).unwrap();
    assert_eq!(json, format!("\"{}\"", hashed.as_str()));

    let restored: CredentialHash = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, hashed);
    assert!(hasher.verify("password123", restored.as_str()));
}
