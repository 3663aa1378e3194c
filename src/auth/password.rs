use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use tracing::error;

pub const WEAK_PASSWORD_MESSAGE: &str =
    "Weak password! Include uppercase, lowercase, number, special character, and min 8 chars.";

/// Password policy: at least 8 characters, one lowercase, one uppercase,
/// one digit and one of `@$!%*?&`, with no characters outside that alphabet.
pub fn validate_password(plain: &str) -> bool {
    lazy_static! {
        static ref ALLOWED_RE: Regex = Regex::new(r"^[A-Za-z0-9@$!%*?&]{8,}$").unwrap();
        static ref LOWER_RE: Regex = Regex::new(r"[a-z]").unwrap();
        static ref UPPER_RE: Regex = Regex::new(r"[A-Z]").unwrap();
        static ref DIGIT_RE: Regex = Regex::new(r"[0-9]").unwrap();
        static ref SYMBOL_RE: Regex = Regex::new(r"[@$!%*?&]").unwrap();
    }
    ALLOWED_RE.is_match(plain)
        && LOWER_RE.is_match(plain)
        && UPPER_RE.is_match(plain)
        && DIGIT_RE.is_match(plain)
        && SYMBOL_RE.is_match(plain)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_accepts_passwords_with_all_classes() {
        assert!(validate_password("Abc123$5"));
        assert!(validate_password("xY9@xY9@"));
        assert!(validate_password("Longer1&Password"));
    }

    #[test]
    fn policy_rejects_missing_symbol() {
        assert!(!validate_password("Abc12345"));
    }

    #[test]
    fn policy_rejects_missing_classes() {
        assert!(!validate_password("abc123$5")); // no uppercase
        assert!(!validate_password("ABC123$5")); // no lowercase
        assert!(!validate_password("Abcdefg$")); // no digit
    }

    #[test]
    fn policy_rejects_short_passwords() {
        assert!(!validate_password("Ab1$"));
        assert!(!validate_password("Ab1$Ab1"));
    }

    #[test]
    fn policy_rejects_characters_outside_alphabet() {
        assert!(!validate_password("Abc123$5#"));
        assert!(!validate_password("Abc 123$5"));
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
