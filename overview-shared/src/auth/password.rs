/// Password hashing and stored credential verification
///
/// New passwords are hashed with Argon2id and stored in PHC string format.
/// User documents imported from older deployments may still carry a SHA-256
/// hex digest or, in the worst case, the plaintext password; both are still
/// accepted at login so existing accounts keep working.
///
/// # Stored formats
///
/// | stored value                     | comparison                         |
/// |----------------------------------|------------------------------------|
/// | `$argon2...` PHC string          | Argon2 verification                |
/// | exactly 64 hex characters        | SHA-256 of candidate, constant time|
/// | anything else                    | plaintext, constant time, warned   |
///
/// # Example
///
/// ```
/// use overview_shared::auth::password::{hash_password, verify_stored_credential};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("correct horse")?;
/// assert!(verify_stored_credential("correct horse", &hash));
/// assert!(!verify_stored_credential("wrong horse", &hash));
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};
use std::sync::OnceLock;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::warn;

/// Minimum length accepted for new passwords
pub const MIN_PASSWORD_LEN: usize = 8;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),

    /// New password rejected
    #[error("{0}")]
    TooWeak(String),
}

/// How a user document stores its password
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredCredential<'a> {
    /// Argon2 PHC string
    Argon2(&'a str),

    /// Lowercase or uppercase SHA-256 hex digest
    Sha256Hex(&'a str),

    /// Legacy plaintext
    Plaintext(&'a str),
}

impl<'a> StoredCredential<'a> {
    /// Detects the storage format of a password field
    pub fn classify(stored: &'a str) -> Self {
        if stored.starts_with("$argon2") {
            StoredCredential::Argon2(stored)
        } else if stored.len() == 64 && stored.bytes().all(|b| b.is_ascii_hexdigit()) {
            StoredCredential::Sha256Hex(stored)
        } else {
            StoredCredential::Plaintext(stored)
        }
    }
}

/// Hashes a password using Argon2id
///
/// Parameters follow the OWASP baseline (19 MiB, 2 passes, 1 lane); they
/// are embedded in the PHC output so they can be raised later without
/// invalidating stored hashes.
///
/// ```
/// use overview_shared::auth::password::hash_password;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("my_password")?;
/// assert!(hash.starts_with("$argon2id$"));
/// # Ok(())
/// # }
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(19_456)
        .t_cost(2)
        .p_cost(1)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against an Argon2 PHC hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Lowercase hex SHA-256 digest of a password
pub fn sha256_hex(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Checks a login candidate against whatever the user document stores
///
/// Never errors: an unparseable hash or an empty stored value is a mismatch.
pub fn verify_stored_credential(candidate: &str, stored: &str) -> bool {
    if stored.is_empty() {
        return false;
    }

    match StoredCredential::classify(stored) {
        StoredCredential::Argon2(hash) => match verify_password(candidate, hash) {
            Ok(matches) => matches,
            Err(e) => {
                warn!(error = %e, "Stored Argon2 hash could not be verified");
                false
            }
        },
        StoredCredential::Sha256Hex(digest) => {
            let computed = sha256_hex(candidate);
            let expected = digest.to_ascii_lowercase();
            computed.as_bytes().ct_eq(expected.as_bytes()).into()
        }
        StoredCredential::Plaintext(plain) => {
            warn!("User record stores a plaintext password; rehash it with the admin CLI");
            candidate.as_bytes().ct_eq(plain.as_bytes()).into()
        }
    }
}

fn dummy_hash() -> &'static str {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();

    DUMMY_HASH.get_or_init(|| {
        hash_password("overview-unknown-account").unwrap_or_else(|e| {
            warn!(error = %e, "Failed to prepare the dummy password hash");
            String::new()
        })
    })
}

/// Spends one Argon2 verification on a throwaway hash
///
/// Login calls this when no account matches, so an unknown email takes as
/// long to reject as a wrong password.
pub fn verify_dummy_credential(candidate: &str) {
    let hash = dummy_hash();
    if !hash.is_empty() {
        let _ = verify_password(candidate, hash);
    }
}

/// Validates a password before it is hashed for a new account
pub fn validate_new_password(password: &str) -> Result<(), PasswordError> {
    if password.trim().is_empty() {
        return Err(PasswordError::TooWeak("Password must not be blank".to_string()));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooWeak(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }

    Ok(())
}
