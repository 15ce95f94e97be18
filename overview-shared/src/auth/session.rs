/// Session token signing and verification
///
/// A session token is a compact HS256 JWT carrying the user's identity
/// (`sub`, `email`, optional `name`) plus `iat`/`exp`. Tokens are stateless:
/// nothing is stored server-side, and a token is valid for as long as its
/// signature matches the configured secret and `exp` has not passed.
///
/// # Security
///
/// - **Algorithm**: HS256 only; tokens signed with any other algorithm are rejected
/// - **Expiration**: checked with zero leeway
/// - **Secret**: required at startup and at least 32 bytes (see [`SessionSecret`])
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use overview_shared::auth::session::{sign_session, verify_session, SessionIdentity};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "an-example-secret-that-is-32-bytes!!";
/// let identity = SessionIdentity::new("u1", "ops@example.com", None);
///
/// let token = sign_session(&identity, Duration::hours(1), secret)?;
/// assert!(verify_session(&token, secret).is_some());
/// assert!(verify_session(&token, "some-other-secret-of-enough-length!").is_none());
/// # Ok(())
/// # }
/// ```

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum accepted length of the signing secret, in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Default session lifetime used when none is configured
pub const DEFAULT_SESSION_TTL: &str = "7d";

/// Longest accepted session lifetime, in seconds (100 years)
pub const MAX_SESSION_TTL_SECS: i64 = 100 * 31_536_000;

/// Error type for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to sign a token
    #[error("Failed to sign session token: {0}")]
    SignError(String),

    /// Token `exp` is in the past
    #[error("Session token has expired")]
    Expired,

    /// Signature does not match the secret
    #[error("Session token signature is invalid")]
    InvalidSignature,

    /// Token could not be decoded
    #[error("Malformed session token: {0}")]
    Malformed(String),

    /// Lifetime string could not be parsed
    #[error("Invalid session lifetime: '{0}'")]
    InvalidTtl(String),

    /// Secret is shorter than [`MIN_SECRET_LEN`]
    #[error("Session secret must be at least 32 bytes, got {0}")]
    WeakSecret(usize),
}

/// The server-held signing secret
///
/// Construction fails for secrets shorter than [`MIN_SECRET_LEN`], so a
/// running server can never sign with a missing or placeholder key.
#[derive(Clone)]
pub struct SessionSecret(String);

impl SessionSecret {
    /// Wraps a secret, rejecting ones that are too short
    pub fn new(secret: impl Into<String>) -> Result<Self, SessionError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(SessionError::WeakSecret(secret.len()));
        }
        Ok(Self(secret))
    }

    /// Returns the raw secret
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSecret(**redacted**)")
    }
}

/// Who a session belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// User ID
    pub sub: String,

    /// User email
    pub email: String,

    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SessionIdentity {
    pub fn new(sub: impl Into<String>, email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            sub: sub.into(),
            email: email.into(),
            name,
        }
    }
}

/// Claims encoded in a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - user ID
    pub sub: String,

    /// User email
    pub email: String,

    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Issues claims for `identity` expiring `ttl` from now
    ///
    /// A negative `ttl` produces already-expired claims, which is only useful in tests.
    /// Fails with [`SessionError::InvalidTtl`] when the expiration is not representable.
    pub fn issue(identity: &SessionIdentity, ttl: Duration) -> Result<Self, SessionError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| SessionError::InvalidTtl(format!("{}s", ttl.num_seconds())))?;

        Ok(Self {
            sub: identity.sub.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }

    /// The identity part of the claims
    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity {
            sub: self.sub.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }

    /// Checks if the claims have expired; a token is dead at `exp` itself
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Encodes and signs claims with HS256
pub fn create_token(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| SessionError::SignError(e.to_string()))
}

/// Decodes a token, reporting why it was rejected
///
/// Most callers want [`verify_session`], which collapses every failure into `None`.
pub fn validate_token(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => SessionError::Expired,
        ErrorKind::InvalidSignature => SessionError::InvalidSignature,
        _ => SessionError::Malformed(e.to_string()),
    })?;

    // jsonwebtoken still accepts a token during its `exp` second
    if data.claims.is_expired() {
        return Err(SessionError::Expired);
    }

    Ok(data.claims)
}

/// Signs a new session for `identity` valid for `ttl`
pub fn sign_session(
    identity: &SessionIdentity,
    ttl: Duration,
    secret: &str,
) -> Result<String, SessionError> {
    create_token(&SessionClaims::issue(identity, ttl)?, secret)
}

/// Verifies a session token
///
/// Returns `None` for any failure (bad signature, malformed, expired). The
/// reason is logged at debug level and never surfaced to the caller.
pub fn verify_session(token: &str, secret: &str) -> Option<SessionClaims> {
    match validate_token(token, secret) {
        Ok(claims) => Some(claims),
        Err(e) => {
            debug!(error = %e, "Session token rejected");
            None
        }
    }
}

/// Parses a lifetime such as `"7d"`, `"7 days"`, `"12h"` or `"3600"`
///
/// A bare number is read as seconds. Years are 365 days. Lifetimes above
/// [`MAX_SESSION_TTL_SECS`] are rejected.
pub fn parse_ttl(input: &str) -> Result<Duration, SessionError> {
    let invalid = || SessionError::InvalidTtl(input.to_string());

    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    let amount: i64 = digits.parse().map_err(|_| invalid())?;

    let unit_seconds: i64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600,
        "d" | "day" | "days" => 86_400,
        "w" | "week" | "weeks" => 604_800,
        "y" | "yr" | "yrs" | "year" | "years" => 31_536_000,
        _ => return Err(invalid()),
    };

    amount
        .checked_mul(unit_seconds)
        .filter(|seconds| (1..=MAX_SESSION_TTL_SECS).contains(seconds))
        .and_then(Duration::try_seconds)
        .ok_or_else(invalid)
}
