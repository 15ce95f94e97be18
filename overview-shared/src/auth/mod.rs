/// Authentication utilities
///
/// # Modules
///
/// - [`session`]: Signed session tokens (HS256 JWT) carrying user identity
/// - [`password`]: Stored credential verification (Argon2id plus legacy formats)
/// - [`cookie`]: `session_token` cookie parsing and `Set-Cookie` values
/// - [`middleware`]: The request gate deciding pass/redirect/reject per request
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use overview_shared::auth::session::{sign_session, verify_session, SessionIdentity};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "an-example-secret-that-is-32-bytes!!";
/// let identity = SessionIdentity::new("user-1", "ana@example.com", Some("Ana".to_string()));
///
/// let token = sign_session(&identity, Duration::days(7), secret)?;
/// let claims = verify_session(&token, secret).expect("fresh token verifies");
/// assert_eq!(claims.identity(), identity);
/// # Ok(())
/// # }
/// ```

pub mod cookie;
pub mod middleware;
pub mod password;
pub mod session;
