/// Authentication endpoints
///
/// - `POST /api/auth/login` - Verify credentials and set the session cookie
/// - `POST /api/auth/logout` - Clear the session cookie
///
/// Both are exempt from the session gate. Sessions are stateless, so logout
/// only removes the cookie; a copied token stays valid until it expires.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{AppendHeaders, IntoResponse},
    Json,
};
use overview_shared::{
    auth::{
        cookie::{clear_session_cookie, session_cookie},
        password::{verify_dummy_credential, verify_stored_credential},
        session::{sign_session, SessionIdentity},
    },
    models::user::{normalize_email, PublicUser, UserRecord, USERS_COLLECTION},
    store::StoreError,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use validator::Validate;

/// Login request
///
/// Absent fields deserialize as empty strings so that "missing" and "empty"
/// are reported the same way.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address, matched case-insensitively
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    /// Password
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub ok: bool,
    pub user: PublicUser,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid email or password".to_string())
}

/// Login handler
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "ana@example.com", "password": "..." }
/// ```
///
/// On success the response carries
/// `Set-Cookie: session_token=...; Path=/; Max-Age=...; HttpOnly; SameSite=Lax`
/// and the body `{"ok": true, "user": {"id", "email", "name"}}`.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body, or email/password missing
/// - `401 Unauthorized`: Unknown email or wrong password (same message for both)
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = body.map_err(|_| ApiError::MissingFields)?;
    req.validate().map_err(|_| ApiError::MissingFields)?;

    let email = normalize_email(&req.email);

    let user = match state
        .store
        .find_by_field(USERS_COLLECTION, "email", &email)
        .await?
    {
        Some(doc) => serde_json::from_value::<UserRecord>(doc).map_err(StoreError::from)?,
        None => {
            verify_dummy_credential(&req.password);
            debug!("Login attempt for unknown email");
            return Err(invalid_credentials());
        }
    };

    let verified = match user.password.as_deref() {
        Some(stored) => verify_stored_credential(&req.password, stored),
        None => {
            verify_dummy_credential(&req.password);
            false
        }
    };

    if !verified {
        debug!(user_id = %user.id, "Login attempt with wrong password");
        return Err(invalid_credentials());
    }

    let ttl = state.config.session.ttl;
    let identity = SessionIdentity::new(user.id.clone(), user.email.clone(), user.name.clone());
    let token = sign_session(&identity, ttl, state.session_secret())?;

    let cookie = session_cookie(&token, ttl, state.secure_cookies())
        .map_err(|e| ApiError::InternalError(format!("Invalid cookie value: {}", e)))?;

    info!(user_id = %user.id, "User logged in");

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(LoginResponse {
            ok: true,
            user: user.public(),
        }),
    ))
}

/// Logout handler
///
/// ```text
/// POST /api/auth/logout
/// ```
///
/// Always succeeds with `{"ok": true}`.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        AppendHeaders([(
            header::SET_COOKIE,
            clear_session_cookie(state.secure_cookies()),
        )]),
        Json(json!({ "ok": true })),
    )
}
