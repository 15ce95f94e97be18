/// Request gate for Axum
///
/// Every request passes through [`session_gate`], which applies a fixed,
/// linear decision table:
///
/// | # | request                         | session        | outcome                         |
/// |---|---------------------------------|----------------|---------------------------------|
/// | 1 | static asset / internal path    | any            | pass through                    |
/// | 2 | `/api/auth/login`, `/logout`    | any            | pass through                    |
/// | 3 | `/login`                        | valid          | redirect to `/`                 |
/// | 3 | `/login`                        | missing/invalid| pass through                    |
/// | 4 | API path                        | missing/invalid| `401` JSON                      |
/// | 5 | page path                       | missing/invalid| redirect to `/login?from=...`   |
/// | 6 | API or page path                | valid          | forward with identity headers   |
///
/// Missing, expired, tampered and malformed tokens are handled identically;
/// the client never learns why a session was refused.
///
/// # Request Extensions
///
/// Forwarded requests carry a [`SessionContext`] extension and the
/// `x-user-email` / `x-user-name` headers. The same headers are mirrored on
/// the response.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use overview_shared::auth::middleware::create_session_gate;
///
/// let app: Router = Router::new()
///     .route("/api/clients", get(|| async { "[]" }))
///     .layer(middleware::from_fn(create_session_gate("a-secret-of-at-least-32-bytes!!!!")));
/// ```

use std::{future::Future, pin::Pin};

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::{
    cookie::read_session_token,
    session::{verify_session, SessionClaims},
};

/// Header carrying the authenticated email
pub const USER_EMAIL_HEADER: HeaderName = HeaderName::from_static("x-user-email");

/// Header carrying the authenticated display name
pub const USER_NAME_HEADER: HeaderName = HeaderName::from_static("x-user-name");

/// Path of the login page
pub const LOGIN_PATH: &str = "/login";

const STATIC_PREFIXES: &[&str] = &["/_next", "/assets", "/static", "/icon"];
const STATIC_PATHS: &[&str] = &["/favicon.ico", "/health"];
const STATIC_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "txt", "xml", "css", "js", "woff", "woff2",
    "ttf", "eot", "map",
];
const PUBLIC_AUTH_PREFIXES: &[&str] = &["/api/auth/login", "/api/auth/logout"];

/// What kind of resource a path addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Static assets and internal endpoints, never gated
    StaticAsset,

    /// Login/logout endpoints
    PublicAuth,

    /// The login page
    LoginPage,

    /// JSON API under `/api`
    Api,

    /// Any other (HTML) page
    Page,
}

/// Session state of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No `session_token` cookie
    Missing,

    /// Cookie present but the token failed verification
    Invalid,

    /// Verified claims
    Valid(SessionClaims),
}

impl SessionState {
    /// Resolves the session state from the request headers
    pub fn from_headers(headers: &HeaderMap, secret: &str) -> Self {
        match read_session_token(headers) {
            None => SessionState::Missing,
            Some(token) => match verify_session(&token, secret) {
                Some(claims) => SessionState::Valid(claims),
                None => SessionState::Invalid,
            },
        }
    }
}

/// Outcome of the gate for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Hand the request on untouched
    PassThrough,

    /// Already signed in, send the login page visitor home; carries the location
    RedirectHome(String),

    /// Reject an API call with 401
    Unauthorized,

    /// Send the browser to the login page with this location
    RedirectToLogin(String),

    /// Forward with the verified identity attached
    Forward(SessionClaims),
}

/// Authenticated identity added to request extensions
///
/// ```
/// use axum::Extension;
/// use overview_shared::auth::middleware::SessionContext;
///
/// async fn handler(Extension(session): Extension<SessionContext>) -> String {
///     format!("Hello, {}", session.email)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Authenticated user ID
    pub user_id: String,

    /// Authenticated email
    pub email: String,

    /// Display name, when the user has one
    pub name: Option<String>,
}

impl From<SessionClaims> for SessionContext {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }
}

/// Classifies a request path
pub fn classify(path: &str) -> RouteClass {
    let is_api = path == "/api" || path.starts_with("/api/");

    if PUBLIC_AUTH_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return RouteClass::PublicAuth;
    }

    if is_api {
        return RouteClass::Api;
    }

    if STATIC_PATHS.contains(&path)
        || STATIC_PREFIXES.iter().any(|p| path.starts_with(p))
        || has_static_extension(path)
    {
        return RouteClass::StaticAsset;
    }

    if path.starts_with(LOGIN_PATH) {
        return RouteClass::LoginPage;
    }

    RouteClass::Page
}

fn has_static_extension(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| STATIC_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Builds the login redirect for an unauthenticated page request
///
/// The original path and query travel in `from`, except for the home page.
pub fn login_redirect_location(path: &str, query: Option<&str>) -> String {
    if path.is_empty() || path == "/" {
        return LOGIN_PATH.to_string();
    }

    let target = match query.filter(|q| !q.is_empty()) {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    format!("{LOGIN_PATH}?from={}", urlencoding::encode(&target))
}

/// Home page location, keeping the original query string
pub fn home_location(query: Option<&str>) -> String {
    match query.filter(|q| !q.is_empty()) {
        Some(query) => format!("/?{query}"),
        None => "/".to_string(),
    }
}

/// Applies the decision table to one request
pub fn decide(path: &str, query: Option<&str>, session: SessionState) -> GateDecision {
    match classify(path) {
        RouteClass::StaticAsset | RouteClass::PublicAuth => GateDecision::PassThrough,
        RouteClass::LoginPage => match session {
            SessionState::Valid(_) => GateDecision::RedirectHome(home_location(query)),
            _ => GateDecision::PassThrough,
        },
        class => match session {
            SessionState::Valid(claims) => GateDecision::Forward(claims),
            SessionState::Missing | SessionState::Invalid if class == RouteClass::Api => {
                GateDecision::Unauthorized
            }
            SessionState::Missing | SessionState::Invalid => {
                GateDecision::RedirectToLogin(login_redirect_location(path, query))
            }
        },
    }
}

/// Identity headers for a verified session
pub fn identity_headers(claims: &SessionClaims) -> HeaderMap {
    let mut headers = HeaderMap::new();

    match HeaderValue::from_str(&claims.email) {
        Ok(value) => {
            headers.insert(USER_EMAIL_HEADER, value);
        }
        Err(_) => warn!(user_id = %claims.sub, "Email is not a valid header value"),
    }

    // Names may hold non-ASCII characters; header values allow them as opaque bytes
    if let Some(name) = &claims.name {
        match HeaderValue::from_bytes(name.as_bytes()) {
            Ok(value) => {
                headers.insert(USER_NAME_HEADER, value);
            }
            Err(_) => warn!(user_id = %claims.sub, "Name is not a valid header value"),
        }
    }

    headers
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "unauthorized", "message": "Unauthorized" })),
    )
        .into_response()
}

/// Session gate middleware
///
/// Identity headers supplied by the client are always stripped before the
/// decision, so downstream code can trust them.
pub async fn session_gate(secret: &str, mut req: Request, next: Next) -> Response {
    req.headers_mut().remove(USER_EMAIL_HEADER);
    req.headers_mut().remove(USER_NAME_HEADER);

    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    let session = match classify(&path) {
        RouteClass::StaticAsset | RouteClass::PublicAuth => SessionState::Missing,
        _ => SessionState::from_headers(req.headers(), secret),
    };

    match decide(&path, query.as_deref(), session) {
        GateDecision::PassThrough => next.run(req).await,
        GateDecision::RedirectHome(location) => Redirect::temporary(&location).into_response(),
        GateDecision::Unauthorized => {
            debug!(path = %path, "Rejected unauthenticated API request");
            unauthorized_response()
        }
        GateDecision::RedirectToLogin(location) => {
            debug!(path = %path, "Redirecting unauthenticated request to login");
            Redirect::temporary(&location).into_response()
        }
        GateDecision::Forward(claims) => {
            let identity = identity_headers(&claims);
            req.headers_mut().extend(identity.clone());
            req.extensions_mut().insert(SessionContext::from(claims));

            let mut response = next.run(req).await;
            response.headers_mut().extend(identity);
            response
        }
    }
}

/// Creates a session gate closure capturing the signing secret
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use overview_shared::auth::middleware::create_session_gate;
///
/// let app: Router = Router::new()
///     .route("/", get(|| async { "home" }))
///     .layer(middleware::from_fn(create_session_gate("a-secret-of-at-least-32-bytes!!!!")));
/// ```
pub fn create_session_gate(
    secret: impl Into<String>,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(async move { session_gate(&secret, req, next).await })
    }
}
