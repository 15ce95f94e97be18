/// The `session_token` cookie
///
/// The cookie is `HttpOnly`, `SameSite=Lax`, scoped to `/`, and `Secure`
/// when the server runs in production. Its `Max-Age` matches the token
/// lifetime so the browser drops it at the same moment the token expires.

use axum::http::{header, HeaderMap, HeaderValue};
use chrono::Duration;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session_token";

/// Reads a cookie value from the request headers
///
/// Empty values are treated as absent.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reads the session token, if any
pub fn read_session_token(headers: &HeaderMap) -> Option<String> {
    read_cookie(headers, SESSION_COOKIE)
}

/// Builds the `Set-Cookie` value carrying a freshly signed token
pub fn session_cookie(
    token: &str,
    max_age: Duration,
    secure: bool,
) -> Result<HeaderValue, header::InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax{}",
        SESSION_COOKIE,
        token,
        max_age.num_seconds(),
        if secure { "; Secure" } else { "" }
    ))
}

/// Builds the `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    if secure {
        HeaderValue::from_static(
            "session_token=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax; Secure",
        )
    } else {
        HeaderValue::from_static(
            "session_token=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_read_cookie_among_others() {
        let headers = headers_with_cookie("theme=dark; session_token=abc.def.ghi; lang=pt");
        assert_eq!(read_session_token(&headers).as_deref(), Some("abc.def.ghi"));
        assert_eq!(read_cookie(&headers, "lang").as_deref(), Some("pt"));
    }

    #[test]
    fn test_read_cookie_missing_or_empty() {
        assert!(read_session_token(&HeaderMap::new()).is_none());
        assert!(read_session_token(&headers_with_cookie("theme=dark")).is_none());
        assert!(read_session_token(&headers_with_cookie("session_token=")).is_none());
    }

    #[test]
    fn test_read_cookie_does_not_match_prefixes() {
        let headers = headers_with_cookie("old_session_token=zzz");
        assert!(read_session_token(&headers).is_none());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let value = session_cookie("tok", Duration::days(7), false).unwrap();
        let value = value.to_str().unwrap();

        assert!(value.starts_with("session_token=tok;"));
        assert!(value.contains("Path=/"));
        assert!(value.contains("Max-Age=604800"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
        assert!(!value.contains("Secure"));

        let secure = session_cookie("tok", Duration::days(7), true).unwrap();
        assert!(secure.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn test_clear_session_cookie_expires_immediately() {
        let value = clear_session_cookie(false);
        let value = value.to_str().unwrap();
        assert!(value.starts_with("session_token=;"));
        assert!(value.contains("Max-Age=0"));
    }
}
