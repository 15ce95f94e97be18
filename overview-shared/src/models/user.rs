/// User model
///
/// Users live in the `users` collection of the document store, next to the
/// dashboard collections but never reachable through the collection API.
///
/// ```json
/// {
///   "id": "u_p0x81kd",
///   "email": "ana@example.com",
///   "password": "$argon2id$v=19$...",
///   "name": "Ana"
/// }
/// ```
///
/// `password` holds whatever the account was created with: an Argon2 PHC
/// string for accounts created by the admin CLI, or a legacy SHA-256 hex
/// digest / plaintext value for imported accounts. See
/// [`crate::auth::password::verify_stored_credential`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Record;

/// Collection holding login accounts
pub const USERS_COLLECTION: &str = "users";

/// Prefix of generated user ids
pub const USER_ID_PREFIX: char = 'a';

/// A login account as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,

    /// Lowercased email
    pub email: String,

    /// Stored credential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// New record with a normalized email
    pub fn new(id: impl Into<String>, email: &str, password: String, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            email: normalize_email(email),
            password: Some(password),
            name: name.filter(|n| !n.trim().is_empty()),
            extra: Map::new(),
        }
    }

    /// The part of the record that may be shown to the user
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

impl Record for UserRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

/// User data returned by the login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

/// Emails are matched case-insensitively by storing them lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_user_normalizes_email() {
        let user = UserRecord::new("a_1", "  Ana@Example.COM ", "hash".to_string(), Some(" ".to_string()));
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.name, None);
    }

    #[test]
    fn test_public_user_never_carries_password() {
        let user = UserRecord::new("a_1", "ana@example.com", "secret".to_string(), Some("Ana".to_string()));
        let public = serde_json::to_value(user.public()).unwrap();

        assert_eq!(public, json!({"id": "a_1", "email": "ana@example.com", "name": "Ana"}));
    }

    #[test]
    fn test_user_without_password_parses() {
        let user: UserRecord =
            serde_json::from_value(json!({"id": "a_1", "email": "x@example.com"})).unwrap();
        assert!(user.password.is_none());
    }
}
