//! Authentication service port and its exchange types.
//!
//! The remote portal API is an external collaborator: this module defines
//! the boundary the rest of the client programs against. Credential
//! exchange and registration go over the network; token presence and the
//! cached identity are local-only lookups backed by a [`CredentialStore`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::user::{Role, User};

/// Credentials submitted for a login exchange.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration input as collected by the client, before role-specific
/// shaping. All role-specific fields are optional here; the session store
/// decides which ones make it onto the wire.
#[derive(Debug, Clone)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub department: Option<String>,
    pub level: Option<String>,
    pub matric_number: Option<String>,
}

/// The role-shaped registration payload sent to the remote API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matric_number: Option<String>,
}

/// A successful credential exchange: the resolved identity plus the opaque
/// token the adapter stores locally.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Port for the remote authentication service.
///
/// `login` and `register` perform the network exchange and persist the
/// issued token through the adapter's own storage boundary. `logout`,
/// `is_authenticated` and `current_user` never touch the network.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges credentials for an identity and a token.
    async fn login(&self, credentials: Credentials) -> Result<AuthSession>;

    /// Registers a new account and signs it in.
    async fn register(&self, payload: RegisterPayload) -> Result<AuthSession>;

    /// Clears the locally stored token and cached identity. Local-only.
    fn logout(&self);

    /// Whether a plausible token is present locally. No network call, no
    /// validation beyond presence.
    fn is_authenticated(&self) -> bool;

    /// The locally cached identity associated with the stored token, if any.
    fn current_user(&self) -> Option<User>;

    /// Confirms an email address with a server-issued token.
    async fn verify_email(&self, token: &str) -> Result<()>;

    /// Asks the server to re-send the verification email.
    async fn resend_verification_email(&self, email: &str) -> Result<()>;
}

/// Local storage boundary for the credential token and the cached identity.
///
/// Owned by the auth service adapter; nothing else reads or writes these
/// records. Reads are synchronous lookups against small local files.
pub trait CredentialStore: Send + Sync {
    /// Stores the token and the identity it resolves to.
    fn store(&self, token: &str, user: &User) -> Result<()>;

    /// The stored token, if present.
    fn token(&self) -> Option<String>;

    /// The cached identity, if present.
    fn cached_user(&self) -> Option<User>;

    /// Removes both records. Safe to call when nothing is stored.
    fn clear(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_payload_omits_absent_fields() {
        let payload = RegisterPayload {
            email: "ada@school.edu".to_string(),
            password: "secret".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            role: Role::Lecturer,
            department: Some("Physics".to_string()),
            level: None,
            matric_number: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["department"], "Physics");
        assert!(json.get("matricNumber").is_none());
        assert!(json.get("level").is_none());
    }

    #[test]
    fn test_auth_session_deserializes() {
        let json = r#"{
            "user": {
                "id": "1",
                "firstName": "Ada",
                "lastName": "Obi",
                "email": "ada@school.edu",
                "role": "student"
            },
            "token": "tok-123"
        }"#;
        let session: AuthSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.token, "tok-123");
        assert_eq!(session.user.id, "1");
    }
}
