//! Authentication collaborator contract
//!
//! Authentication is delegated to a hosted provider; this module only
//! defines the narrow contract the rest of the system talks to, plus
//! normalization of the provider's raw error strings into messages fit
//! for a notice.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Credential pair for sign-in and sign-up
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Sign-up payload: credentials plus initial profile metadata
#[derive(Debug, Clone)]
pub struct SignUp {
    pub credentials: Credentials,
    pub display_name: String,
    pub username: String,
}

/// Supported OAuth providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OauthProvider {
    Google,
    Facebook,
}

impl OauthProvider {
    pub fn as_tag(&self) -> &'static str {
        match self {
            OauthProvider::Google => "google",
            OauthProvider::Facebook => "facebook",
        }
    }
}

/// An established auth session: the signed-in user's id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: Uuid,
}

/// Authentication failed; the message is already user-facing
#[derive(Error, Debug)]
#[error("{message}")]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    /// Wrap a raw provider error, normalizing its message
    pub fn from_provider(raw: &str) -> Self {
        Self {
            message: normalize_auth_error(raw),
        }
    }
}

/// Hosted authentication provider
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Sign in with a credential pair
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AuthError>;

    /// Sign up with credentials plus profile metadata
    async fn sign_up(&self, signup: &SignUp) -> Result<AuthSession, AuthError>;

    /// URL to redirect to for OAuth sign-in
    fn oauth_redirect_url(&self, provider: OauthProvider, return_to: &str) -> String;
}

/// Map known raw provider phrases to user-facing messages
pub fn normalize_auth_error(raw: &str) -> String {
    if raw.contains("Invalid login credentials") {
        return "Incorrect email or password.".to_string();
    }
    if raw.contains("Email not confirmed") {
        return "Please confirm your email address before signing in.".to_string();
    }
    if raw.contains("48 seconds") {
        return "Please wait a moment before trying again.".to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_known_phrases() {
        assert_eq!(
            normalize_auth_error("Invalid login credentials"),
            "Incorrect email or password."
        );
        assert_eq!(
            normalize_auth_error("Email not confirmed"),
            "Please confirm your email address before signing in."
        );
        assert_eq!(
            normalize_auth_error("For security purposes, you can only request this after 48 seconds"),
            "Please wait a moment before trying again."
        );
    }

    #[test]
    fn test_unknown_messages_pass_through() {
        assert_eq!(normalize_auth_error("Server exploded"), "Server exploded");
    }

    #[test]
    fn test_from_provider_normalizes() {
        let err = AuthError::from_provider("Invalid login credentials");
        assert_eq!(err.to_string(), "Incorrect email or password.");
    }
}
