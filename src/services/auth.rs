//! Authentication service
//!
//! Checks submitted credentials against the single configured admin
//! identity and mints session tokens. There is no user table; the
//! identity lives in process configuration.
//!
//! Failures are deliberately uniform: the caller only ever learns
//! "invalid credentials", never whether the email or the password was
//! the wrong half.

use thiserror::Error;

use crate::auth::TokenCodec;
use crate::config::AdminConfig;
use crate::models::Session;

/// Built-in development identity, usable only when no admin is
/// configured AND `admin.allow_dev_credentials` is explicitly enabled.
/// Must never be active in a production deployment.
const DEV_EMAIL: &str = "admin@weekendexpress.com";
const DEV_PASSWORD: &str = "secureadmin123";

/// Error types for authentication operations
#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Credentials did not match the configured identity. One variant
    /// for every mismatch: no account enumeration.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Authentication service for the admin back-office
pub struct AuthService {
    admin: AdminConfig,
    codec: TokenCodec,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(admin: AdminConfig, codec: TokenCodec) -> Self {
        if admin.allow_dev_credentials {
            tracing::warn!(
                "Development fallback credentials are enabled; disable \
                 admin.allow_dev_credentials before deploying"
            );
        }
        Self { admin, codec }
    }

    /// Attempt a login with submitted credentials.
    ///
    /// On success returns a [`Session`] whose token the API layer writes
    /// into the http-only cookie. On any mismatch returns
    /// [`AuthServiceError::InvalidCredentials`] with no further detail.
    pub fn login(&self, email: &str, password: &str) -> Result<Session, AuthServiceError> {
        if !self.matches(email, password) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let (token, claims) = self.codec.issue(email);
        Ok(Session {
            token,
            email: email.to_string(),
            expires: claims.expires(),
        })
    }

    fn matches(&self, email: &str, password: &str) -> bool {
        if let (Some(admin_email), Some(admin_password)) =
            (self.admin.email.as_deref(), self.admin.password.as_deref())
        {
            return email == admin_email && password == admin_password;
        }

        if self.admin.allow_dev_credentials {
            let hit = email == DEV_EMAIL && password == DEV_PASSWORD;
            if hit {
                tracing::warn!("Login via development fallback credentials");
            }
            return hit;
        }

        false
    }

    /// The token codec, shared with the session guard.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }
}
