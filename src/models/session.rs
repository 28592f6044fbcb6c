//! Session model

use chrono::{DateTime, Utc};
use serde::Serialize;

/// An authenticated admin session minted at login.
///
/// The token is the signed credential; `expires` mirrors the token's own
/// cryptographic expiry and drives the cookie lifetime.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Signed session token
    pub token: String,
    /// Authenticated admin email
    pub email: String,
    /// Token expiry
    pub expires: DateTime<Utc>,
}
