use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried by an access token.
///
/// Field names are part of the wire contract: relying parties decode `uid`,
/// `email` and `app_id` directly, and `exp` / `iat` follow RFC 7519.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User identifier
    pub uid: i64,

    /// User email
    pub email: String,

    /// Identifier of the application the token was issued for
    pub app_id: i32,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build claims for a user and application, valid between `issued_at`
    /// and `expires_at` (both Unix timestamps).
    pub fn new(
        uid: i64,
        email: impl Into<String>,
        app_id: i32,
        issued_at: i64,
        expires_at: i64,
    ) -> Self {
        Self {
            uid,
            email: email.into(),
            app_id,
            iat: issued_at,
            exp: expires_at,
        }
    }

    /// Lifetime of the token in seconds.
    pub fn ttl_seconds(&self) -> i64 {
        self.exp - self.iat
    }
}
