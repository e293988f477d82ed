use std::fmt;

use secrecy::ExposeSecret;
use secrecy::SecretString;

/// Registered principal.
///
/// `password_hash` is always the PHC string produced by the password hasher,
/// never a raw password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// User identifier, assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Application identifier, provisioned out-of-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppId(pub i32);

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Relying party permitted to request tokens.
#[derive(Debug)]
pub struct App {
    pub id: AppId,
    pub name: String,
    pub secret: AppSecret,
}

/// Symmetric key material an application's tokens are signed with.
///
/// Redacted in `Debug` output so it cannot end up in logs by accident.
pub struct AppSecret(SecretString);

impl AppSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(SecretString::from(secret.into()))
    }

    pub fn expose(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppSecret([REDACTED])")
    }
}
