use std::sync::Arc;

use auth::Claims;
use auth::JwtError;
use auth::JwtHandler;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use thiserror::Error;

use crate::domain::auth::models::App;
use crate::domain::auth::models::User;

/// Source of the current time for token issuance.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Longest time-to-live a token may be issued with.
pub const MAX_TTL_SECONDS: i64 = 366 * 24 * 60 * 60;

#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Token time-to-live must be positive, got {0} seconds")]
    NonPositiveTtl(i64),

    #[error("Token time-to-live is too long: {0} seconds")]
    TtlTooLong(i64),

    #[error("Token expiry is out of range")]
    ExpiryOutOfRange,

    #[error(transparent)]
    Jwt(#[from] JwtError),
}

/// Issues signed, expiring access tokens.
///
/// Output depends only on the user, the application, the TTL and the clock,
/// so a fixed clock makes issuance fully deterministic.
#[derive(Clone)]
pub struct TokenIssuer {
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// # Errors
    /// * `NonPositiveTtl` - `ttl` is zero or negative
    /// * `TtlTooLong` - `ttl` exceeds [`MAX_TTL_SECONDS`]
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self, TokenError> {
        if ttl <= Duration::zero() {
            return Err(TokenError::NonPositiveTtl(ttl.num_seconds()));
        }

        if ttl.num_seconds() > MAX_TTL_SECONDS {
            return Err(TokenError::TtlTooLong(ttl.num_seconds()));
        }

        Ok(Self { ttl, clock })
    }

    /// Sign a token for `user` with the secret of `app`.
    ///
    /// # Errors
    /// * `ExpiryOutOfRange` - The clock is too close to the end of time
    /// * `Jwt` - The secret is unusable or signing failed
    pub fn issue(&self, user: &User, app: &App) -> Result<String, TokenError> {
        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;

        let claims = Claims::new(
            user.id.0,
            user.email.as_str(),
            app.id.0,
            issued_at.timestamp(),
            expires_at.timestamp(),
        );

        let handler = JwtHandler::new(app.secret.expose())?;
        Ok(handler.encode(&claims)?)
    }
}
