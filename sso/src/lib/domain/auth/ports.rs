use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::context::RequestContext;

/// Port for the authentication operations exposed to transports.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `ctx` - Correlation id and cancellation signals
    /// * `email` - Non-empty email
    /// * `password` - Non-empty plaintext password (hashed before persistence)
    ///
    /// # Returns
    /// Identifier assigned to the new user
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Email is already registered
    /// * `Internal` - Hashing or storage failed
    /// * `Canceled` / `DeadlineExceeded` - Caller gave up
    async fn register(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<UserId, AuthError>;

    /// Verify credentials and issue an access token for an application.
    ///
    /// # Arguments
    /// * `ctx` - Correlation id and cancellation signals
    /// * `email` - Non-empty email
    /// * `password` - Non-empty plaintext password
    /// * `app_id` - Non-zero application identifier
    ///
    /// # Returns
    /// Signed token string
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Internal` - Unknown application, corrupt stored hash, storage or signing failure
    /// * `Canceled` / `DeadlineExceeded` - Caller gave up
    async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
        app_id: AppId,
    ) -> Result<String, AuthError>;

    /// Report whether a user holds administrator privileges.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No user with this identifier
    /// * `Internal` - Storage failed
    /// * `Canceled` / `DeadlineExceeded` - Caller gave up
    async fn is_admin(&self, ctx: &RequestContext, user_id: UserId) -> Result<bool, AuthError>;
}

/// Persists new users.
#[async_trait]
pub trait UserSaver: Send + Sync + 'static {
    /// Insert a user with the given email and password hash.
    ///
    /// Email uniqueness must be enforced atomically at insertion.
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<UserId, StorageError>;
}

/// Reads users.
#[async_trait]
pub trait UserProvider: Send + Sync + 'static {
    /// Find a user by email.
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this email
    /// * `DatabaseError` - Database operation failed
    async fn user(&self, email: &str) -> Result<User, StorageError>;

    /// Read the administrator flag of a user.
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this identifier
    /// * `DatabaseError` - Database operation failed
    async fn is_admin(&self, user_id: UserId) -> Result<bool, StorageError>;
}

/// Reads applications.
#[async_trait]
pub trait AppProvider: Send + Sync + 'static {
    /// Find an application by identifier.
    ///
    /// # Errors
    /// * `AppNotFound` - No application with this identifier
    /// * `DatabaseError` - Database operation failed
    async fn app(&self, app_id: AppId) -> Result<App, StorageError>;
}
