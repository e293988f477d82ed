use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use tracing::Instrument;
use tracing::Span;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AppProvider;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;
use crate::domain::auth::token::TokenIssuer;
use crate::domain::context::RequestContext;

/// Domain service implementation for authentication.
///
/// Stateless: every call derives its own span from the injected parent span,
/// tagged with the operation and the caller's correlation id, and holds no
/// state between calls. Store calls and password hashing are raced against
/// the caller's cancellation token and deadline.
pub struct AuthService<US, UP, AP>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
{
    log: Span,
    user_saver: Arc<US>,
    user_provider: Arc<UP>,
    app_provider: Arc<AP>,
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
}

impl<US, UP, AP> AuthService<US, UP, AP>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `log` - Parent span every operation's span is attached to
    /// * `user_saver` - Persists new users
    /// * `user_provider` - Looks up users and their admin flag
    /// * `app_provider` - Looks up applications
    /// * `password_hasher` - Hashing with the configured cost
    /// * `token_issuer` - Signs access tokens
    pub fn new(
        log: Span,
        user_saver: Arc<US>,
        user_provider: Arc<UP>,
        app_provider: Arc<AP>,
        password_hasher: PasswordHasher,
        token_issuer: TokenIssuer,
    ) -> Self {
        Self {
            log,
            user_saver,
            user_provider,
            app_provider,
            password_hasher,
            token_issuer,
        }
    }

    async fn hash_password(
        &self,
        ctx: &RequestContext,
        op: &'static str,
        password: &str,
    ) -> Result<String, AuthError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_owned();
        let task = tokio::task::spawn_blocking(move || hasher.hash(&password));

        match ctx.run(task).await? {
            Ok(Ok(hash)) => Ok(hash),
            Ok(Err(e)) => Err(AuthError::internal(op, e)),
            Err(e) => Err(AuthError::internal(op, e)),
        }
    }

    async fn verify_password(
        &self,
        ctx: &RequestContext,
        op: &'static str,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, AuthError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        let task = tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash));

        match ctx.run(task).await? {
            Ok(Ok(matches)) => Ok(matches),
            Ok(Err(e)) => Err(AuthError::internal(op, e)),
            Err(e) => Err(AuthError::internal(op, e)),
        }
    }
}

/// Run one operation inside its span and record interruptions, which are
/// the only failures not already logged where they were observed.
async fn audited<T, F>(span: Span, operation: F) -> Result<T, AuthError>
where
    F: Future<Output = Result<T, AuthError>>,
{
    async move {
        let result = operation.await;
        if let Err(e @ (AuthError::Canceled | AuthError::DeadlineExceeded)) = &result {
            tracing::warn!(error = %e, "request interrupted");
        }
        result
    }
    .instrument(span)
    .await
}

#[async_trait]
impl<US, UP, AP> AuthServicePort for AuthService<US, UP, AP>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
{
    async fn register(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<UserId, AuthError> {
        const OP: &str = "auth.register";

        let span = tracing::info_span!(
            parent: &self.log,
            "register",
            op = OP,
            request_id = %ctx.request_id(),
            email = %email,
        );

        audited(span, async {
            tracing::info!("registering user");

            let password_hash = match self.hash_password(ctx, OP, password).await {
                Ok(hash) => hash,
                Err(e) => {
                    if matches!(e, AuthError::Internal { .. }) {
                        tracing::error!(error = %e, "failed to generate password hash");
                    }
                    return Err(e);
                }
            };

            match ctx
                .run(self.user_saver.save_user(email, &password_hash))
                .await?
            {
                Ok(user_id) => {
                    tracing::info!(user_id = %user_id, "user registered");
                    Ok(user_id)
                }
                Err(StorageError::UserAlreadyExists(email)) => {
                    tracing::warn!("user already exists");
                    Err(AuthError::UserAlreadyExists(email))
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to save user");
                    Err(AuthError::internal(OP, e))
                }
            }
        })
        .await
    }

    async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
        app_id: AppId,
    ) -> Result<String, AuthError> {
        const OP: &str = "auth.login";

        let span = tracing::info_span!(
            parent: &self.log,
            "login",
            op = OP,
            request_id = %ctx.request_id(),
            email = %email,
            app_id = %app_id,
        );

        audited(span, async {
            tracing::info!("attempting to login user");

            let user = match ctx.run(self.user_provider.user(email)).await? {
                Ok(user) => user,
                Err(StorageError::UserNotFound) => {
                    tracing::warn!("user not found");
                    // Spend the same Argon2 cost as a password mismatch.
                    return match self.hash_password(ctx, OP, password).await {
                        Err(e @ (AuthError::Canceled | AuthError::DeadlineExceeded)) => Err(e),
                        _ => Err(AuthError::InvalidCredentials),
                    };
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to get user");
                    return Err(AuthError::internal(OP, e));
                }
            };

            match self
                .verify_password(ctx, OP, password, &user.password_hash)
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!(user_id = %user.id, "invalid password");
                    return Err(AuthError::InvalidCredentials);
                }
                Err(e) => {
                    if matches!(e, AuthError::Internal { .. }) {
                        tracing::error!(user_id = %user.id, error = %e, "failed to verify password");
                    }
                    return Err(e);
                }
            }

            let app = match ctx.run(self.app_provider.app(app_id)).await? {
                Ok(app) => app,
                Err(e) => {
                    tracing::error!(error = %e, "failed to get app");
                    return Err(AuthError::internal(OP, e));
                }
            };

            match self.token_issuer.issue(&user, &app) {
                Ok(token) => {
                    tracing::info!(user_id = %user.id, "user logged in successfully");
                    Ok(token)
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to make token");
                    Err(AuthError::internal(OP, e))
                }
            }
        })
        .await
    }

    async fn is_admin(&self, ctx: &RequestContext, user_id: UserId) -> Result<bool, AuthError> {
        const OP: &str = "auth.is_admin";

        let span = tracing::info_span!(
            parent: &self.log,
            "is_admin",
            op = OP,
            request_id = %ctx.request_id(),
            user_id = %user_id,
        );

        audited(span, async {
            tracing::info!("checking if user is admin");

            match ctx.run(self.user_provider.is_admin(user_id)).await? {
                Ok(is_admin) => {
                    tracing::info!(is_admin, "checked if user is admin");
                    Ok(is_admin)
                }
                Err(StorageError::UserNotFound) => {
                    tracing::warn!("user not found");
                    Err(AuthError::InvalidCredentials)
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to check admin flag");
                    Err(AuthError::internal(OP, e))
                }
            }
        })
        .await
    }
}
