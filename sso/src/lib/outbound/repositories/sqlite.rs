use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqliteJournalMode;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::FromRow;
use sqlx::SqlitePool;

use crate::config::StorageConfig;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::AppSecret;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AppProvider;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Credential store backed by SQLite.
///
/// Email uniqueness is enforced by the `users.email` UNIQUE constraint, so
/// concurrent inserts of the same email resolve inside the database. Emails
/// are compared exactly (case-sensitive).
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::DatabaseError(err.to_string())
    }
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    email: String,
    pass_hash: String,
    is_admin: bool,
}

#[derive(FromRow)]
struct AppRow {
    id: i32,
    name: String,
    secret: String,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating when missing) the database described by `config`.
    ///
    /// An in-memory database is private to its connection, so `:memory:`
    /// always gets a single connection that is kept open.
    pub async fn connect(config: &StorageConfig) -> Result<Self, StorageError> {
        let in_memory = config.path == ":memory:";

        let options = if in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            SqliteConnectOptions::new()
                .filename(&config.path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
        };
        let options = options.busy_timeout(Duration::from_secs(5));

        // The database lives only as long as its one connection, so that
        // connection is never reaped.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;

        Ok(Self::new(pool))
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(e.to_string()))
    }

    /// Provision an application. Applications have no registration flow over
    /// the wire; operators and tests insert them directly.
    pub async fn save_app(
        &self,
        app_id: AppId,
        name: &str,
        secret: &str,
    ) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO apps (id, name, secret) VALUES (?, ?, ?)")
            .bind(app_id.0)
            .bind(name)
            .bind(secret)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Grant or revoke administrator privileges.
    pub async fn set_admin(&self, user_id: UserId, is_admin: bool) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE users SET is_admin = ? WHERE id = ?")
            .bind(is_admin)
            .bind(user_id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::UserNotFound);
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl UserSaver for SqliteStorage {
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<UserId, StorageError> {
        let result = sqlx::query("INSERT INTO users (email, pass_hash) VALUES (?, ?)")
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return StorageError::UserAlreadyExists(email.to_string());
                    }
                }
                StorageError::DatabaseError(e.to_string())
            })?;

        Ok(UserId(result.last_insert_rowid()))
    }
}

#[async_trait]
impl UserProvider for SqliteStorage {
    async fn user(&self, email: &str) -> Result<User, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, pass_hash, is_admin
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(User {
                id: UserId(r.id),
                email: r.email,
                password_hash: r.pass_hash,
                is_admin: r.is_admin,
            }),
            None => Err(StorageError::UserNotFound),
        }
    }

    async fn is_admin(&self, user_id: UserId) -> Result<bool, StorageError> {
        let is_admin = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT is_admin
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?;

        is_admin.ok_or(StorageError::UserNotFound)
    }
}

#[async_trait]
impl AppProvider for SqliteStorage {
    async fn app(&self, app_id: AppId) -> Result<App, StorageError> {
        let row = sqlx::query_as::<_, AppRow>(
            r#"
            SELECT id, name, secret
            FROM apps
            WHERE id = ?
            "#,
        )
        .bind(app_id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(App {
                id: AppId(r.id),
                name: r.name,
                secret: AppSecret::new(r.secret),
            }),
            None => Err(StorageError::AppNotFound(app_id)),
        }
    }
}
