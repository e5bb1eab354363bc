//! MySQL implementation of the UserRepository trait.
//!
//! Every query except `stats` filters on `deleted_at IS NULL`, so
//! soft-deleted accounts behave as if they did not exist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use bl_core::domain::entities::token::Role;
use bl_core::domain::entities::user::{NewUser, ProfileUpdate, User, UserQuery, UserStats};
use bl_core::errors::{AuthError, DomainError};
use bl_core::repositories::UserRepository;

const USER_COLUMNS: &str =
    "id, username, password, nickname, avatar, role, created_at, updated_at";

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn db_error(context: &str, e: sqlx::Error) -> DomainError {
        tracing::error!(error = %e, "{}", context);
        DomainError::Database {
            message: format!("{}: {}", context, e),
        }
    }

    fn role_value(role: Role) -> i8 {
        u8::from(role) as i8
    }

    fn read_count(row: &sqlx::mysql::MySqlRow, name: &str) -> Result<u64, DomainError> {
        let count: i64 = row
            .try_get(name)
            .map_err(|e| Self::db_error("Failed to read count", e))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Convert database row to User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let column = |name: &str, e: sqlx::Error| DomainError::Database {
            message: format!("Failed to get {}: {}", name, e),
        };

        let role: i8 = row.try_get("role").map_err(|e| column("role", e))?;
        let role = u8::try_from(role)
            .ok()
            .and_then(|r| Role::try_from(r).ok())
            .ok_or_else(|| DomainError::Database {
                message: format!("Unknown role value: {}", role),
            })?;

        Ok(User {
            id: row.try_get::<u64, _>("id").map_err(|e| column("id", e))?,
            username: row.try_get("username").map_err(|e| column("username", e))?,
            password_hash: row.try_get("password").map_err(|e| column("password", e))?,
            nickname: row.try_get("nickname").map_err(|e| column("nickname", e))?,
            avatar: row.try_get("avatar").map_err(|e| column("avatar", e))?,
            role,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column("created_at", e))?,
            updated_at: row
                .try_get::<Option<DateTime<Utc>>, _>("updated_at")
                .map_err(|e| column("updated_at", e))?,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: u64) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users WHERE id = ? AND deleted_at IS NULL LIMIT 1",
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::db_error("Failed to find user by id", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users WHERE username = ? AND deleted_at IS NULL LIMIT 1",
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::db_error("Failed to find user by username", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM users WHERE username = ? AND deleted_at IS NULL",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::db_error("Failed to check username", e))?;

        let count: i64 = row
            .try_get("count")
            .map_err(|e| Self::db_error("Failed to read username count", e))?;
        Ok(count > 0)
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let result = sqlx::query(
            "INSERT INTO users (username, password, nickname, role) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.nickname)
        .bind(Self::role_value(user.role))
        .execute(&self.pool)
        .await;

        let result = match result {
            Ok(result) => result,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(AuthError::UserAlreadyExists.into());
            }
            Err(e) => return Err(Self::db_error("Failed to create user", e)),
        };

        let id = result.last_insert_id();
        self.find_by_id(id).await?.ok_or_else(|| DomainError::Database {
            message: format!("User {} vanished after insert", id),
        })
    }

    async fn update_password(&self, id: u64, password_hash: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE users SET password = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::db_error("Failed to update password", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_profile(&self, id: u64, update: &ProfileUpdate) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE users SET nickname = COALESCE(?, nickname), avatar = COALESCE(?, avatar), \
             updated_at = CURRENT_TIMESTAMP WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(update.nickname.as_deref())
        .bind(update.avatar.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::db_error("Failed to update profile", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, query: &UserQuery) -> Result<Vec<User>, DomainError> {
        let rows = match query.role {
            Some(role) => {
                let sql = format!(
                    "SELECT {} FROM users WHERE deleted_at IS NULL AND role = ? \
                     ORDER BY id LIMIT ? OFFSET ?",
                    USER_COLUMNS
                );
                sqlx::query(&sql)
                    .bind(Self::role_value(role))
                    .bind(query.page_size)
                    .bind(query.offset())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM users WHERE deleted_at IS NULL ORDER BY id LIMIT ? OFFSET ?",
                    USER_COLUMNS
                );
                sqlx::query(&sql)
                    .bind(query.page_size)
                    .bind(query.offset())
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| Self::db_error("Failed to list users", e))?;

        rows.iter().map(Self::row_to_user).collect()
    }

    async fn count(&self, role: Option<Role>) -> Result<u64, DomainError> {
        let row = match role {
            Some(role) => {
                sqlx::query(
                    "SELECT COUNT(*) AS count FROM users WHERE deleted_at IS NULL AND role = ?",
                )
                .bind(Self::role_value(role))
                .fetch_one(&self.pool)
                .await
            }
            None => {
                sqlx::query("SELECT COUNT(*) AS count FROM users WHERE deleted_at IS NULL")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| Self::db_error("Failed to count users", e))?;

        Self::read_count(&row, "count")
    }

    async fn stats(&self) -> Result<UserStats, DomainError> {
        let today = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc())
            .ok_or_else(|| DomainError::Internal {
                message: "Failed to compute start of day".to_string(),
            })?;

        let row = sqlx::query(
            "SELECT \
                 CAST(COALESCE(SUM(deleted_at IS NULL), 0) AS SIGNED) AS total_users, \
                 CAST(COALESCE(SUM(deleted_at IS NULL AND role = ?), 0) AS SIGNED) AS admin_count, \
                 CAST(COALESCE(SUM(deleted_at IS NULL AND created_at >= ?), 0) AS SIGNED) AS today_new_users, \
                 CAST(COALESCE(SUM(deleted_at IS NOT NULL), 0) AS SIGNED) AS deleted_users \
             FROM users",
        )
        .bind(Self::role_value(Role::Admin))
        .bind(today)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::db_error("Failed to read user statistics", e))?;

        Ok(UserStats {
            total_users: Self::read_count(&row, "total_users")?,
            admin_count: Self::read_count(&row, "admin_count")?,
            today_new_users: Self::read_count(&row, "today_new_users")?,
            deleted_users: Self::read_count(&row, "deleted_users")?,
        })
    }

    async fn update_role(&self, id: u64, role: Role) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE users SET role = ? WHERE id = ? AND role <> ? AND deleted_at IS NULL",
        )
        .bind(Self::role_value(role))
        .bind(id)
        .bind(Self::role_value(role))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::db_error("Failed to update role", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, id: u64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = CURRENT_TIMESTAMP WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::db_error("Failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }
}
