use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::user::{NewUser, UpdateUser, User};
use crate::error::{Result, StoreError};

/// Data access for identity records. Holds its own pool handle; constructed
/// per handler call from the shared pool.
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user under a freshly generated id. A collision on
    /// `corporate_id` or `github_username` surfaces as `DuplicateKey`.
    pub async fn create(&self, new: NewUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, corporate_id, github_username, email, full_name, department, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.corporate_id)
        .bind(&new.github_username)
        .bind(&new.email)
        .bind(&new.full_name)
        .bind(&new.department)
        .bind(&new.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("user", id))
    }

    pub async fn get_by_corporate_id(&self, corporate_id: &str) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE corporate_id = $1")
            .bind(corporate_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("user", corporate_id))
    }

    pub async fn get_by_github_username(&self, username: &str) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE github_username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("user", username))
    }

    /// Full replace of the mutable profile fields. NotFound is detected by
    /// zero rows matched rather than a prior existence check.
    pub async fn update(&self, id: Uuid, update: UpdateUser) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET github_username = $2, email = $3, full_name = $4, department = $5,
                role = $6, is_active = $7, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.github_username)
        .bind(&update.email)
        .bind(&update.full_name)
        .bind(&update.department)
        .bind(&update.role)
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found("user", id))
    }

    /// Idempotent: succeeds whether or not a row was removed, so the caller
    /// cannot distinguish "already gone" from "just removed".
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
