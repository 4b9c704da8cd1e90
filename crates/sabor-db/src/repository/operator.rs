//! # Operator Repository
//!
//! Operators and their password hashes. Hashing and verification belong to
//! the auth service; this module only stores and fetches PHC strings.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use sabor_core::Operator;

/// Operator row including the stored password hash.
#[derive(Debug, Clone, FromRow)]
pub struct OperatorCredentials {
    pub id: i64,
    pub name: String,
    pub login: String,
    pub password_hash: String,
}

impl OperatorCredentials {
    pub fn operator(&self) -> Operator {
        Operator {
            id: self.id,
            name: self.name.clone(),
            login: self.login.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OperatorRepository {
    pool: SqlitePool,
}

impl OperatorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OperatorRepository { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Operator>> {
        let operator =
            sqlx::query_as::<_, Operator>("SELECT id, name, login FROM operators WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(operator)
    }

    /// Fetches an operator with its hash for password verification.
    pub async fn get_credentials(&self, login: &str) -> DbResult<Option<OperatorCredentials>> {
        let credentials = sqlx::query_as::<_, OperatorCredentials>(
            "SELECT id, name, login, password_hash FROM operators WHERE login = ?1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credentials)
    }

    /// Inserts an operator.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - login already taken
    pub async fn insert(&self, name: &str, login: &str, password_hash: &str) -> DbResult<Operator> {
        debug!(login = %login, "Inserting operator");

        let operator = sqlx::query_as::<_, Operator>(
            r#"
            INSERT INTO operators (name, login, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, name, login
            "#,
        )
        .bind(name)
        .bind(login)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(login))?;

        Ok(operator)
    }

    /// Replaces the display name and password hash of an existing login.
    pub async fn update_credentials(
        &self,
        login: &str,
        name: &str,
        password_hash: &str,
    ) -> DbResult<Operator> {
        let operator = sqlx::query_as::<_, Operator>(
            r#"
            UPDATE operators SET name = ?2, password_hash = ?3
            WHERE login = ?1
            RETURNING id, name, login
            "#,
        )
        .bind(login)
        .bind(name)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        operator.ok_or_else(|| DbError::not_found("Operator", login))
    }
}
