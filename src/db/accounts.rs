use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::models::Account;

/// SHA-256 hex digest of a password
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// User-record store: hashed credentials plus an admin flag
///
/// Auth collaborator only. No sessions or tokens live here; callers get an
/// account back from `verify` and own whatever they do with it.
#[derive(Clone)]
pub struct AccountStore {
    pool: PgPool,
}

impl AccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a non-admin account with a hashed password
    pub async fn create(&self, username: &str, password: &str) -> AppResult<Account> {
        let result = sqlx::query_as::<_, Account>(
            "INSERT INTO users (username, password_hash, is_admin) \
             VALUES ($1, $2, FALSE) \
             RETURNING id, username, password_hash, is_admin",
        )
        .bind(username)
        .bind(hash_password(password))
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(account) => Ok(account),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                AppError::InvalidInput("Username already exists".to_string()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// Checks a username/password pair against the stored hash
    ///
    /// Unknown users and wrong passwords are indistinguishable to the
    /// caller.
    pub async fn verify(&self, username: &str, password: &str) -> AppResult<Account> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, username, password_hash, is_admin FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        match account {
            Some(account) if account.password_hash == hash_password(password) => Ok(account),
            _ => Err(AppError::Unauthorized(
                "Invalid username or password".to_string(),
            )),
        }
    }

    /// Updates a username and/or password for an existing account
    pub async fn update_account(
        &self,
        username: &str,
        new_username: Option<&str>,
        new_password: Option<&str>,
    ) -> AppResult<()> {
        let mut current = username;

        if let Some(new_username) = new_username {
            sqlx::query("UPDATE users SET username = $1 WHERE username = $2")
                .bind(new_username)
                .bind(current)
                .execute(&self.pool)
                .await?;
            current = new_username;
        }

        if let Some(new_password) = new_password {
            sqlx::query("UPDATE users SET password_hash = $1 WHERE username = $2")
                .bind(hash_password(new_password))
                .bind(current)
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_known_digest() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn test_hash_password_deterministic() {
        assert_eq!(hash_password("hunter2"), hash_password("hunter2"));
        assert_ne!(hash_password("hunter2"), hash_password("hunter3"));
    }
}
