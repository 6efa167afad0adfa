use chrono::Utc;
use sqlx::{query_as, Pool, Sqlite};

use crate::{error::AppError, model::User};

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    Ok(bcrypt::hash(password, cost)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    Ok(bcrypt::verify(password, hash)?)
}

pub async fn find_user_by_username(
    db: &Pool<Sqlite>,
    username: &str,
) -> Result<Option<User>, AppError> {
    let user = query_as::<_, User>(
        "SELECT id, username, password, date_created FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Creates a new account with a bcrypt-hashed password.
///
/// Fails with [`AppError::DuplicateUsername`] when the name is taken, either
/// by the lookup or by the UNIQUE constraint when two registrations race.
pub async fn register_user(
    db: &Pool<Sqlite>,
    username: &str,
    password: &str,
    cost: u32,
) -> Result<User, AppError> {
    if find_user_by_username(db, username).await?.is_some() {
        return Err(AppError::DuplicateUsername);
    }

    let hash = hash_password(password, cost)?;
    insert_user(db, username, &hash).await
}

/// Inserts an account row for an already-hashed password. A UNIQUE violation on
/// the username maps to [`AppError::DuplicateUsername`].
pub async fn insert_user(
    db: &Pool<Sqlite>,
    username: &str,
    password_hash: &str,
) -> Result<User, AppError> {
    query_as::<_, User>(
        "INSERT INTO users (username, password, date_created) VALUES (?, ?, ?) \
         RETURNING id, username, password, date_created",
    )
    .bind(username)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(db)
    .await
    .map_err(|e| {
        if AppError::is_unique_violation(&e) {
            AppError::DuplicateUsername
        } else {
            AppError::Database(e)
        }
    })
}

/// Checks a username/password pair. Unknown users and wrong passwords are
/// reported the same way.
pub async fn authenticate(
    db: &Pool<Sqlite>,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = find_user_by_username(db, username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if verify_password(password, &user.password)? {
        Ok(user)
    } else {
        Err(AppError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifies() {
        let first = hash_password("hunter2", 4).unwrap();
        let second = hash_password("hunter2", 4).unwrap();
        assert_ne!(first, second);
        assert_ne!(first, "hunter2");
        assert!(verify_password("hunter2", &first).unwrap());
        assert!(!verify_password("hunter3", &first).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(matches!(
            verify_password("x", "not-a-bcrypt-hash"),
            Err(AppError::PasswordHash(_))
        ));
    }
}
