use axum::headers::Cookie;
use base64::{engine::general_purpose, Engine};
use chrono::Utc;
use ring::rand::{SecureRandom, SystemRandom};
use sqlx::{query, query_as, Pool, Sqlite};

use crate::{error::AppError, model::CurrentUser};

pub const SESSION_COOKIE: &str = "session";

const TOKEN_BYTES: usize = 32;

fn generate_token() -> Result<String, AppError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::TokenGeneration)?;
    Ok(general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// Starts a session for `user_id` and returns its token.
pub async fn create_session(db: &Pool<Sqlite>, user_id: i64) -> Result<String, AppError> {
    let token = generate_token()?;
    query("INSERT INTO sessions (token, user_id, date_created) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(user_id)
        .bind(Utc::now())
        .execute(db)
        .await?;
    Ok(token)
}

pub async fn resolve_session(db: &Pool<Sqlite>, token: &str) -> Result<CurrentUser, AppError> {
    query_as::<_, CurrentUser>(
        "SELECT users.id, users.username FROM sessions \
         JOIN users ON users.id = sessions.user_id WHERE sessions.token = ?",
    )
    .bind(token)
    .fetch_optional(db)
    .await?
    .ok_or(AppError::Unauthenticated)
}

pub async fn destroy_session(db: &Pool<Sqlite>, token: &str) -> Result<(), AppError> {
    query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(db)
        .await?;
    Ok(())
}

pub fn token_from_cookies(cookies: &Cookie) -> Option<&str> {
    cookies.get(SESSION_COOKIE).filter(|token| !token.is_empty())
}

pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
