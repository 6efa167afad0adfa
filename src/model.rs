use chrono::{DateTime, Utc};

// Registered account; `password` holds the bcrypt hash
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub date_created: DateTime<Utc>,
}

// Data model representing a Todo item
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub desc: String,
    pub date_created: DateTime<Utc>,
    pub owner_id: i64,
}

/// The authenticated user for the current request, resolved from the session
/// cookie by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// Opaque token of the session backing the current request.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);
