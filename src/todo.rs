//! Todo persistence. Every query is scoped by owner id, so a todo can only be
//! read or changed through its owner's session.

use chrono::Utc;
use sqlx::{query, query_as, Pool, Sqlite};

use crate::{error::AppError, model::Todo};

const TODO_COLUMNS: &str = r#"id, title, "desc", date_created, owner_id"#;

pub async fn list_todos(db: &Pool<Sqlite>, owner_id: i64) -> Result<Vec<Todo>, AppError> {
    let todos = query_as::<_, Todo>(&format!(
        "SELECT {TODO_COLUMNS} FROM todos WHERE owner_id = ? ORDER BY id ASC"
    ))
    .bind(owner_id)
    .fetch_all(db)
    .await?;
    Ok(todos)
}

pub async fn create_todo(
    db: &Pool<Sqlite>,
    owner_id: i64,
    title: &str,
    desc: &str,
) -> Result<Todo, AppError> {
    let todo = query_as::<_, Todo>(&format!(
        r#"INSERT INTO todos (title, "desc", date_created, owner_id) VALUES (?, ?, ?, ?) RETURNING {TODO_COLUMNS}"#
    ))
    .bind(title)
    .bind(desc)
    .bind(Utc::now())
    .bind(owner_id)
    .fetch_one(db)
    .await?;
    Ok(todo)
}

pub async fn find_todo(db: &Pool<Sqlite>, id: i64, owner_id: i64) -> Result<Todo, AppError> {
    query_as::<_, Todo>(&format!(
        "SELECT {TODO_COLUMNS} FROM todos WHERE id = ? AND owner_id = ?"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(db)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn update_todo(
    db: &Pool<Sqlite>,
    id: i64,
    owner_id: i64,
    title: &str,
    desc: &str,
) -> Result<Todo, AppError> {
    query_as::<_, Todo>(&format!(
        r#"UPDATE todos SET title = ?, "desc" = ? WHERE id = ? AND owner_id = ? RETURNING {TODO_COLUMNS}"#
    ))
    .bind(title)
    .bind(desc)
    .bind(id)
    .bind(owner_id)
    .fetch_optional(db)
    .await?
    .ok_or(AppError::NotFound)
}

/// Returns whether a row was removed; a missing or foreign id is not an error.
pub async fn delete_todo(db: &Pool<Sqlite>, id: i64, owner_id: i64) -> Result<bool, AppError> {
    let rows_affected = query("DELETE FROM todos WHERE id = ? AND owner_id = ?")
        .bind(id)
        .bind(owner_id)
        .execute(db)
        .await?
        .rows_affected();
    Ok(rows_affected > 0)
}
