use std::sync::Arc;

use axum::{
    extract::{Path, State},
    headers::Cookie,
    response::Response,
    Extension, Form, TypedHeader,
};

use crate::{
    auth,
    error::AppError,
    flash::{Category, Flashes},
    model::{CurrentUser, SessionToken},
    schema::{CredentialsSchema, TodoSchema},
    session, todo, AppState,
};

// Handler for listing the current user's todos
pub async fn home(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    flashes: Flashes,
) -> Result<Response, AppError> {
    let todos = todo::list_todos(&data.db, user.id).await?;
    flashes.page(|templates, messages| templates.index(&user, &todos, messages))
}

// Handler for creating a todo, then listing
pub async fn create_todo(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    mut flashes: Flashes,
    Form(body): Form<TodoSchema>,
) -> Result<Response, AppError> {
    let created = todo::create_todo(&data.db, user.id, &body.title, &body.desc).await?;
    tracing::info!(user_id = user.id, todo_id = created.id, "todo created");
    flashes.push(Category::Success, "Todo added successfully!");

    let todos = todo::list_todos(&data.db, user.id).await?;
    flashes.page(|templates, messages| templates.index(&user, &todos, messages))
}

pub async fn register_page(flashes: Flashes) -> Result<Response, AppError> {
    flashes.page(|templates, messages| templates.register(messages))
}

pub async fn register(
    State(data): State<Arc<AppState>>,
    mut flashes: Flashes,
    Form(body): Form<CredentialsSchema>,
) -> Result<Response, AppError> {
    match auth::register_user(&data.db, &body.username, &body.password, data.bcrypt_cost).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, username = %user.username, "user registered");
            flashes.push(Category::Success, "Registration successful! Please log in.");
            flashes.redirect("/login")
        }
        Err(AppError::DuplicateUsername) => {
            tracing::warn!(username = %body.username, "registration with an existing username");
            flashes.push(Category::Danger, "Username already exists!");
            flashes.redirect("/register")
        }
        Err(err) => Err(err),
    }
}

pub async fn login_page(flashes: Flashes) -> Result<Response, AppError> {
    flashes.page(|templates, messages| templates.login(messages))
}

pub async fn login(
    State(data): State<Arc<AppState>>,
    cookies: Option<TypedHeader<Cookie>>,
    mut flashes: Flashes,
    Form(body): Form<CredentialsSchema>,
) -> Result<Response, AppError> {
    match auth::authenticate(&data.db, &body.username, &body.password).await {
        Ok(user) => {
            // A fresh login replaces whatever session the browser already held
            if let Some(previous) = cookies
                .as_ref()
                .and_then(|TypedHeader(cookies)| session::token_from_cookies(cookies))
            {
                session::destroy_session(&data.db, previous).await?;
            }
            let token = session::create_session(&data.db, user.id).await?;
            tracing::info!(user_id = user.id, "login successful");
            flashes.push(Category::Success, "Login successful!");
            flashes.redirect_with("/", vec![session::session_cookie(&token)])
        }
        Err(AppError::InvalidCredentials) => {
            tracing::warn!(username = %body.username, "login failed");
            flashes.push(Category::Danger, "Invalid credentials!");
            flashes.page(|templates, messages| templates.login(messages))
        }
        Err(err) => Err(err),
    }
}

pub async fn logout(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    mut flashes: Flashes,
) -> Result<Response, AppError> {
    session::destroy_session(&data.db, &token).await?;
    tracing::info!(user_id = user.id, "logged out");
    flashes.push(Category::Info, "You have been logged out.");
    flashes.redirect_with("/login", vec![session::clear_session_cookie()])
}

// Deletes an owned todo; unknown or foreign ids fall through to the redirect
pub async fn delete_todo(
    Path(id): Path<i64>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    mut flashes: Flashes,
) -> Result<Response, AppError> {
    if todo::delete_todo(&data.db, id, user.id).await? {
        tracing::info!(user_id = user.id, todo_id = id, "todo deleted");
        flashes.push(Category::Info, "Todo deleted successfully!");
    }
    flashes.redirect("/")
}

pub async fn edit_todo(
    Path(id): Path<i64>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    flashes: Flashes,
) -> Result<Response, AppError> {
    match todo::find_todo(&data.db, id, user.id).await {
        Ok(todo) => flashes.page(|templates, messages| templates.update(&user, &todo, messages)),
        Err(AppError::NotFound) => not_found(flashes),
        Err(err) => Err(err),
    }
}

pub async fn update_todo(
    Path(id): Path<i64>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    mut flashes: Flashes,
    Form(body): Form<TodoSchema>,
) -> Result<Response, AppError> {
    match todo::update_todo(&data.db, id, user.id, &body.title, &body.desc).await {
        Ok(_) => {
            tracing::info!(user_id = user.id, todo_id = id, "todo updated");
            flashes.push(Category::Success, "Todo updated successfully!");
            flashes.redirect("/")
        }
        Err(AppError::NotFound) => not_found(flashes),
        Err(err) => Err(err),
    }
}

fn not_found(mut flashes: Flashes) -> Result<Response, AppError> {
    flashes.push(Category::Danger, "Todo not found.");
    flashes.redirect("/")
}
