pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod route;
pub mod schema;
pub mod session;
pub mod todo;
pub mod view;

use ring::hmac;
use sqlx::{Pool, Sqlite};

use crate::{error::AppError, view::Templates};

pub use route::create_router;

// Struct representing the application state
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub templates: Templates,
    pub flash_key: hmac::Key,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(db: Pool<Sqlite>, secret_key: &str, bcrypt_cost: u32) -> Result<Self, AppError> {
        Ok(AppState {
            db,
            templates: Templates::new()?,
            flash_key: flash::signing_key(secret_key),
            bcrypt_cost,
        })
    }
}
