use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{handler::*, middleware::mw_require_auth, AppState};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let app = Router::new()
        .route("/", get(home).post(create_todo))
        .route("/logout", get(logout))
        .route("/delete/:id", get(delete_todo))
        .route("/update/:id", get(edit_todo).post(update_todo))
        .route_layer(from_fn_with_state(app_state.clone(), mw_require_auth))
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);
    app
}
