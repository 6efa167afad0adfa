use std::sync::Arc;

use axum::{
    extract::State,
    headers::{Cookie, HeaderMapExt},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError,
    flash::{Category, Flashes},
    model::SessionToken,
    session, AppState,
};

/// Route guard: resolves the session cookie to a user and hands it to the
/// handler through request extensions. Requests without a live session are
/// sent to the login page.
pub async fn mw_require_auth<B>(
    State(data): State<Arc<AppState>>,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .typed_get::<Cookie>()
        .and_then(|cookies| session::token_from_cookies(&cookies).map(str::to_owned));

    let resolved = match token {
        Some(token) => match session::resolve_session(&data.db, &token).await {
            Ok(user) => Some((user, token)),
            Err(AppError::Unauthenticated) => None,
            Err(err) => return Err(err),
        },
        None => None,
    };

    let Some((user, token)) = resolved else {
        tracing::debug!(path = %request.uri().path(), "no active session, redirecting to login");
        let mut flashes = Flashes::from_headers(data.clone(), request.headers());
        flashes.push(Category::Message, "Please log in to access this page.");
        return flashes.redirect("/login");
    };

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(SessionToken(token));

    Ok(next.run(request).await)
}
