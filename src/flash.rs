//! One-shot status messages that survive a single redirect.
//!
//! Messages queued before a redirect are stored in the `flash` cookie as
//! `base64(json) "." base64(hmac)`, signed with the application secret so a
//! client cannot forge them. The next rendered page shows them and clears the
//! cookie.

use std::{convert::Infallible, sync::Arc};

use axum::{
    async_trait,
    extract::FromRequestParts,
    headers::{Cookie, HeaderMapExt},
    http::{header::SET_COOKIE, request::Parts, HeaderMap},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use base64::{engine::general_purpose, Engine};
use handlebars::RenderError;
use ring::hmac;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, view::Templates, AppState};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Success,
    Danger,
    Info,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: Category,
    pub message: String,
}

impl Flash {
    pub fn new(category: Category, message: impl Into<String>) -> Self {
        Flash {
            category,
            message: message.into(),
        }
    }
}

pub fn signing_key(secret: &str) -> hmac::Key {
    hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes())
}

pub fn encode(key: &hmac::Key, flashes: &[Flash]) -> Result<String, serde_json::Error> {
    let payload = general_purpose::URL_SAFE_NO_PAD.encode(serde_json::to_vec(flashes)?);
    let signature = hmac::sign(key, payload.as_bytes());
    let signature = general_purpose::URL_SAFE_NO_PAD.encode(signature.as_ref());
    Ok(format!("{payload}.{signature}"))
}

/// Returns `None` for anything not produced by [`encode`] under `key`.
pub fn decode(key: &hmac::Key, value: &str) -> Option<Vec<Flash>> {
    let (payload, signature) = value.split_once('.')?;
    let signature = general_purpose::URL_SAFE_NO_PAD.decode(signature).ok()?;
    hmac::verify(key, payload.as_bytes(), &signature).ok()?;
    let json = general_purpose::URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&json).ok()
}

/// Pending messages for the current request: those carried in by the cookie
/// plus any queued by the handler.
pub struct Flashes {
    state: Arc<AppState>,
    messages: Vec<Flash>,
    carried: bool,
}

impl Flashes {
    pub fn from_headers(state: Arc<AppState>, headers: &HeaderMap) -> Self {
        let value = headers
            .typed_get::<Cookie>()
            .and_then(|cookies| cookies.get(FLASH_COOKIE).map(str::to_owned));
        let carried = value.is_some();
        let messages = value
            .map(|value| {
                decode(&state.flash_key, &value).unwrap_or_else(|| {
                    tracing::debug!("ignoring flash cookie with a bad signature");
                    Vec::new()
                })
            })
            .unwrap_or_default();

        Flashes {
            state,
            messages,
            carried,
        }
    }

    pub fn push(&mut self, category: Category, message: impl Into<String>) {
        self.messages.push(Flash::new(category, message));
    }

    /// Redirects to `to`, carrying every pending message forward.
    pub fn redirect(self, to: &str) -> Result<Response, AppError> {
        self.redirect_with(to, Vec::new())
    }

    /// Like [`Flashes::redirect`], with extra `Set-Cookie` values appended.
    pub fn redirect_with(self, to: &str, mut cookies: Vec<String>) -> Result<Response, AppError> {
        if !self.messages.is_empty() {
            let value = encode(&self.state.flash_key, &self.messages)?;
            cookies.push(format!(
                "{FLASH_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax"
            ));
        }
        let headers: Vec<_> = cookies.into_iter().map(|c| (SET_COOKIE, c)).collect();
        Ok((AppendHeaders(headers), Redirect::to(to)).into_response())
    }

    /// Renders a page that consumes every pending message.
    pub fn page<F>(self, render: F) -> Result<Response, AppError>
    where
        F: FnOnce(&Templates, &[Flash]) -> Result<String, RenderError>,
    {
        let html = Html(render(&self.state.templates, &self.messages)?);
        if self.carried {
            let clear = format!("{FLASH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
            Ok((AppendHeaders([(SET_COOKIE, clear)]), html).into_response())
        } else {
            Ok(html.into_response())
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Flashes {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Flashes::from_headers(state.clone(), &parts.headers))
    }
}
