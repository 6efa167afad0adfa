//! Shared helpers: an in-memory database and a small cookie-keeping client
//! that drives the router with `oneshot`.
#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use tower::ServiceExt; // for `app.oneshot()`

use todo_app::{create_router, db, AppState};

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_COST: u32 = 4;

pub async fn memory_pool() -> Pool<Sqlite> {
    // A single connection that never expires keeps the in-memory database alive
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::init_schema(&pool).await.unwrap();
    pool
}

pub async fn test_state() -> Arc<AppState> {
    Arc::new(AppState::new(memory_pool().await, TEST_SECRET, TEST_COST).unwrap())
}

/// Response snapshot with the body already collected.
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookies: Vec<String>,
    pub body: String,
}

/// A browser stand-in: remembers cookies between requests.
pub struct TestClient {
    app: Router,
    cookies: HashMap<String, String>,
}

impl TestClient {
    pub fn new(state: Arc<AppState>) -> Self {
        TestClient {
            app: create_router(state),
            cookies: HashMap::new(),
        }
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.builder("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Posts an already url-encoded form body.
    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        let request = self
            .builder("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Follows a redirect the way a browser would after a form post.
    pub async fn follow(&mut self, response: &TestResponse) -> TestResponse {
        let location = response
            .location
            .clone()
            .expect("response is not a redirect");
        self.get(&location).await
    }

    pub async fn register(&mut self, username: &str, password: &str) -> TestResponse {
        self.post_form(
            "/register",
            &format!("username={username}&password={password}"),
        )
        .await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> TestResponse {
        self.post_form("/login", &format!("username={username}&password={password}"))
            .await
    }

    pub async fn signed_up(state: Arc<AppState>, username: &str, password: &str) -> Self {
        let mut client = TestClient::new(state);
        client.register(username, password).await;
        let response = client.login(username, password).await;
        assert_eq!(response.location.as_deref(), Some("/"));
        client
    }

    fn builder(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if !self.cookies.is_empty() {
            let header_value = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, header_value);
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response: Response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        let set_cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap().to_string())
            .collect();

        for cookie in &set_cookies {
            let pair = cookie.split(';').next().unwrap_or_default();
            let (name, value) = pair.split_once('=').unwrap();
            if value.is_empty() || cookie.contains("Max-Age=0") {
                self.cookies.remove(name);
            } else {
                self.cookies.insert(name.to_string(), value.to_string());
            }
        }

        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        TestResponse {
            status,
            location,
            set_cookies,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}
