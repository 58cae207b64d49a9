// Shared harness for the HTTP tests: the real router over an in-memory
// database, in-memory sessions and a capturing mailer.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use session_auth_server::{
    auth::password::hash_password,
    config::Config,
    db::{self, models::User, users},
    mail::MemoryMailer,
    router,
    state::AppState,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;
use tower_sessions::{
    cookie::Cookie, session::Id, MemoryStore, SessionManagerLayer, SessionStore,
};

pub const CSRF_TOKEN: &str = "test-csrf-token";
pub const SESSION_COOKIE: &str = "id";

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub mailer: Arc<MemoryMailer>,
    pub sessions: MemoryStore,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let pool = db::connect_in_memory().await.expect("in-memory database");
        let mailer = Arc::new(MemoryMailer::new());
        let state = AppState::with_parts(pool.clone(), mailer.clone(), config).expect("state");

        let sessions = MemoryStore::default();
        let router = router(state).layer(SessionManagerLayer::new(sessions.clone()));

        Self {
            router,
            pool,
            mailer,
            sessions,
        }
    }

    /// Insert an active user directly into the store
    pub async fn create_user(&self, username: &str, email: &str, password: &str) -> User {
        let hash = hash_password(password).expect("hash");
        users::create_user(&self.pool, username, email, &hash)
            .await
            .expect("create user")
    }

    /// Read one key of a stored session; `None` if the session or key is gone
    pub async fn session_value(&self, session: &str, key: &str) -> Option<Value> {
        let id: Id = session.parse().expect("session id");
        let record = self.sessions.load(&id).await.expect("session store")?;
        record.data.get(key).cloned()
    }

    pub fn client(&self) -> Client {
        Client {
            router: self.router.clone(),
            session: None,
            csrf: true,
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).expect("JSON body")
    }
}

/// A browser-like client that carries its session cookie between requests
pub struct Client {
    router: Router,
    pub session: Option<String>,
    /// Send the CSRF cookie and header with unsafe requests
    pub csrf: bool,
}

impl Client {
    pub fn without_csrf(mut self) -> Self {
        self.csrf = false;
        self
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self
            .builder(Method::GET, uri)
            .body(Body::empty())
            .expect("request");
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, body: &str) -> TestResponse {
        let request = self
            .builder(Method::POST, uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("request");
        self.send(request).await
    }

    pub async fn post_raw(&mut self, uri: &str, content_type: &str, body: &str) -> TestResponse {
        let request = self
            .builder(Method::POST, uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .expect("request");
        self.send(request).await
    }

    fn builder(&self, method: Method, uri: &str) -> axum::http::request::Builder {
        let mut cookies = Vec::new();
        if let Some(session) = &self.session {
            cookies.push(format!("{SESSION_COOKIE}={session}"));
        }

        let mut builder = Request::builder().method(method.clone()).uri(uri);
        if self.csrf && method != Method::GET {
            cookies.push(format!("csrftoken={CSRF_TOKEN}"));
            builder = builder.header("x-csrftoken", CSRF_TOKEN);
        }
        if !cookies.is_empty() {
            builder = builder.header(header::COOKIE, cookies.join("; "));
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible router");

        for value in response.headers().get_all(header::SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let Ok(cookie) = Cookie::parse(raw.to_string()) else { continue };
            if cookie.name() != SESSION_COOKIE {
                continue;
            }
            let removed = cookie.value().is_empty()
                || cookie.max_age().is_some_and(|age| age.is_zero() || age.is_negative());
            self.session = if removed {
                None
            } else {
                Some(cookie.value().to_string())
            };
        }

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");

        TestResponse {
            status,
            text: String::from_utf8(bytes.to_vec()).expect("utf-8 body"),
        }
    }
}
