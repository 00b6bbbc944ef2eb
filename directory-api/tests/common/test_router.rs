//! Test Router
use crate::common::{test_database::TestDirectory, MIME_JSON};
use axum::{body::Body, Router};
use directory_api::{
    arguments::AppConfig,
    build_app,
    types::jwt::{sign_token, Claims},
};
use directory_database::database::DirectoryStore;
use http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Method, Request, Uri,
};
use jsonwebtoken::EncodingKey;
use serde_json::{json, Map};
use std::{
    future::Future,
    sync::{Arc, Once},
};
use tower::ServiceExt;
use tracing_subscriber::EnvFilter;

/// Test secret
pub(crate) static SECRET: &[u8] = b"TEST_SECRET";

/// Global log initialization.
static INIT: Once = Once::new();

// Setup tracing first.
fn init_log() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(true)
            .init();
    });
}

/// A bearer header value for a freshly issued token.
pub fn add_jwt() -> String {
    let mut user = Map::new();
    user.insert("email".to_owned(), json!("admin@test.com"));

    let token = sign_token(&Claims::issue(user), &EncodingKey::from_secret(SECRET)).unwrap();
    format!("Bearer {token}")
}

pub struct TestApp {
    router: Router,
    request: Request<Body>,
}

impl TestApp {
    /// Run the test request.
    async fn run(self) -> http::Response<Body> {
        self.router.oneshot(self.request).await.unwrap()
    }
}

/// Build a test router.
pub(crate) struct TestRouterBuilder {
    database: Option<Arc<TestDirectory>>,
}

impl TestRouterBuilder {
    /// New test router builder.
    #[must_use]
    pub fn new() -> Self {
        Self { database: None }
    }

    /// Add an existing database.
    #[allow(dead_code)]
    #[must_use]
    pub fn with_database(mut self, database: impl Into<Option<Arc<TestDirectory>>>) -> Self {
        self.database = database.into();
        self
    }

    /// Run a public get request.
    #[allow(dead_code)]
    pub fn get<U>(self, uri: U) -> impl Future<Output = http::Response<Body>>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        TestApp {
            router: app(self.database),
            request: Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        }
        .run()
    }

    /// Run a post request with a valid bearer token.
    #[allow(dead_code)]
    pub fn post<U>(self, uri: U, body: impl Into<Body>) -> impl Future<Output = http::Response<Body>>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        self.send(Method::POST, uri, Some(add_jwt()), body)
    }

    /// Run a post request without any credential.
    #[allow(dead_code)]
    pub fn post_anonymous<U>(
        self,
        uri: U,
        body: impl Into<Body>,
    ) -> impl Future<Output = http::Response<Body>>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        self.send(Method::POST, uri, None, body)
    }

    /// Run a post request with the given authorization header value.
    #[allow(dead_code)]
    pub fn post_bearing<U>(
        self,
        uri: U,
        bearer: String,
        body: impl Into<Body>,
    ) -> impl Future<Output = http::Response<Body>>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        self.send(Method::POST, uri, Some(bearer), body)
    }

    /// Run a put request with a valid bearer token.
    #[allow(dead_code)]
    pub fn put<U>(self, uri: U, body: impl Into<Body>) -> impl Future<Output = http::Response<Body>>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        self.send(Method::PUT, uri, Some(add_jwt()), body)
    }

    /// Run a patch request with a valid bearer token.
    #[allow(dead_code)]
    pub fn patch<U>(
        self,
        uri: U,
        body: impl Into<Body>,
    ) -> impl Future<Output = http::Response<Body>>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        self.send(Method::PATCH, uri, Some(add_jwt()), body)
    }

    /// Run a delete request with a valid bearer token.
    #[allow(dead_code)]
    pub fn delete<U>(self, uri: U) -> impl Future<Output = http::Response<Body>>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        self.send(Method::DELETE, uri, Some(add_jwt()), Body::empty())
    }

    fn send<U>(
        self,
        method: Method,
        uri: U,
        bearer: Option<String>,
        body: impl Into<Body>,
    ) -> impl Future<Output = http::Response<Body>>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        let mut request = Request::builder()
            .uri(uri)
            .method(method)
            .header(CONTENT_TYPE, MIME_JSON);
        if let Some(bearer) = bearer {
            request = request.header(AUTHORIZATION, bearer);
        }

        TestApp {
            router: app(self.database),
            request: request.body(body.into()).unwrap(),
        }
        .run()
    }
}

/// Build test Router.
fn app(database: Option<Arc<TestDirectory>>) -> Router {
    init_log();
    let database: Arc<dyn DirectoryStore> = match database {
        Some(db) => db,
        None => Arc::new(TestDirectory::new()),
    };
    build_app(
        database,
        AppConfig::new(SECRET, &["http://localhost:5173".to_owned()]),
    )
}
