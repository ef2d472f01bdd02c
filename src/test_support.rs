//! Helpers shared by the router-level tests.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    app::build_app,
    state::AppState,
    users::{
        repo::{StoreError, UserStore},
        repo_types::{NewUser, User},
    },
};

/// Sends one request through a freshly built router and decodes the JSON body.
pub async fn send(
    state: &AppState,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let res = build_app(state.clone()).oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Store whose every call fails at the connection level.
pub struct BrokenStore;

#[async_trait]
impl UserStore for BrokenStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
    async fn find_by_id(&self, _id: i64) -> Result<Option<User>, StoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
    async fn create(&self, _new_user: &NewUser) -> Result<User, StoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
    async fn update(&self, _id: i64, _changes: &NewUser) -> Result<Option<User>, StoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
    async fn delete(&self, _id: i64) -> Result<bool, StoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
}
