//! Shared helpers for router tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use tower::ServiceExt;

use common::{AppError, AppResult};
use domain::{HashCost, PasswordHasher, User, UserPatch, UserRules};
use user_service_lib::api::middleware::RateLimiter;
use user_service_lib::api::{create_router, AppState};
use user_service_lib::repository::UserRepository;
use user_service_lib::service::UserManager;

/// Vec-backed repository with the same contract as the MongoDB store.
#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

impl InMemoryUsers {
    fn parse(id: &str) -> AppResult<()> {
        ObjectId::parse_str(id)
            .map(|_| ())
            .map_err(|_| AppError::InvalidIdentifier(id.to_string()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_all(&self) -> AppResult<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<User> {
        Self::parse(id)?;
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn create(&self, mut user: User) -> AppResult<User> {
        user.id = ObjectId::new().to_hex();
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: &str, patch: UserPatch) -> AppResult<User> {
        Self::parse(id)?;
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::NotFound)?;
        merge(user, patch);
        Ok(user.clone())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        Self::parse(id)?;
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Overwrite the fields the patch sets, same as the store's `$set`.
fn merge(user: &mut User, patch: UserPatch) {
    let present = |v: Option<String>| v.filter(|v| !v.is_empty());

    if let Some(name) = present(patch.name) {
        user.name = name;
    }
    if let Some(age) = patch.age.filter(|age| *age != 0) {
        user.age = Some(age);
    }
    if let Some(email) = present(patch.email) {
        user.email = Some(email);
    }
    if let Some(password) = present(patch.password) {
        user.password = password;
    }
    if let Some(address) = present(patch.address) {
        user.address = Some(address);
    }
}

/// Repository whose every call fails like a dropped connection.
pub struct BrokenUsers;

fn broken<T>() -> AppResult<T> {
    Err(AppError::storage(
        "users.find",
        std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset by 10.0.0.3"),
    ))
}

#[async_trait]
impl UserRepository for BrokenUsers {
    async fn find_all(&self) -> AppResult<Vec<User>> {
        broken()
    }

    async fn find_by_id(&self, _id: &str) -> AppResult<User> {
        broken()
    }

    async fn create(&self, _user: User) -> AppResult<User> {
        broken()
    }

    async fn update(&self, _id: &str, _patch: UserPatch) -> AppResult<User> {
        broken()
    }

    async fn delete(&self, _id: &str) -> AppResult<()> {
        broken()
    }
}

pub fn router_with(repo: Arc<dyn UserRepository>, limiter: RateLimiter) -> Router {
    let hasher = PasswordHasher::new(HashCost {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap();
    let service = UserManager::new(repo, UserRules::new().unwrap(), hasher);

    create_router(AppState::new(Arc::new(service), Arc::new(limiter)))
}

/// Router over an empty in-memory store with a limit tests won't reach.
pub fn test_router() -> Router {
    router_with(
        Arc::new(InMemoryUsers::default()),
        RateLimiter::new(10_000, Duration::from_secs(60)),
    )
}

pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, json) = send_full(router, method, uri, body).await;
    (status, json)
}

pub async fn send_full(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, headers, json)
}
