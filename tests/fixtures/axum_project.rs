// Axum test fixture - a small users API documented in handler doc comments
use axum::{
    extract::{Path, Query},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i32>,
}

/// List users.
/// ---
/// parameters:
///   - name: page
///     in: query
///     type: integer
/// responses:
///   200:
///     description: A page of users
async fn get_users(Query(query): Query<ListQuery>) -> Json<Vec<User>> {
    Json(vec![])
}

/// responses:
///   200:
///     description: The user
///   404:
///     description: No such user
async fn get_user(Path(id): Path<u32>) -> Json<User> {
    Json(User {
        id,
        name: "Test".to_string(),
    })
}

/// Create a user.
async fn create_user(Json(user): Json<User>) -> Json<User> {
    Json(user)
}

async fn delete_user(Path(id): Path<u32>) {}

async fn health_check() -> &'static str {
    "OK"
}

async fn login() {}

pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1/users", users_router())
        .nest("/auth", Router::new().route("/login", post(login)))
}

fn users_router() -> Router {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/:id", get(get_user).delete(delete_user))
}
