use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::models::User;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/signup", post(create_user))
}

// POST /api/users, POST /api/signup
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub role: String,
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    req.validate()
        .map_err(|e| bad_request(&e.to_string()))?;
    if !matches!(req.role.as_str(), "admin" | "user") {
        return Err(bad_request("role must be either 'admin' or 'user'"));
    }

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(&req.email)
        .fetch_one(&state.db.pool)
        .await
        .map_err(internal)?;
    if exists {
        return Err(bad_request("User with this email already exists"));
    }

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST).map_err(|e| {
        tracing::error!("password hashing failed: {:?}", e);
        internal_msg()
    })?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password_hash, role)
         VALUES ($1, $2, $3)
         RETURNING *",
    )
    .bind(&req.email)
    .bind(&password_hash)
    .bind(&req.role)
    .fetch_one(&state.db.pool)
    .await
    .map_err(|e| {
        // A concurrent signup for the same email can slip past the EXISTS
        // check; the unique constraint on users.email decides the race
        if crate::store::postgres::is_unique_violation(&e) {
            bad_request("User with this email already exists")
        } else {
            internal(e)
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully", "user": user })),
    ))
}

// GET /api/users
async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
        .fetch_all(&state.db.pool)
        .await
        .map_err(internal)?;
    Ok(Json(users))
}

fn bad_request(msg: &str) -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": msg })))
}

fn internal(err: sqlx::Error) -> (StatusCode, Json<serde_json::Value>) {
    tracing::error!("users sql error: {:?}", err);
    internal_msg()
}

fn internal_msg() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Something went wrong" })),
    )
}
