use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::models::Movie;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/movies", get(list_movies).post(create_movie))
}

// GET /api/movies
async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let movies = sqlx::query_as::<_, Movie>("SELECT * FROM movies ORDER BY id")
        .fetch_all(&state.db.pool)
        .await
        .map_err(|e| {
            tracing::error!("list_movies sql error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch movies".to_string(),
            )
        })?;

    Ok(Json(json!({ "success": true, "data": movies })))
}

// POST /api/movies — multipart form with an optional poster image
async fn create_movie(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut title = None;
    let mut director = None;
    let mut description = None;
    let mut showtime = None;
    let mut showdate = None;
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid form data: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("title") => title = Some(read_text(field).await?),
            Some("directorName") => director = Some(read_text(field).await?),
            Some("description") => description = Some(read_text(field).await?),
            Some("showTime") => showtime = Some(read_text(field).await?),
            Some("showDate") => showdate = Some(read_text(field).await?),
            Some("image") => {
                let bytes = field.bytes().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("Invalid image upload: {e}"))
                })?;
                if !bytes.is_empty() {
                    image = Some(bytes.to_vec());
                }
            }
            _ => {}
        }
    }

    let title = require(title, "title")?;
    let director = require(director, "directorName")?;
    let showtime = require(showtime, "showTime")?;
    let showdate = require(showdate, "showDate")?;

    let movie = sqlx::query_as::<_, Movie>(
        "INSERT INTO movies (title, director, description, showtime, showdate, image)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(&title)
    .bind(&director)
    .bind(&description)
    .bind(&showtime)
    .bind(&showdate)
    .bind(&image)
    .fetch_one(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("create_movie sql error: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error adding movie".to_string(),
        )
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Movie added successfully",
            "data": movie,
        })),
    ))
}

async fn read_text(
    field: axum::extract::multipart::Field<'_>,
) -> Result<String, (StatusCode, String)> {
    field
        .text()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid form field: {e}")))
}

fn require(value: Option<String>, name: &str) -> Result<String, (StatusCode, String)> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err((StatusCode::BAD_REQUEST, format!("{name} is required"))),
    }
}
