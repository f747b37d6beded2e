use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy of the reservation core. Each variant maps to a distinct
/// HTTP outcome; no failure path collapses into a generic error.
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("invalid reservation request: {0}")]
    Validation(String),

    #[error("seats already reserved: {}", .0.join(", "))]
    SeatConflict(Vec<String>),

    #[error("movie {0} not found")]
    MovieNotFound(i64),

    #[error("storage failure: {0}")]
    Storage(anyhow::Error),
}

impl From<sqlx::Error> for ReservationError {
    fn from(err: sqlx::Error) -> Self {
        ReservationError::Storage(err.into())
    }
}

impl IntoResponse for ReservationError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ReservationError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "msg": msg }))
            }
            ReservationError::SeatConflict(names) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "msg": format!("seats already reserved: {}", names.join(", ")),
                    "conflicts": names,
                }),
            ),
            ReservationError::MovieNotFound(id) => (
                StatusCode::NOT_FOUND,
                json!({ "msg": format!("movie {} not found", id) }),
            ),
            ReservationError::Storage(source) => {
                tracing::error!(error = ?source, "reservation storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "msg": "internal storage error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_bad_request() {
        let err = ReservationError::SeatConflict(vec!["A2".to_string()]);
        assert_eq!(err.to_string(), "seats already reserved: A2");
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_movie_maps_to_not_found() {
        let resp = ReservationError::MovieNotFound(999).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_maps_to_server_error() {
        let err = ReservationError::Storage(anyhow::anyhow!("pool exhausted"));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
