use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::error::ReservationError;
use crate::reservation;
use crate::store::{NewSeat, SeatStore};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", post(create_bookings))
        .route("/seats", get(get_seats).post(movie_with_seats))
}

/* ---------- BOOKINGS ---------- */

// POST /api/bookings
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ReserveRequest {
    #[validate(range(min = 1))]
    pub movie_id: i64,
    #[validate(length(min = 1), nested)]
    pub seats: Vec<SeatRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SeatRequest {
    #[validate(length(min = 1))]
    pub seatname: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0))]
    pub age: i32,
    pub gender: String,
    pub contact_number: String,
}

impl From<SeatRequest> for NewSeat {
    fn from(req: SeatRequest) -> Self {
        NewSeat {
            seatname: req.seatname,
            name: req.name,
            age: req.age,
            gender: req.gender,
            mobile: req.contact_number,
        }
    }
}

async fn create_bookings(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReserveRequest>,
) -> Result<impl IntoResponse, ReservationError> {
    req.validate()
        .map_err(|e| ReservationError::Validation(e.to_string()))?;

    let movie_id = req.movie_id;
    let requested: Vec<NewSeat> = req.seats.into_iter().map(NewSeat::from).collect();

    let bookings = reservation::reserve(&state.db, movie_id, &requested).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "msg": "All bookings created successfully.",
            "bookings": bookings,
        })),
    ))
}

/* ---------- SEATS ---------- */

// GET /api/seats?movieId=N
#[derive(Debug, Deserialize)]
pub struct SeatsQuery {
    #[serde(rename = "movieId")]
    movie_id: i64,
}

async fn get_seats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeatsQuery>,
) -> Result<impl IntoResponse, ReservationError> {
    let seats = reservation::list_seats(&state.db, params.movie_id).await?;
    Ok(Json(json!({ "msg": "Success", "seats": seats })))
}

// POST /api/seats — movie details together with its reserved seats
#[derive(Debug, Deserialize)]
pub struct MovieSeatsRequest {
    movieid: i64,
}

async fn movie_with_seats(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MovieSeatsRequest>,
) -> Result<impl IntoResponse, ReservationError> {
    let movie = state
        .db
        .find_movie(req.movieid)
        .await?
        .ok_or(ReservationError::MovieNotFound(req.movieid))?;
    let seats = state.db.list_seats_by_movie(req.movieid).await?;

    let mut movie_json =
        serde_json::to_value(&movie).map_err(|e| ReservationError::Storage(e.into()))?;
    movie_json["seats"] =
        serde_json::to_value(&seats).map_err(|e| ReservationError::Storage(e.into()))?;

    Ok(Json(json!({ "success": true, "movie": movie_json })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_request_parses_camel_case() {
        let body = json!({
            "movieId": 1,
            "seats": [{
                "seatname": "A1",
                "name": "Alex Carter",
                "age": 30,
                "gender": "other",
                "contactNumber": "5550100"
            }]
        });
        let req: ReserveRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.movie_id, 1);
        assert_eq!(req.seats[0].contact_number, "5550100");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn unknown_fields_rejected_at_boundary() {
        let body = json!({
            "movieId": 1,
            "seats": [],
            "overwrite": true
        });
        assert!(serde_json::from_value::<ReserveRequest>(body).is_err());
    }

    #[test]
    fn missing_contact_number_rejected() {
        let body = json!({
            "movieId": 1,
            "seats": [{
                "seatname": "A1",
                "name": "Alex Carter",
                "age": 30,
                "gender": "other"
            }]
        });
        assert!(serde_json::from_value::<ReserveRequest>(body).is_err());
    }

    #[test]
    fn empty_seat_list_fails_validation() {
        let body = json!({ "movieId": 1, "seats": [] });
        let req: ReserveRequest = serde_json::from_value(body).unwrap();
        assert!(req.validate().is_err());
    }

    // The length validator on `seats` embeds the field value in its error
    // params, so the DTOs must stay serializable
    #[test]
    fn reserve_request_serializes_back_to_wire_shape() {
        let body = json!({
            "movieId": 1,
            "seats": [{
                "seatname": "A1",
                "name": "Alex Carter",
                "age": 30,
                "gender": "other",
                "contactNumber": "5550100"
            }]
        });
        let req: ReserveRequest = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(serde_json::to_value(&req).unwrap(), body);
    }
}
