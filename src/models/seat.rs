use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted reservation. Row existence for a `(movie_id, seatname)` pair
/// is the reservation itself; there is no separate availability state.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: i64,
    pub movie_id: i64,
    pub seatname: String,
    pub name: String,
    pub age: i32,
    pub gender: String,
    #[serde(rename = "contactNumber")]
    pub mobile: String,
    pub created_at: NaiveDateTime,
}
