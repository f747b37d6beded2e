//! Narrow persistence seam for the reservation core.
//!
//! The core only ever talks to a [`SeatStore`], so the check-and-insert
//! logic is independent of the storage engine. The Postgres implementation
//! enforces the `(movie_id, seatname)` uniqueness constraint; the in-memory
//! implementation serializes reservations behind a mutex.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::error::ReservationError;
use crate::models::{Movie, Seat};

/// Seat data accepted from a reservation request, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSeat {
    pub seatname: String,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub mobile: String,
}

#[async_trait]
pub trait SeatStore: Send + Sync {
    async fn find_movie(&self, movie_id: i64) -> Result<Option<Movie>, ReservationError>;

    /// All reserved seats for a movie, ordered by seat name.
    async fn list_seats_by_movie(&self, movie_id: i64) -> Result<Vec<Seat>, ReservationError>;

    /// Insert every requested seat for `movie_id`, or none of them.
    ///
    /// Returns `SeatConflict` with the offending names when any requested
    /// seat name is already reserved, including when a concurrent
    /// reservation claims it between check and insert.
    async fn create_seats_atomic(
        &self,
        movie_id: i64,
        seats: &[NewSeat],
    ) -> Result<Vec<Seat>, ReservationError>;
}
