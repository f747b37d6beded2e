//! Seat reservation core.
//!
//! Every seat mutation in the system goes through [`reserve`]: a request is
//! validated, checked for internal duplicates, then handed to the store's
//! atomic check-and-insert. The whole batch is one unit — either every
//! requested seat is reserved or none are, and two concurrent requests can
//! never both claim the same seat.

use std::collections::{BTreeSet, HashSet};

use crate::error::ReservationError;
use crate::models::Seat;
use crate::store::{NewSeat, SeatStore};

/// Reserve `requested` seats for `movie_id`, all-or-nothing.
pub async fn reserve<S: SeatStore>(
    store: &S,
    movie_id: i64,
    requested: &[NewSeat],
) -> Result<Vec<Seat>, ReservationError> {
    validate(movie_id, requested)?;

    let duplicates = duplicate_names(requested);
    if !duplicates.is_empty() {
        return Err(ReservationError::SeatConflict(duplicates));
    }

    if store.find_movie(movie_id).await?.is_none() {
        return Err(ReservationError::MovieNotFound(movie_id));
    }

    store.create_seats_atomic(movie_id, requested).await
}

/// All reserved seats for `movie_id`, ordered by seat name. An empty list is
/// not an error; a missing movie is.
pub async fn list_seats<S: SeatStore>(
    store: &S,
    movie_id: i64,
) -> Result<Vec<Seat>, ReservationError> {
    if store.find_movie(movie_id).await?.is_none() {
        return Err(ReservationError::MovieNotFound(movie_id));
    }
    store.list_seats_by_movie(movie_id).await
}

fn validate(movie_id: i64, requested: &[NewSeat]) -> Result<(), ReservationError> {
    if movie_id <= 0 {
        return Err(ReservationError::Validation(
            "movieId must be positive".to_string(),
        ));
    }
    if requested.is_empty() {
        return Err(ReservationError::Validation(
            "at least one seat must be requested".to_string(),
        ));
    }
    for seat in requested {
        if seat.seatname.trim().is_empty() {
            return Err(ReservationError::Validation(
                "seatname must not be empty".to_string(),
            ));
        }
        if seat.age < 0 {
            return Err(ReservationError::Validation(format!(
                "age must be non-negative for seat {}",
                seat.seatname
            )));
        }
    }
    Ok(())
}

// Seat names appearing more than once within the request, sorted
fn duplicate_names(requested: &[NewSeat]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dups = BTreeSet::new();
    for seat in requested {
        if !seen.insert(seat.seatname.as_str()) {
            dups.insert(seat.seatname.clone());
        }
    }
    dups.into_iter().collect()
}
