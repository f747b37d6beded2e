//! In-memory [`SeatStore`] backing the reservation test suite. The whole
//! check-and-insert runs under one mutex guard, so the atomicity contract
//! matches the Postgres transaction.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::Mutex;

use super::{NewSeat, SeatStore};
use crate::error::ReservationError;
use crate::models::{Movie, Seat};

pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    movies: HashMap<i64, Movie>,
    seats: Vec<Seat>,
    next_seat_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_seat_id: 1,
                ..Default::default()
            }),
        }
    }

    pub async fn add_movie(&self, id: i64, title: &str) {
        let mut inner = self.inner.lock().await;
        inner.movies.insert(
            id,
            Movie {
                id,
                title: title.to_string(),
                director: "Jane Doe".to_string(),
                description: None,
                showtime: "18:00".to_string(),
                showdate: "2026-09-01".to_string(),
                image: None,
            },
        );
    }

    pub async fn seat_count(&self) -> usize {
        self.inner.lock().await.seats.len()
    }
}

#[async_trait]
impl SeatStore for MemoryStore {
    async fn find_movie(&self, movie_id: i64) -> Result<Option<Movie>, ReservationError> {
        Ok(self.inner.lock().await.movies.get(&movie_id).cloned())
    }

    async fn list_seats_by_movie(&self, movie_id: i64) -> Result<Vec<Seat>, ReservationError> {
        let inner = self.inner.lock().await;
        let mut seats: Vec<Seat> = inner
            .seats
            .iter()
            .filter(|s| s.movie_id == movie_id)
            .cloned()
            .collect();
        seats.sort_by(|a, b| a.seatname.cmp(&b.seatname));
        Ok(seats)
    }

    async fn create_seats_atomic(
        &self,
        movie_id: i64,
        seats: &[NewSeat],
    ) -> Result<Vec<Seat>, ReservationError> {
        let mut inner = self.inner.lock().await;

        let taken: BTreeSet<String> = inner
            .seats
            .iter()
            .filter(|s| s.movie_id == movie_id)
            .filter(|s| seats.iter().any(|req| req.seatname == s.seatname))
            .map(|s| s.seatname.clone())
            .collect();
        if !taken.is_empty() {
            return Err(ReservationError::SeatConflict(taken.into_iter().collect()));
        }

        let mut created = Vec::with_capacity(seats.len());
        for seat in seats {
            let id = inner.next_seat_id;
            inner.next_seat_id += 1;
            let row = Seat {
                id,
                movie_id,
                seatname: seat.seatname.clone(),
                name: seat.name.clone(),
                age: seat.age,
                gender: seat.gender.clone(),
                mobile: seat.mobile.clone(),
                created_at: chrono::Utc::now().naive_utc(),
            };
            inner.seats.push(row.clone());
            created.push(row);
        }
        Ok(created)
    }
}
