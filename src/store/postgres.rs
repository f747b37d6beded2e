use async_trait::async_trait;
use std::time::Duration;

use super::{NewSeat, SeatStore};
use crate::database::Database;
use crate::error::ReservationError;
use crate::models::{Movie, Seat};

// Bound on the reservation transaction; expiry surfaces as a storage failure
const RESERVE_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
impl SeatStore for Database {
    async fn find_movie(&self, movie_id: i64) -> Result<Option<Movie>, ReservationError> {
        let movie = sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = $1")
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(movie)
    }

    async fn list_seats_by_movie(&self, movie_id: i64) -> Result<Vec<Seat>, ReservationError> {
        let seats = sqlx::query_as::<_, Seat>(
            "SELECT * FROM seats WHERE movie_id = $1 ORDER BY seatname",
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(seats)
    }

    async fn create_seats_atomic(
        &self,
        movie_id: i64,
        seats: &[NewSeat],
    ) -> Result<Vec<Seat>, ReservationError> {
        let names: Vec<String> = seats.iter().map(|s| s.seatname.clone()).collect();
        match tokio::time::timeout(RESERVE_TIMEOUT, self.insert_seats_tx(movie_id, seats, &names))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ReservationError::Storage(anyhow::anyhow!(
                "reservation transaction timed out"
            ))),
        }
    }
}

impl Database {
    async fn insert_seats_tx(
        &self,
        movie_id: i64,
        seats: &[NewSeat],
        names: &[String],
    ) -> Result<Vec<Seat>, ReservationError> {
        let mut tx = self.pool.begin().await?;

        // Names already reserved among the requested set
        let taken: Vec<String> = sqlx::query_scalar(
            "SELECT seatname FROM seats WHERE movie_id = $1 AND seatname = ANY($2) ORDER BY seatname",
        )
        .bind(movie_id)
        .bind(names)
        .fetch_all(&mut *tx)
        .await?;

        if !taken.is_empty() {
            tx.rollback().await.ok();
            return Err(ReservationError::SeatConflict(taken));
        }

        let mut created = Vec::with_capacity(seats.len());
        for seat in seats {
            let inserted = sqlx::query_as::<_, Seat>(
                "INSERT INTO seats (movie_id, seatname, name, age, gender, mobile)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING *",
            )
            .bind(movie_id)
            .bind(&seat.seatname)
            .bind(&seat.name)
            .bind(seat.age)
            .bind(&seat.gender)
            .bind(&seat.mobile)
            .fetch_one(&mut *tx)
            .await;

            match inserted {
                Ok(row) => created.push(row),
                // A concurrent reservation claimed this seat between our
                // availability check and the insert; the uniqueness
                // constraint on (movie_id, seatname) is the backstop.
                Err(err) if is_unique_violation(&err) => {
                    tx.rollback().await.ok();
                    let taken = self.reserved_among(movie_id, names).await?;
                    return Err(ReservationError::SeatConflict(if taken.is_empty() {
                        vec![seat.seatname.clone()]
                    } else {
                        taken
                    }));
                }
                Err(err) => {
                    tx.rollback().await.ok();
                    return Err(err.into());
                }
            }
        }

        tx.commit().await?;
        Ok(created)
    }

    // Committed reservations intersecting the requested names, for conflict
    // reporting after a constraint violation
    async fn reserved_among(
        &self,
        movie_id: i64,
        names: &[String],
    ) -> Result<Vec<String>, ReservationError> {
        let taken = sqlx::query_scalar(
            "SELECT seatname FROM seats WHERE movie_id = $1 AND seatname = ANY($2) ORDER BY seatname",
        )
        .bind(movie_id)
        .bind(names)
        .fetch_all(&self.pool)
        .await?;
        Ok(taken)
    }
}

// Postgres unique_violation; also the backstop signal for any race on an
// enforced uniqueness constraint
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[derive(Debug)]
    struct StubDbError(&'static str);

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "constraint violation ({})", self.0)
        }
    }

    impl std::error::Error for StubDbError {}

    impl sqlx::error::DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(self.0.into())
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            match self.0 {
                "23505" => sqlx::error::ErrorKind::UniqueViolation,
                _ => sqlx::error::ErrorKind::Other,
            }
        }
    }

    #[test]
    fn classifies_unique_violations() {
        let dup = sqlx::Error::Database(Box::new(StubDbError("23505")));
        assert!(is_unique_violation(&dup));

        let fk = sqlx::Error::Database(Box::new(StubDbError("23503")));
        assert!(!is_unique_violation(&fk));

        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
