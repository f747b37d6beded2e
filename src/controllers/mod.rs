pub mod bookings;
pub mod movies;
pub mod users;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(bookings::routes())
        .merge(movies::routes())
        .merge(users::routes())
}
