pub mod movie;
pub mod seat;
pub mod user;

pub use movie::Movie;
pub use seat::Seat;
pub use user::User;
