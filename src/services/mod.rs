pub mod bookings;
pub mod food;
pub mod movies;
pub mod payments;
pub mod shows;
pub mod theatres;
pub mod users;
