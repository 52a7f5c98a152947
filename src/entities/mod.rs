pub mod booking;
pub mod booking_cancellation;
pub mod cart;
pub mod cart_item;
pub mod food_category;
pub mod food_item;
pub mod food_order;
pub mod food_order_item;
pub mod genre;
pub mod invoice;
pub mod movie;
pub mod movie_genre;
pub mod movie_review;
pub mod payment;
pub mod refund;
pub mod screen;
pub mod seat;
pub mod show;
pub mod theatre;
pub mod ticket;
pub mod user;
