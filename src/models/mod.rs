pub mod admin;
pub mod booking;
pub mod route;
pub mod schedule;
