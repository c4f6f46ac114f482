pub mod admin_route;
pub mod booking_route;
pub mod catchers;
pub mod health_route;
pub mod schedule_route;
