pub mod admin_service;
pub mod booking_service;
pub mod schedule_service;
