pub mod booking_code;
pub mod error;
pub mod jwt;
pub mod swagger_doc;
