use crate::models::booking::{BookingConfirmation, CreateBookingRequest};
use crate::services::booking_service::BookingService;
use crate::utils::error::AppError;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Book seats on a sailing; payment stays pending until an admin reviews it
#[openapi(tag = "Bookings")]
#[post("/bookings", format = "json", data = "<request>")]
pub async fn create_booking(
    request: Json<CreateBookingRequest>,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingConfirmation>, AppError> {
    let confirmation = booking_service
        .create_booking(request.into_inner())
        .await?;

    Ok(Json(confirmation))
}
