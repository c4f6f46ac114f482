use crate::models::admin::{AdminLoginRequest, AdminLoginResponse};
use crate::models::booking::{BookingDetail, BookingPage, DashboardResponse, UpdatePaymentRequest};
use crate::services::admin_service::AdminService;
use crate::services::booking_service::BookingService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Exchange admin credentials for a bearer token
#[openapi(tag = "Admin")]
#[post("/admin/login", format = "json", data = "<request>")]
pub async fn login(
    request: Json<AdminLoginRequest>,
    admin_service: &State<AdminService>,
) -> Result<Json<AdminLoginResponse>, AppError> {
    let response = admin_service.login(request.into_inner())?;
    Ok(Json(response))
}

/// Booking counts and the latest bookings
#[openapi(tag = "Admin")]
#[get("/admin/dashboard")]
pub async fn dashboard(
    _admin: AdminUser,
    booking_service: &State<BookingService>,
) -> Result<Json<DashboardResponse>, AppError> {
    let dashboard = booking_service.dashboard().await?;
    Ok(Json(dashboard))
}

/// All bookings, newest first, 20 per page
#[openapi(tag = "Admin")]
#[get("/admin/bookings?<page>")]
pub async fn list_bookings(
    page: Option<i64>,
    _admin: AdminUser,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingPage>, AppError> {
    let bookings = booking_service.list_bookings(page.unwrap_or(1)).await?;
    Ok(Json(bookings))
}

#[openapi(tag = "Admin")]
#[get("/admin/bookings/<booking_id>")]
pub async fn get_booking(
    booking_id: i64,
    _admin: AdminUser,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingDetail>, AppError> {
    let booking = booking_service.get_booking(booking_id).await?;
    Ok(Json(booking))
}

/// Confirm, cancel or reopen a booking's payment
#[openapi(tag = "Admin")]
#[patch("/admin/bookings/<booking_id>", format = "json", data = "<request>")]
pub async fn update_booking(
    booking_id: i64,
    request: Json<UpdatePaymentRequest>,
    admin: AdminUser,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingDetail>, AppError> {
    let booking = booking_service
        .update_payment_status(booking_id, request.into_inner(), &admin.username)
        .await?;
    Ok(Json(booking))
}
