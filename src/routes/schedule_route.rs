use chrono::NaiveDate;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::models::route::RouteListResponse;
use crate::models::schedule::{AvailabilityResponse, PartySize, QuoteResponse, ScheduleListResponse};
use crate::services::schedule_service::ScheduleService;
use crate::utils::error::AppError;

fn parse_travel_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid travel date format, expected YYYY-MM-DD".into()))
}

/// List active routes with their active schedules and fares
#[openapi(tag = "Routes")]
#[get("/routes")]
pub async fn list_routes(
    schedule_service: &State<ScheduleService>,
) -> Result<Json<RouteListResponse>, AppError> {
    let routes = schedule_service.list_routes().await?;
    Ok(Json(routes))
}

/// List the active schedules of a route
#[openapi(tag = "Routes")]
#[get("/routes/<route_id>/schedules")]
pub async fn list_schedules(
    route_id: i64,
    schedule_service: &State<ScheduleService>,
) -> Result<Json<ScheduleListResponse>, AppError> {
    let schedules = schedule_service.list_schedules(route_id).await?;
    Ok(Json(schedules))
}

/// Remaining seats on a sailing for one travel date
#[openapi(tag = "Schedules")]
#[get("/schedules/<schedule_id>/availability?<travel_date>")]
pub async fn get_availability(
    schedule_id: i64,
    travel_date: String,
    schedule_service: &State<ScheduleService>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let travel_date = parse_travel_date(&travel_date)?;
    let availability = schedule_service
        .get_availability(schedule_id, travel_date)
        .await?;
    Ok(Json(availability))
}

/// Price a party on a sailing, failing when it no longer fits
#[openapi(tag = "Schedules")]
#[get("/schedules/<schedule_id>/quote?<travel_date>&<adults>&<children>")]
pub async fn get_quote(
    schedule_id: i64,
    travel_date: String,
    adults: i32,
    children: Option<i32>,
    schedule_service: &State<ScheduleService>,
) -> Result<Json<QuoteResponse>, AppError> {
    let travel_date = parse_travel_date(&travel_date)?;
    let party = PartySize {
        adults,
        children: children.unwrap_or(0),
    };
    let quote = schedule_service.quote(schedule_id, travel_date, party).await?;
    Ok(Json(quote))
}
