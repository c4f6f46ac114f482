use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::engine::{self, Quote};
use crate::models::route::{Route, RouteSummary};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, JsonSchema)]
pub struct Schedule {
    pub id: i64,
    pub route_id: i64,
    pub ferry_name: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub total_seats: i32,
    pub price_multiplier: Decimal,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub route_id: i64,
    pub ferry_name: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub total_seats: i32,
    pub price_multiplier: Decimal,
    pub is_active: bool,
}

impl NewSchedule {
    pub fn into_schedule(self, id: i64) -> Schedule {
        Schedule {
            id,
            route_id: self.route_id,
            ferry_name: self.ferry_name,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            total_seats: self.total_seats,
            price_multiplier: self.price_multiplier,
            is_active: self.is_active,
        }
    }
}

// A schedule together with its owning route
#[derive(Debug, Clone)]
pub struct ScheduleWithRoute {
    pub schedule: Schedule,
    pub route: Route,
}

impl ScheduleWithRoute {
    /// Only active schedules on active routes take bookings.
    pub fn is_bookable(&self) -> bool {
        self.schedule.is_active && self.route.is_active
    }
}

/// Schedule with the per-passenger fares derived from its route.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ScheduleDetail {
    pub id: i64,
    pub route_id: i64,
    pub ferry_name: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub total_seats: i32,
    pub price_multiplier: Decimal,
    pub adult_price: Decimal,
    pub child_price: Decimal,
}

impl ScheduleDetail {
    pub fn new(schedule: &Schedule, route: &Route) -> Self {
        let prices = engine::unit_prices(route, schedule);
        ScheduleDetail {
            id: schedule.id,
            route_id: schedule.route_id,
            ferry_name: schedule.ferry_name.clone(),
            departure_time: schedule.departure_time,
            arrival_time: schedule.arrival_time,
            total_seats: schedule.total_seats,
            price_multiplier: schedule.price_multiplier,
            adult_price: prices.adult,
            child_price: prices.child,
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ScheduleListResponse {
    pub schedules: Vec<ScheduleDetail>,
}

// Schedule nested inside booking payloads
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ScheduleSummary {
    pub id: i64,
    pub ferry_name: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub route: RouteSummary,
}

impl From<&ScheduleWithRoute> for ScheduleSummary {
    fn from(value: &ScheduleWithRoute) -> Self {
        ScheduleSummary {
            id: value.schedule.id,
            ferry_name: value.schedule.ferry_name.clone(),
            departure_time: value.schedule.departure_time,
            arrival_time: value.schedule.arrival_time,
            route: RouteSummary::from(&value.route),
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct AvailabilityResponse {
    pub schedule_id: i64,
    pub travel_date: NaiveDate,
    pub total_seats: i32,
    pub booked_seats: i64,
    pub available_seats: i64,
}

// Party size for a quote, same limits as a booking request
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema, Validate)]
pub struct PartySize {
    #[validate(range(min = 1, max = 10, message = "Between 1 and 10 adult passengers are allowed."))]
    pub adults: i32,

    #[validate(range(min = 0, max = 10, message = "Maximum 10 child passengers allowed."))]
    pub children: i32,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct QuoteResponse {
    pub schedule_id: i64,
    pub travel_date: NaiveDate,
    pub adults: i32,
    pub children: i32,
    pub adult_price: Decimal,
    pub child_price: Decimal,
    pub total_amount: Decimal,
    pub available_seats: i64,
}

impl QuoteResponse {
    pub fn new(schedule_id: i64, travel_date: NaiveDate, quote: &Quote) -> Self {
        QuoteResponse {
            schedule_id,
            travel_date,
            adults: quote.adults,
            children: quote.children,
            adult_price: quote.prices.adult,
            child_price: quote.prices.child,
            total_amount: quote.total_amount,
            available_seats: quote.available_seats,
        }
    }
}
