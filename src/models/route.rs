use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::schedule::ScheduleDetail;

// Row as stored in ferry_routes; facilities is JSON text
#[derive(Debug, sqlx::FromRow)]
pub struct RouteRow {
    pub id: i64,
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub base_price_adult: Decimal,
    pub base_price_child: Decimal,
    pub duration_hours: i32,
    pub duration_minutes: i32,
    pub facilities: Option<String>,
    pub cancellation_policy: Option<String>,
    pub is_active: bool,
}

impl From<RouteRow> for Route {
    fn from(row: RouteRow) -> Self {
        // Unreadable facility lists degrade to an empty list rather than failing the read.
        let facilities = row
            .facilities
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
            .unwrap_or_default();

        Route {
            id: row.id,
            name: row.name,
            origin: row.origin,
            destination: row.destination,
            base_price_adult: row.base_price_adult,
            base_price_child: row.base_price_child,
            duration: TravelDuration {
                hours: row.duration_hours,
                minutes: row.duration_minutes,
            },
            facilities,
            cancellation_policy: row.cancellation_policy,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TravelDuration {
    pub hours: i32,
    pub minutes: i32,
}

impl TravelDuration {
    pub fn new(hours: i32, minutes: i32) -> Self {
        TravelDuration { hours, minutes }
    }

    pub fn total_minutes(&self) -> i64 {
        i64::from(self.hours) * 60 + i64::from(self.minutes)
    }

    /// "12h", "1h 30m" or "45m".
    pub fn formatted(&self) -> String {
        if self.hours > 0 && self.minutes > 0 {
            format!("{}h {}m", self.hours, self.minutes)
        } else if self.hours > 0 {
            format!("{}h", self.hours)
        } else {
            format!("{}m", self.minutes)
        }
    }
}

/// A named origin/destination corridor with its base fares.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Route {
    pub id: i64,
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub base_price_adult: Decimal,
    pub base_price_child: Decimal,
    pub duration: TravelDuration,
    pub facilities: Vec<String>,
    pub cancellation_policy: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewRoute {
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub base_price_adult: Decimal,
    pub base_price_child: Decimal,
    pub duration: TravelDuration,
    pub facilities: Vec<String>,
    pub cancellation_policy: Option<String>,
    pub is_active: bool,
}

impl NewRoute {
    pub fn into_route(self, id: i64) -> Route {
        Route {
            id,
            name: self.name,
            origin: self.origin,
            destination: self.destination,
            base_price_adult: self.base_price_adult,
            base_price_child: self.base_price_child,
            duration: self.duration,
            facilities: self.facilities,
            cancellation_policy: self.cancellation_policy,
            is_active: self.is_active,
        }
    }
}

// Route summary nested under schedules in booking payloads
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RouteSummary {
    pub id: i64,
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub duration_formatted: String,
    pub cancellation_policy: Option<String>,
}

impl From<&Route> for RouteSummary {
    fn from(route: &Route) -> Self {
        RouteSummary {
            id: route.id,
            name: route.name.clone(),
            origin: route.origin.clone(),
            destination: route.destination.clone(),
            duration_formatted: route.duration.formatted(),
            cancellation_policy: route.cancellation_policy.clone(),
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct RouteDetail {
    pub id: i64,
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub base_price_adult: Decimal,
    pub base_price_child: Decimal,
    pub duration_hours: i32,
    pub duration_minutes: i32,
    pub duration_formatted: String,
    pub facilities: Vec<String>,
    pub cancellation_policy: Option<String>,
    pub schedules: Vec<ScheduleDetail>,
}

impl RouteDetail {
    pub fn new(route: &Route, schedules: Vec<ScheduleDetail>) -> Self {
        RouteDetail {
            id: route.id,
            name: route.name.clone(),
            origin: route.origin.clone(),
            destination: route.destination.clone(),
            base_price_adult: route.base_price_adult,
            base_price_child: route.base_price_child,
            duration_hours: route.duration.hours,
            duration_minutes: route.duration.minutes,
            duration_formatted: route.duration.formatted(),
            facilities: route.facilities.clone(),
            cancellation_policy: route.cancellation_policy.clone(),
            schedules,
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct RouteListResponse {
    pub routes: Vec<RouteDetail>,
}
