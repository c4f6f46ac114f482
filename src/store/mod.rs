//! Persistence for routes, schedules and the booking ledger.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::engine::Occupancy;
use crate::models::booking::{Booking, NewBooking, PaymentStatus, PaymentUpdate};
use crate::models::route::{NewRoute, Route};
use crate::models::schedule::{NewSchedule, Schedule, ScheduleWithRoute};

pub mod memory;
pub mod mysql;
pub mod seed;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Booking code {0} already exists")]
    DuplicateBookingCode(String),

    #[error("Only {remaining} seats remaining")]
    CapacityExceeded { remaining: i64 },

    #[error("Schedule {0} not found")]
    ScheduleNotFound(i64),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert_route(&self, route: NewRoute) -> StoreResult<Route>;

    async fn insert_schedule(&self, schedule: NewSchedule) -> StoreResult<Schedule>;

    async fn count_routes(&self) -> StoreResult<i64>;

    async fn count_active_routes(&self) -> StoreResult<i64>;

    async fn active_routes(&self) -> StoreResult<Vec<Route>>;

    async fn find_route(&self, route_id: i64) -> StoreResult<Option<Route>>;

    /// Active schedules of one route, earliest departure first.
    async fn active_schedules(&self, route_id: i64) -> StoreResult<Vec<Schedule>>;

    async fn find_schedule(&self, schedule_id: i64) -> StoreResult<Option<ScheduleWithRoute>>;

    /// Passenger sums over non-cancelled bookings for (schedule, date).
    async fn occupancy(&self, schedule_id: i64, travel_date: NaiveDate) -> StoreResult<Occupancy>;

    async fn booking_code_exists(&self, code: &str) -> StoreResult<bool>;

    /// Plain insert with no capacity check. Fails with `DuplicateBookingCode`
    /// when the code is already in the ledger.
    async fn insert_booking(&self, booking: NewBooking) -> StoreResult<Booking>;

    /// Capacity check and insert as one atomic step per schedule: fails with
    /// `CapacityExceeded` and writes nothing when the party does not fit.
    async fn reserve_booking(&self, booking: NewBooking) -> StoreResult<Booking>;

    async fn find_booking(&self, booking_id: i64) -> StoreResult<Option<Booking>>;

    /// Applies an admin payment transition; `None` when the booking is unknown.
    async fn update_payment(&self, booking_id: i64, update: PaymentUpdate) -> StoreResult<Option<Booking>>;

    /// Newest first.
    async fn list_bookings(&self, offset: i64, limit: i64) -> StoreResult<Vec<Booking>>;

    async fn count_bookings(&self, status: Option<PaymentStatus>) -> StoreResult<i64>;
}
