use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::engine::{self, Occupancy};
use crate::models::booking::{Booking, NewBooking, PaymentStatus, PaymentUpdate};
use crate::models::route::{NewRoute, Route};
use crate::models::schedule::{NewSchedule, Schedule, ScheduleWithRoute};
use crate::store::{BookingStore, StoreError, StoreResult};

#[derive(Default)]
struct Ledger {
    routes: BTreeMap<i64, Route>,
    schedules: BTreeMap<i64, Schedule>,
    bookings: BTreeMap<i64, Booking>,
    next_route_id: i64,
    next_schedule_id: i64,
    next_booking_id: i64,
}

impl Ledger {
    fn occupancy(&self, schedule_id: i64, travel_date: NaiveDate) -> Occupancy {
        Occupancy::from_bookings(self.bookings.values(), schedule_id, travel_date)
    }

    fn insert_booking(&mut self, booking: NewBooking) -> StoreResult<Booking> {
        if self
            .bookings
            .values()
            .any(|b| b.booking_code == booking.booking_code)
        {
            return Err(StoreError::DuplicateBookingCode(booking.booking_code));
        }

        self.next_booking_id += 1;
        let booking = booking.into_booking(self.next_booking_id, Utc::now());
        self.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }
}

/// In-process ledger. Every operation runs under one lock, so `reserve_booking`
/// is atomic by construction.
#[derive(Default)]
pub struct MemoryStore {
    ledger: Mutex<Ledger>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert_route(&self, route: NewRoute) -> StoreResult<Route> {
        let mut ledger = self.ledger.lock().await;
        ledger.next_route_id += 1;
        let route = route.into_route(ledger.next_route_id);
        ledger.routes.insert(route.id, route.clone());
        Ok(route)
    }

    async fn insert_schedule(&self, schedule: NewSchedule) -> StoreResult<Schedule> {
        let mut ledger = self.ledger.lock().await;
        ledger.next_schedule_id += 1;
        let schedule = schedule.into_schedule(ledger.next_schedule_id);
        ledger.schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }

    async fn count_routes(&self) -> StoreResult<i64> {
        Ok(self.ledger.lock().await.routes.len() as i64)
    }

    async fn count_active_routes(&self) -> StoreResult<i64> {
        let ledger = self.ledger.lock().await;
        Ok(ledger.routes.values().filter(|r| r.is_active).count() as i64)
    }

    async fn active_routes(&self) -> StoreResult<Vec<Route>> {
        let ledger = self.ledger.lock().await;
        Ok(ledger
            .routes
            .values()
            .filter(|r| r.is_active)
            .cloned()
            .collect())
    }

    async fn find_route(&self, route_id: i64) -> StoreResult<Option<Route>> {
        Ok(self.ledger.lock().await.routes.get(&route_id).cloned())
    }

    async fn active_schedules(&self, route_id: i64) -> StoreResult<Vec<Schedule>> {
        let ledger = self.ledger.lock().await;
        let mut schedules: Vec<Schedule> = ledger
            .schedules
            .values()
            .filter(|s| s.route_id == route_id && s.is_active)
            .cloned()
            .collect();
        schedules.sort_by_key(|s| (s.departure_time, s.id));
        Ok(schedules)
    }

    async fn find_schedule(&self, schedule_id: i64) -> StoreResult<Option<ScheduleWithRoute>> {
        let ledger = self.ledger.lock().await;
        let found = ledger.schedules.get(&schedule_id).and_then(|schedule| {
            ledger
                .routes
                .get(&schedule.route_id)
                .map(|route| ScheduleWithRoute {
                    schedule: schedule.clone(),
                    route: route.clone(),
                })
        });
        Ok(found)
    }

    async fn occupancy(&self, schedule_id: i64, travel_date: NaiveDate) -> StoreResult<Occupancy> {
        Ok(self.ledger.lock().await.occupancy(schedule_id, travel_date))
    }

    async fn booking_code_exists(&self, code: &str) -> StoreResult<bool> {
        let ledger = self.ledger.lock().await;
        Ok(ledger.bookings.values().any(|b| b.booking_code == code))
    }

    async fn insert_booking(&self, booking: NewBooking) -> StoreResult<Booking> {
        self.ledger.lock().await.insert_booking(booking)
    }

    async fn reserve_booking(&self, booking: NewBooking) -> StoreResult<Booking> {
        let mut ledger = self.ledger.lock().await;
        let total_seats = ledger
            .schedules
            .get(&booking.schedule_id)
            .map(|s| s.total_seats)
            .ok_or(StoreError::ScheduleNotFound(booking.schedule_id))?;

        let occupancy = ledger.occupancy(booking.schedule_id, booking.travel_date);
        let remaining = engine::available_seats(total_seats, occupancy);
        if booking.total_passengers() > remaining {
            return Err(StoreError::CapacityExceeded { remaining });
        }

        ledger.insert_booking(booking)
    }

    async fn find_booking(&self, booking_id: i64) -> StoreResult<Option<Booking>> {
        Ok(self.ledger.lock().await.bookings.get(&booking_id).cloned())
    }

    async fn update_payment(&self, booking_id: i64, update: PaymentUpdate) -> StoreResult<Option<Booking>> {
        let mut ledger = self.ledger.lock().await;
        let updated = ledger.bookings.get_mut(&booking_id).map(|booking| {
            booking.apply_payment_update(update, Utc::now());
            booking.clone()
        });
        Ok(updated)
    }

    async fn list_bookings(&self, offset: i64, limit: i64) -> StoreResult<Vec<Booking>> {
        let ledger = self.ledger.lock().await;
        // Ids grow with insertion order, so reverse id order is newest first
        Ok(ledger
            .bookings
            .values()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count_bookings(&self, status: Option<PaymentStatus>) -> StoreResult<i64> {
        let ledger = self.ledger.lock().await;
        let count = ledger
            .bookings
            .values()
            .filter(|b| status.map_or(true, |s| b.payment_status == s))
            .count();
        Ok(count as i64)
    }
}
