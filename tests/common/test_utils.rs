#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate, NaiveTime};
use dotenv::dotenv;
use ferry_booking_system::engine::Occupancy;
use ferry_booking_system::models::booking::{
    Booking, CreateBookingRequest, NewBooking, PaymentMethod, PaymentStatus, PaymentUpdate,
};
use ferry_booking_system::models::route::{NewRoute, Route, TravelDuration};
use ferry_booking_system::models::schedule::{NewSchedule, Schedule, ScheduleWithRoute};
use ferry_booking_system::store::{BookingStore, MemoryStore, StoreError, StoreResult};
use once_cell::sync::OnceCell;
use rust_decimal::Decimal;
use sqlx::mysql::MySqlPool as Pool;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::Error;
use std::env;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{Barrier, Mutex};

// Jakarta - Batam fares
pub const ADULT_FARE: i64 = 350000;
pub const CHILD_FARE: i64 = 250000;

/// Fixed "today" for service calls that take the current date explicitly.
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()
}

/// A date the real clock still treats as upcoming, for HTTP tests.
pub fn upcoming_date(days: i64) -> NaiveDate {
    Local::now().date_naive() + Duration::days(days)
}

pub fn jakarta_batam() -> NewRoute {
    NewRoute {
        name: "Jakarta - Batam".to_string(),
        origin: "Jakarta".to_string(),
        destination: "Batam".to_string(),
        base_price_adult: Decimal::new(ADULT_FARE, 0),
        base_price_child: Decimal::new(CHILD_FARE, 0),
        duration: TravelDuration::new(12, 0),
        facilities: vec!["WiFi".to_string()],
        cancellation_policy: None,
        is_active: true,
    }
}

/// Inserts one route with a single sailing of the given size and multiplier (hundredths).
pub async fn insert_sailing(
    store: &dyn BookingStore,
    total_seats: i32,
    multiplier: i64,
    is_active: bool,
) -> ScheduleWithRoute {
    let route = store.insert_route(jakarta_batam()).await.unwrap();
    let schedule = store
        .insert_schedule(NewSchedule {
            route_id: route.id,
            ferry_name: "Ocean Breeze".to_string(),
            departure_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            arrival_time: NaiveTime::from_hms_opt(2, 0, 0).unwrap(),
            total_seats,
            price_multiplier: Decimal::new(multiplier, 2),
            is_active,
        })
        .await
        .unwrap();

    store.find_schedule(schedule.id).await.unwrap().unwrap()
}

pub async fn memory_store_with_sailing(total_seats: i32, multiplier: i64) -> (Arc<MemoryStore>, ScheduleWithRoute) {
    let store = Arc::new(MemoryStore::new());
    let target = insert_sailing(store.as_ref(), total_seats, multiplier, true).await;
    (store, target)
}

pub fn booking_request(
    schedule_id: i64,
    travel_date: NaiveDate,
    adults: i32,
    children: i32,
    payment_method: PaymentMethod,
) -> CreateBookingRequest {
    CreateBookingRequest {
        schedule_id,
        travel_date,
        passenger_name: "Siti Rahma".to_string(),
        passenger_email: "siti@example.com".to_string(),
        passenger_phone: "081234567890".to_string(),
        adults_count: adults,
        children_count: children,
        payment_method,
    }
}

/// MemoryStore wrapper that can turn booking writes into duplicate-code
/// failures and hold occupancy reads until every party has read.
pub struct ScriptedStore {
    inner: MemoryStore,
    duplicate_writes: AtomicU32,
    write_attempts: AtomicU32,
    occupancy_barrier: Option<Barrier>,
}

impl ScriptedStore {
    fn build(duplicate_writes: u32, occupancy_barrier: Option<Barrier>) -> Self {
        ScriptedStore {
            inner: MemoryStore::new(),
            duplicate_writes: AtomicU32::new(duplicate_writes),
            write_attempts: AtomicU32::new(0),
            occupancy_barrier,
        }
    }

    /// The next `times` booking writes fail as if the code were already taken.
    pub fn rejecting_codes(times: u32) -> Self {
        Self::build(times, None)
    }

    /// Occupancy reads wait until `parties` callers have read.
    pub fn with_occupancy_barrier(parties: usize) -> Self {
        Self::build(0, Some(Barrier::new(parties)))
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn write_attempts(&self) -> u32 {
        self.write_attempts.load(Ordering::SeqCst)
    }

    fn reject_write(&self, booking: &NewBooking) -> StoreResult<()> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        let rejected = self
            .duplicate_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if rejected {
            return Err(StoreError::DuplicateBookingCode(booking.booking_code.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl BookingStore for ScriptedStore {
    async fn insert_route(&self, route: NewRoute) -> StoreResult<Route> {
        self.inner.insert_route(route).await
    }

    async fn insert_schedule(&self, schedule: NewSchedule) -> StoreResult<Schedule> {
        self.inner.insert_schedule(schedule).await
    }

    async fn count_routes(&self) -> StoreResult<i64> {
        self.inner.count_routes().await
    }

    async fn count_active_routes(&self) -> StoreResult<i64> {
        self.inner.count_active_routes().await
    }

    async fn active_routes(&self) -> StoreResult<Vec<Route>> {
        self.inner.active_routes().await
    }

    async fn find_route(&self, route_id: i64) -> StoreResult<Option<Route>> {
        self.inner.find_route(route_id).await
    }

    async fn active_schedules(&self, route_id: i64) -> StoreResult<Vec<Schedule>> {
        self.inner.active_schedules(route_id).await
    }

    async fn find_schedule(&self, schedule_id: i64) -> StoreResult<Option<ScheduleWithRoute>> {
        self.inner.find_schedule(schedule_id).await
    }

    async fn occupancy(&self, schedule_id: i64, travel_date: NaiveDate) -> StoreResult<Occupancy> {
        let occupancy = self.inner.occupancy(schedule_id, travel_date).await?;
        if let Some(barrier) = &self.occupancy_barrier {
            barrier.wait().await;
        }
        Ok(occupancy)
    }

    async fn booking_code_exists(&self, code: &str) -> StoreResult<bool> {
        self.inner.booking_code_exists(code).await
    }

    async fn insert_booking(&self, booking: NewBooking) -> StoreResult<Booking> {
        self.reject_write(&booking)?;
        self.inner.insert_booking(booking).await
    }

    async fn reserve_booking(&self, booking: NewBooking) -> StoreResult<Booking> {
        self.reject_write(&booking)?;
        self.inner.reserve_booking(booking).await
    }

    async fn find_booking(&self, booking_id: i64) -> StoreResult<Option<Booking>> {
        self.inner.find_booking(booking_id).await
    }

    async fn update_payment(&self, booking_id: i64, update: PaymentUpdate) -> StoreResult<Option<Booking>> {
        self.inner.update_payment(booking_id, update).await
    }

    async fn list_bookings(&self, offset: i64, limit: i64) -> StoreResult<Vec<Booking>> {
        self.inner.list_bookings(offset, limit).await
    }

    async fn count_bookings(&self, status: Option<PaymentStatus>) -> StoreResult<i64> {
        self.inner.count_bookings(status).await
    }
}

static TEST_DB: OnceCell<Mutex<Option<TestDb>>> = OnceCell::new();
static DB_NAME: OnceCell<String> = OnceCell::new();

#[derive(Debug)]
pub struct TestDb {
    pub pool: Pool,
    pub db_name: String,
}

fn admin_base_url() -> String {
    dotenv().ok();
    let db_url = env::var("ADMIN_DATABASE_URL").expect("ADMIN_DATABASE_URL must be set in .env file");
    db_url.split('/').collect::<Vec<&str>>()[..3].join("/")
}

// Create a connection pool without a database, used to create a new database
async fn create_connection_pool_without_db() -> Result<Pool, Error> {
    MySqlPoolOptions::new()
        .max_connections(10)
        .connect(&admin_base_url())
        .await
}

async fn create_connection_pool_with_db(db_name: &str) -> Result<Pool, Error> {
    MySqlPoolOptions::new()
        .max_connections(20)
        .connect(&format!("{}/{}", admin_base_url(), db_name))
        .await
}

impl TestDb {
    // One database per test binary, created on first use
    pub async fn get_instance() -> Result<Pool, Error> {
        let test_db = TEST_DB.get_or_init(|| Mutex::new(None));
        let mut guard = test_db.lock().await;

        if let Some(db) = guard.as_ref() {
            return Ok(db.pool.clone());
        }

        let db = Self::setup_database().await?;
        let pool = db.pool.clone();
        *guard = Some(db);
        Ok(pool)
    }

    async fn setup_database() -> Result<Self, Error> {
        let db_name = DB_NAME
            .get_or_init(|| {
                let timestamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap()
                    .as_millis();
                format!("ferry_test_{}", timestamp)
            })
            .clone();

        let admin_pool = create_connection_pool_without_db().await?;
        sqlx::query(&format!("CREATE DATABASE {}", db_name))
            .execute(&admin_pool)
            .await?;

        let pool = create_connection_pool_with_db(&db_name).await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| Error::Migrate(Box::new(e)))?;

        Ok(Self { pool, db_name })
    }

    // Teardown function to drop database after test run (not after each test)
    pub async fn cleanup_database() -> Result<(), Error> {
        if let Some(test_db) = TEST_DB.get() {
            if let Some(db) = test_db.lock().await.take() {
                let admin_pool = create_connection_pool_without_db().await?;
                sqlx::query(&format!("DROP DATABASE IF EXISTS {}", db.db_name))
                    .execute(&admin_pool)
                    .await?;
            }
        }
        Ok(())
    }

    // Called from a #[dtor], where no runtime is running any more
    pub fn cleanup_database_sync() -> Result<(), Error> {
        if TEST_DB.get().is_none() {
            return Ok(());
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Io)?;
        runtime.block_on(Self::cleanup_database())
    }
}
