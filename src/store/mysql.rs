use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{Executor, MySql, MySqlPool};

use crate::engine::{self, Occupancy};
use crate::models::booking::{Booking, NewBooking, PaymentStatus, PaymentUpdate};
use crate::models::route::{NewRoute, Route, RouteRow};
use crate::models::schedule::{NewSchedule, Schedule, ScheduleWithRoute};
use crate::store::{BookingStore, StoreError, StoreResult};

const ROUTE_COLUMNS: &str = r#"
    id, name, origin, destination, base_price_adult, base_price_child,
    duration_hours, duration_minutes, facilities, cancellation_policy, is_active
"#;

const SCHEDULE_COLUMNS: &str = r#"
    id, ferry_route_id AS route_id, ferry_name, departure_time, arrival_time,
    total_seats, price_multiplier, is_active
"#;

const BOOKING_COLUMNS: &str = r#"
    id, booking_code, ferry_schedule_id AS schedule_id, travel_date,
    passenger_name, passenger_email, passenger_phone, adults_count, children_count,
    total_amount, payment_method, payment_status, payment_notes,
    payment_confirmed_at, created_at
"#;

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlStore { pool }
    }
}

fn insert_error(err: sqlx::Error, code: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateBookingCode(code.to_string())
        }
        _ => StoreError::Database(err),
    }
}

async fn occupancy_with<'c, E>(
    executor: E,
    schedule_id: i64,
    travel_date: NaiveDate,
) -> StoreResult<Occupancy>
where
    E: Executor<'c, Database = MySql>,
{
    let (adults, children): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            CAST(COALESCE(SUM(adults_count), 0) AS SIGNED),
            CAST(COALESCE(SUM(children_count), 0) AS SIGNED)
        FROM ferry_bookings
        WHERE ferry_schedule_id = ?
        AND travel_date = ?
        AND payment_status <> 'cancelled'
        "#,
    )
    .bind(schedule_id)
    .bind(travel_date)
    .fetch_one(executor)
    .await?;

    Ok(Occupancy { adults, children })
}

async fn insert_with<'c, E>(executor: E, booking: &NewBooking) -> StoreResult<i64>
where
    E: Executor<'c, Database = MySql>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO ferry_bookings
        (booking_code, ferry_schedule_id, travel_date, passenger_name, passenger_email,
            passenger_phone, adults_count, children_count, total_amount,
            payment_method, payment_status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(booking.booking_code.clone())
    .bind(booking.schedule_id)
    .bind(booking.travel_date)
    .bind(booking.passenger_name.clone())
    .bind(booking.passenger_email.clone())
    .bind(booking.passenger_phone.clone())
    .bind(booking.adults_count)
    .bind(booking.children_count)
    .bind(booking.total_amount)
    .bind(booking.payment_method)
    .bind(PaymentStatus::Pending)
    .execute(executor)
    .await
    .map_err(|e| insert_error(e, &booking.booking_code))?;

    Ok(result.last_insert_id() as i64)
}

async fn fetch_booking_with<'c, E>(executor: E, booking_id: i64) -> StoreResult<Option<Booking>>
where
    E: Executor<'c, Database = MySql>,
{
    let booking = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {} FROM ferry_bookings WHERE id = ?",
        BOOKING_COLUMNS
    ))
    .bind(booking_id)
    .fetch_optional(executor)
    .await?;

    Ok(booking)
}

#[async_trait]
impl BookingStore for MySqlStore {
    async fn insert_route(&self, route: NewRoute) -> StoreResult<Route> {
        let facilities = serde_json::to_string(&route.facilities).unwrap_or_else(|_| "[]".into());

        let result = sqlx::query(
            r#"
            INSERT INTO ferry_routes
            (name, origin, destination, base_price_adult, base_price_child,
                duration_hours, duration_minutes, facilities, cancellation_policy, is_active)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(route.name.clone())
        .bind(route.origin.clone())
        .bind(route.destination.clone())
        .bind(route.base_price_adult)
        .bind(route.base_price_child)
        .bind(route.duration.hours)
        .bind(route.duration.minutes)
        .bind(facilities)
        .bind(route.cancellation_policy.clone())
        .bind(route.is_active)
        .execute(&self.pool)
        .await?;

        Ok(route.into_route(result.last_insert_id() as i64))
    }

    async fn insert_schedule(&self, schedule: NewSchedule) -> StoreResult<Schedule> {
        let result = sqlx::query(
            r#"
            INSERT INTO ferry_schedules
            (ferry_route_id, ferry_name, departure_time, arrival_time,
                total_seats, price_multiplier, is_active)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(schedule.route_id)
        .bind(schedule.ferry_name.clone())
        .bind(schedule.departure_time)
        .bind(schedule.arrival_time)
        .bind(schedule.total_seats)
        .bind(schedule.price_multiplier)
        .bind(schedule.is_active)
        .execute(&self.pool)
        .await?;

        Ok(schedule.into_schedule(result.last_insert_id() as i64))
    }

    async fn count_routes(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ferry_routes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_active_routes(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ferry_routes WHERE is_active = TRUE")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn active_routes(&self) -> StoreResult<Vec<Route>> {
        let rows = sqlx::query_as::<_, RouteRow>(&format!(
            "SELECT {} FROM ferry_routes WHERE is_active = TRUE ORDER BY id",
            ROUTE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Route::from).collect())
    }

    async fn find_route(&self, route_id: i64) -> StoreResult<Option<Route>> {
        let row = sqlx::query_as::<_, RouteRow>(&format!(
            "SELECT {} FROM ferry_routes WHERE id = ?",
            ROUTE_COLUMNS
        ))
        .bind(route_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Route::from))
    }

    async fn active_schedules(&self, route_id: i64) -> StoreResult<Vec<Schedule>> {
        let schedules = sqlx::query_as::<_, Schedule>(&format!(
            r#"
            SELECT {} FROM ferry_schedules
            WHERE ferry_route_id = ? AND is_active = TRUE
            ORDER BY departure_time, id
            "#,
            SCHEDULE_COLUMNS
        ))
        .bind(route_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(schedules)
    }

    async fn find_schedule(&self, schedule_id: i64) -> StoreResult<Option<ScheduleWithRoute>> {
        let schedule = sqlx::query_as::<_, Schedule>(&format!(
            "SELECT {} FROM ferry_schedules WHERE id = ?",
            SCHEDULE_COLUMNS
        ))
        .bind(schedule_id)
        .fetch_optional(&self.pool)
        .await?;

        let schedule = match schedule {
            Some(schedule) => schedule,
            None => return Ok(None),
        };

        // ferry_route_id is a foreign key, so the route is always there
        let route = self.find_route(schedule.route_id).await?;
        Ok(route.map(|route| ScheduleWithRoute { schedule, route }))
    }

    async fn occupancy(&self, schedule_id: i64, travel_date: NaiveDate) -> StoreResult<Occupancy> {
        occupancy_with(&self.pool, schedule_id, travel_date).await
    }

    async fn booking_code_exists(&self, code: &str) -> StoreResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT id FROM ferry_bookings WHERE booking_code = ? LIMIT 1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    async fn insert_booking(&self, booking: NewBooking) -> StoreResult<Booking> {
        let booking_id = insert_with(&self.pool, &booking).await?;
        fetch_booking_with(&self.pool, booking_id)
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn reserve_booking(&self, booking: NewBooking) -> StoreResult<Booking> {
        let mut tx = self.pool.begin().await?;

        // Lock the schedule row so concurrent reservations on it queue up here
        let total_seats: Option<i32> =
            sqlx::query_scalar("SELECT total_seats FROM ferry_schedules WHERE id = ? FOR UPDATE")
                .bind(booking.schedule_id)
                .fetch_optional(&mut *tx)
                .await?;

        let total_seats = match total_seats {
            Some(total_seats) => total_seats,
            None => {
                tx.rollback().await?;
                return Err(StoreError::ScheduleNotFound(booking.schedule_id));
            }
        };

        let occupancy = occupancy_with(&mut *tx, booking.schedule_id, booking.travel_date).await?;
        let remaining = engine::available_seats(total_seats, occupancy);
        if booking.total_passengers() > remaining {
            tx.rollback().await?;
            return Err(StoreError::CapacityExceeded { remaining });
        }

        let booking_id = match insert_with(&mut *tx, &booking).await {
            Ok(booking_id) => booking_id,
            Err(e) => {
                tx.rollback().await?;
                return Err(e);
            }
        };

        let created = fetch_booking_with(&mut *tx, booking_id)
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find_booking(&self, booking_id: i64) -> StoreResult<Option<Booking>> {
        fetch_booking_with(&self.pool, booking_id).await
    }

    async fn update_payment(&self, booking_id: i64, update: PaymentUpdate) -> StoreResult<Option<Booking>> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM ferry_bookings WHERE id = ? FOR UPDATE",
            BOOKING_COLUMNS
        ))
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?;

        let mut booking = match booking {
            Some(booking) => booking,
            None => {
                tx.rollback().await?;
                return Ok(None);
            }
        };

        booking.apply_payment_update(update, Utc::now());

        sqlx::query(
            r#"
            UPDATE ferry_bookings
            SET payment_status = ?,
                payment_notes = ?,
                payment_confirmed_at = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(booking.payment_status)
        .bind(booking.payment_notes.clone())
        .bind(booking.payment_confirmed_at)
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

        // Read back so timestamps carry the column's precision
        let updated = fetch_booking_with(&mut *tx, booking_id).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn list_bookings(&self, offset: i64, limit: i64) -> StoreResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM ferry_bookings ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            BOOKING_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn count_bookings(&self, status: Option<PaymentStatus>) -> StoreResult<i64> {
        let count: i64 = match status {
            Some(status) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM ferry_bookings WHERE payment_status = ?")
                    .bind(status)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM ferry_bookings")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }
}
