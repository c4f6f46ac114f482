use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

use crate::config::{BookingSettings, ReservationMode};
use crate::engine;
use crate::models::booking::{
    Booking, BookingConfirmation, BookingDetail, BookingPage, CreateBookingRequest, DashboardResponse,
    DashboardStats, NewBooking, PaymentMethod, PaymentStatus, UpdatePaymentRequest,
};
use crate::models::schedule::ScheduleSummary;
use crate::store::{BookingStore, StoreError};
use crate::utils::booking_code;
use crate::utils::error::{AppError, AppResult};

pub const PER_PAGE: i64 = 20;
const RECENT_BOOKINGS: i64 = 10;
// Inserts retried after a code collides at the unique index
const MAX_INSERT_ATTEMPTS: u32 = 3;

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    settings: BookingSettings,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>, settings: BookingSettings) -> Self {
        BookingService { store, settings }
    }

    pub async fn create_booking(&self, request: CreateBookingRequest) -> AppResult<BookingConfirmation> {
        self.create_booking_on(request, Local::now().date_naive()).await
    }

    /// Creates a pending booking with a frozen quote. Everything is validated
    /// before the single write, so a rejected request leaves the ledger untouched.
    pub async fn create_booking_on(
        &self,
        request: CreateBookingRequest,
        today: NaiveDate,
    ) -> AppResult<BookingConfirmation> {
        request.validate()?;
        if request.travel_date < today {
            return Err(AppError::invalid_field(
                "travel_date",
                "Travel date must be today or later.",
            ));
        }

        let target = self
            .store
            .find_schedule(request.schedule_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ferry schedule not found".into()))?;

        if !target.is_bookable() {
            return Err(AppError::invalid_field(
                "schedule_id",
                "The selected ferry schedule is not available for booking.",
            ));
        }

        let prices = engine::unit_prices(&target.route, &target.schedule);
        let total_amount = engine::total_price(&prices, request.adults_count, request.children_count);

        if self.settings.reservation_mode == ReservationMode::Unguarded {
            // Read-then-write: a concurrent request can pass the same check
            let occupancy = self
                .store
                .occupancy(request.schedule_id, request.travel_date)
                .await?;
            let available = engine::available_seats(target.schedule.total_seats, occupancy);
            if let Err(e) = engine::ensure_capacity(available, request.adults_count, request.children_count) {
                tracing::info!(
                    schedule_id = request.schedule_id,
                    travel_date = %request.travel_date,
                    available,
                    "booking rejected, not enough seats"
                );
                return Err(e);
            }
        }

        let new_booking = NewBooking {
            booking_code: String::new(),
            schedule_id: request.schedule_id,
            travel_date: request.travel_date,
            passenger_name: request.passenger_name,
            passenger_email: request.passenger_email,
            passenger_phone: request.passenger_phone,
            adults_count: request.adults_count,
            children_count: request.children_count,
            total_amount,
            payment_method: request.payment_method,
        };

        let booking = self.store_booking(new_booking).await?;

        tracing::info!(
            booking_id = booking.id,
            booking_code = %booking.booking_code,
            schedule_id = booking.schedule_id,
            travel_date = %booking.travel_date,
            passengers = booking.total_passengers(),
            total_amount = %booking.total_amount,
            "booking created"
        );

        let bank_account = match booking.payment_method {
            PaymentMethod::BankTransfer => Some(self.settings.bank_account.clone()),
            PaymentMethod::Office => None,
        };

        Ok(BookingConfirmation {
            booking: BookingDetail::new(booking, ScheduleSummary::from(&target)),
            bank_account,
        })
    }

    // Picks a free code and writes the booking, drawing a new code if another
    // request took the same one between the check and the insert.
    async fn store_booking(&self, mut booking: NewBooking) -> AppResult<Booking> {
        let mut rng = StdRng::from_entropy();

        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let store = self.store.clone();
            booking.booking_code =
                booking_code::generate_unique(&mut rng, self.settings.max_code_attempts, |code| {
                    let store = store.clone();
                    async move { store.booking_code_exists(&code).await.map_err(AppError::from) }
                })
                .await?;

            let result = match self.settings.reservation_mode {
                ReservationMode::Serializable => self.store.reserve_booking(booking.clone()).await,
                ReservationMode::Unguarded => self.store.insert_booking(booking.clone()).await,
            };

            match result {
                Ok(created) => return Ok(created),
                Err(StoreError::DuplicateBookingCode(code)) => {
                    tracing::warn!(attempt, code = %code, "booking code collided on insert, retrying");
                }
                Err(StoreError::CapacityExceeded { remaining }) => {
                    tracing::info!(
                        schedule_id = booking.schedule_id,
                        travel_date = %booking.travel_date,
                        remaining,
                        "booking rejected, not enough seats"
                    );
                    return Err(AppError::capacity(remaining));
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::error!(attempts = MAX_INSERT_ATTEMPTS, "booking insert kept colliding on booking code");
        Err(AppError::CodeSpaceExhausted(MAX_INSERT_ATTEMPTS))
    }

    pub async fn get_booking(&self, booking_id: i64) -> AppResult<BookingDetail> {
        let booking = self
            .store
            .find_booking(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        let mut details = self.with_schedules(vec![booking]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::NotFound("Ferry schedule not found".into()))
    }

    /// Admin review. Cancelling releases the booking's seats at once because
    /// availability only counts non-cancelled bookings.
    pub async fn update_payment_status(
        &self,
        booking_id: i64,
        request: UpdatePaymentRequest,
        reviewed_by: &str,
    ) -> AppResult<BookingDetail> {
        request.validate()?;

        let booking = self
            .store
            .update_payment(booking_id, request.into())
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        tracing::info!(
            booking_id,
            booking_code = %booking.booking_code,
            status = %booking.payment_status,
            reviewed_by,
            "payment status updated"
        );

        let mut details = self.with_schedules(vec![booking]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::NotFound("Ferry schedule not found".into()))
    }

    pub async fn list_bookings(&self, page: i64) -> AppResult<BookingPage> {
        let page = page.max(1);
        let total = self.store.count_bookings(None).await?;
        let bookings = self
            .store
            .list_bookings((page - 1) * PER_PAGE, PER_PAGE)
            .await?;

        Ok(BookingPage {
            data: self.with_schedules(bookings).await?,
            current_page: page,
            per_page: PER_PAGE,
            total,
            last_page: ((total + PER_PAGE - 1) / PER_PAGE).max(1),
        })
    }

    pub async fn dashboard(&self) -> AppResult<DashboardResponse> {
        let stats = DashboardStats {
            total_bookings: self.store.count_bookings(None).await?,
            pending_bookings: self.store.count_bookings(Some(PaymentStatus::Pending)).await?,
            confirmed_bookings: self.store.count_bookings(Some(PaymentStatus::Confirmed)).await?,
            total_routes: self.store.count_active_routes().await?,
        };

        let recent = self.store.list_bookings(0, RECENT_BOOKINGS).await?;

        Ok(DashboardResponse {
            stats,
            recent_bookings: self.with_schedules(recent).await?,
        })
    }

    // Attach schedule + route to each booking, loading every schedule once
    async fn with_schedules(&self, bookings: Vec<Booking>) -> AppResult<Vec<BookingDetail>> {
        let mut summaries: HashMap<i64, ScheduleSummary> = HashMap::new();
        let mut details = Vec::with_capacity(bookings.len());

        for booking in bookings {
            if !summaries.contains_key(&booking.schedule_id) {
                match self.store.find_schedule(booking.schedule_id).await? {
                    Some(target) => {
                        summaries.insert(booking.schedule_id, ScheduleSummary::from(&target));
                    }
                    None => {
                        tracing::warn!(
                            booking_id = booking.id,
                            schedule_id = booking.schedule_id,
                            "booking references a missing schedule"
                        );
                        continue;
                    }
                }
            }

            if let Some(summary) = summaries.get(&booking.schedule_id) {
                details.push(BookingDetail::new(booking, summary.clone()));
            }
        }

        Ok(details)
    }
}
