use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use validator::Validate;

use crate::models::schedule::ScheduleSummary;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentMethod {
    Office,
    BankTransfer,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl PaymentStatus {
    /// Every booking except a cancelled one occupies seats.
    pub fn holds_seats(self) -> bool {
        self != PaymentStatus::Cancelled
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, JsonSchema)]
pub struct Booking {
    pub id: i64,
    pub booking_code: String,
    pub schedule_id: i64,
    pub travel_date: NaiveDate,
    pub passenger_name: String,
    pub passenger_email: String,
    pub passenger_phone: String,
    pub adults_count: i32,
    pub children_count: i32,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub payment_notes: Option<String>,
    pub payment_confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn total_passengers(&self) -> i64 {
        i64::from(self.adults_count) + i64::from(self.children_count)
    }

    /// Admin review transition. Any status may follow any other; the confirmation
    /// timestamp is stamped on every move to `confirmed` and cleared otherwise.
    /// Absent notes leave the existing notes untouched.
    pub fn apply_payment_update(&mut self, update: PaymentUpdate, now: DateTime<Utc>) {
        self.payment_status = update.status;
        self.payment_confirmed_at = match update.status {
            PaymentStatus::Confirmed => Some(now),
            PaymentStatus::Pending | PaymentStatus::Cancelled => None,
        };
        if let Some(notes) = update.notes {
            self.payment_notes = Some(notes);
        }
    }
}

// Booking ready for insertion; always starts out pending
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub booking_code: String,
    pub schedule_id: i64,
    pub travel_date: NaiveDate,
    pub passenger_name: String,
    pub passenger_email: String,
    pub passenger_phone: String,
    pub adults_count: i32,
    pub children_count: i32,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
}

impl NewBooking {
    pub fn total_passengers(&self) -> i64 {
        i64::from(self.adults_count) + i64::from(self.children_count)
    }

    pub fn into_booking(self, id: i64, created_at: DateTime<Utc>) -> Booking {
        Booking {
            id,
            booking_code: self.booking_code,
            schedule_id: self.schedule_id,
            travel_date: self.travel_date,
            passenger_name: self.passenger_name,
            passenger_email: self.passenger_email,
            passenger_phone: self.passenger_phone,
            adults_count: self.adults_count,
            children_count: self.children_count,
            total_amount: self.total_amount,
            payment_method: self.payment_method,
            payment_status: PaymentStatus::Pending,
            payment_notes: None,
            payment_confirmed_at: None,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct CreateBookingRequest {
    #[serde(alias = "ferry_schedule_id")]
    pub schedule_id: i64,

    pub travel_date: NaiveDate,

    #[validate(length(min = 1, max = 255, message = "Passenger name is required."))]
    pub passenger_name: String,

    #[validate(
        email(message = "Please enter a valid email address."),
        length(max = 255, message = "Email address is too long.")
    )]
    pub passenger_email: String,

    #[validate(length(min = 1, max = 20, message = "Phone number is required (max 20 characters)."))]
    pub passenger_phone: String,

    #[validate(range(min = 1, max = 10, message = "Between 1 and 10 adult passengers are allowed."))]
    pub adults_count: i32,

    #[serde(default)]
    #[validate(range(min = 0, max = 10, message = "Maximum 10 child passengers allowed."))]
    pub children_count: i32,

    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct UpdatePaymentRequest {
    pub payment_status: PaymentStatus,

    #[validate(length(max = 1000, message = "Payment notes cannot exceed 1000 characters."))]
    pub payment_notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PaymentUpdate {
    pub status: PaymentStatus,
    pub notes: Option<String>,
}

impl From<UpdatePaymentRequest> for PaymentUpdate {
    fn from(request: UpdatePaymentRequest) -> Self {
        PaymentUpdate {
            status: request.payment_status,
            notes: request.payment_notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BankAccount {
    pub bank: String,
    pub account_number: String,
    pub account_name: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: Booking,
    pub total_passengers: i64,
    pub schedule: ScheduleSummary,
}

impl BookingDetail {
    pub fn new(booking: Booking, schedule: ScheduleSummary) -> Self {
        BookingDetail {
            total_passengers: booking.total_passengers(),
            booking,
            schedule,
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingConfirmation {
    pub booking: BookingDetail,
    // Only present for bank transfers
    pub bank_account: Option<BankAccount>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingPage {
    pub data: Vec<BookingDetail>,
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub last_page: i64,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct DashboardStats {
    pub total_bookings: i64,
    pub pending_bookings: i64,
    pub confirmed_bookings: i64,
    pub total_routes: i64,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_bookings: Vec<BookingDetail>,
}
