//! Seat availability and fare computation.
//!
//! Everything here is a pure function of persisted data: remaining capacity is
//! derived from the booking set on every read, never stored.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::booking::Booking;
use crate::models::route::Route;
use crate::models::schedule::Schedule;
use crate::utils::error::{AppError, AppResult};

/// Passenger totals of the non-cancelled bookings on one (schedule, date).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Occupancy {
    pub adults: i64,
    pub children: i64,
}

impl Occupancy {
    pub fn passengers(&self) -> i64 {
        self.adults + self.children
    }

    pub fn from_bookings<'a, I>(bookings: I, schedule_id: i64, travel_date: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a Booking>,
    {
        bookings
            .into_iter()
            .filter(|b| b.schedule_id == schedule_id && b.travel_date == travel_date)
            .filter(|b| b.payment_status.holds_seats())
            .fold(Occupancy::default(), |acc, b| Occupancy {
                adults: acc.adults + i64::from(b.adults_count),
                children: acc.children + i64::from(b.children_count),
            })
    }
}

/// Remaining seats. Children occupy a seat like adults. Negative when a
/// schedule has been oversold; callers treat that as zero remaining.
pub fn available_seats(total_seats: i32, occupancy: Occupancy) -> i64 {
    i64::from(total_seats) - occupancy.passengers()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitPrices {
    pub adult: Decimal,
    pub child: Decimal,
}

fn to_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Per-passenger fares: route base price scaled by the schedule multiplier,
/// rounded half-up to cents.
pub fn unit_prices(route: &Route, schedule: &Schedule) -> UnitPrices {
    UnitPrices {
        adult: to_currency(route.base_price_adult * schedule.price_multiplier),
        child: to_currency(route.base_price_child * schedule.price_multiplier),
    }
}

/// Linear in both counts: each extra adult adds exactly `prices.adult`.
pub fn total_price(prices: &UnitPrices, adults: i32, children: i32) -> Decimal {
    prices.adult * Decimal::from(adults) + prices.child * Decimal::from(children)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub adults: i32,
    pub children: i32,
    pub prices: UnitPrices,
    pub total_amount: Decimal,
    pub available_seats: i64,
}

pub fn ensure_capacity(available: i64, adults: i32, children: i32) -> AppResult<()> {
    let requested = i64::from(adults) + i64::from(children);
    if requested > available {
        return Err(AppError::capacity(available));
    }
    Ok(())
}

/// Capacity check followed by pricing. Fails with the remaining seat count when
/// the party does not fit.
pub fn validate_and_quote(
    route: &Route,
    schedule: &Schedule,
    occupancy: Occupancy,
    adults: i32,
    children: i32,
) -> AppResult<Quote> {
    let available = available_seats(schedule.total_seats, occupancy);
    ensure_capacity(available, adults, children)?;

    let prices = unit_prices(route, schedule);
    Ok(Quote {
        adults,
        children,
        total_amount: total_price(&prices, adults, children),
        prices,
        available_seats: available,
    })
}
