use chrono::{Duration, NaiveTime};
use rust_decimal::Decimal;

use crate::models::route::{NewRoute, TravelDuration};
use crate::models::schedule::NewSchedule;
use crate::store::{BookingStore, StoreResult};

struct SailingTemplate {
    ferry_name: &'static str,
    departure: (u32, u32),
    total_seats: i32,
    // hundredths
    multiplier: i64,
}

const SAILINGS: [SailingTemplate; 2] = [
    SailingTemplate {
        ferry_name: "Sea Explorer",
        departure: (8, 0),
        total_seats: 150,
        multiplier: 100,
    },
    SailingTemplate {
        ferry_name: "Ocean Breeze",
        departure: (14, 0),
        total_seats: 120,
        multiplier: 120,
    },
];

#[allow(clippy::too_many_arguments)]
fn demo_route(
    name: &str,
    origin: &str,
    destination: &str,
    adult: i64,
    child: i64,
    duration: TravelDuration,
    facilities: &[&str],
    policy: &str,
) -> NewRoute {
    NewRoute {
        name: name.to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        base_price_adult: Decimal::new(adult, 0),
        base_price_child: Decimal::new(child, 0),
        duration,
        facilities: facilities.iter().map(|f| f.to_string()).collect(),
        cancellation_policy: Some(policy.to_string()),
        is_active: true,
    }
}

pub fn demo_routes() -> Vec<NewRoute> {
    vec![
        demo_route(
            "Jakarta - Batam",
            "Jakarta",
            "Batam",
            350000,
            250000,
            TravelDuration::new(12, 0),
            &["Air Conditioning", "Comfortable Seating", "Onboard Restaurant", "Entertainment System", "WiFi"],
            "Free cancellation up to 24 hours before departure. 50% refund for cancellations within 24 hours.",
        ),
        demo_route(
            "Batam - Singapore",
            "Batam",
            "Singapore",
            180000,
            120000,
            TravelDuration::new(1, 30),
            &["Air Conditioning", "Comfortable Seating", "Life Jackets", "Onboard Toilet"],
            "Cancellation allowed up to 2 hours before departure with 80% refund.",
        ),
        demo_route(
            "Tanjung Pinang - Bintan",
            "Tanjung Pinang",
            "Bintan",
            45000,
            30000,
            TravelDuration::new(0, 45),
            &["Life Jackets", "Basic Seating", "Onboard Toilet"],
            "No refund for cancellations within 1 hour of departure.",
        ),
    ]
}

/// Arrival time of a daily sailing, wrapping past midnight.
pub fn arrival_after(departure: NaiveTime, duration: TravelDuration) -> NaiveTime {
    let (arrival, _) = departure.overflowing_add_signed(Duration::minutes(duration.total_minutes()));
    arrival
}

/// Inserts the demo catalog: three routes with two daily sailings each.
pub async fn seed_catalog(store: &dyn BookingStore) -> StoreResult<()> {
    for new_route in demo_routes() {
        let route = store.insert_route(new_route).await?;

        for sailing in SAILINGS.iter() {
            let (hour, minute) = sailing.departure;
            let departure_time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();

            store
                .insert_schedule(NewSchedule {
                    route_id: route.id,
                    ferry_name: sailing.ferry_name.to_string(),
                    departure_time,
                    arrival_time: arrival_after(departure_time, route.duration),
                    total_seats: sailing.total_seats,
                    price_multiplier: Decimal::new(sailing.multiplier, 2),
                    is_active: true,
                })
                .await?;
        }

        tracing::info!(route = %route.name, "seeded route");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn arrival_wraps_past_midnight() {
        let departure = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        assert_eq!(
            arrival_after(departure, TravelDuration::new(12, 0)),
            NaiveTime::from_hms_opt(2, 0, 0).unwrap()
        );
        assert_eq!(
            arrival_after(NaiveTime::from_hms_opt(8, 0, 0).unwrap(), TravelDuration::new(1, 30)),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn seeds_three_routes_with_two_sailings_each() {
        let store = MemoryStore::new();
        seed_catalog(&store).await.unwrap();

        let routes = store.active_routes().await.unwrap();
        assert_eq!(routes.len(), 3);
        for route in routes {
            let schedules = store.active_schedules(route.id).await.unwrap();
            assert_eq!(schedules.len(), 2);
            assert_eq!(schedules[0].ferry_name, "Sea Explorer");
            assert_eq!(schedules[1].price_multiplier, Decimal::new(120, 2));
        }
    }
}
