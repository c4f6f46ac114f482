use chrono::NaiveDate;
use std::sync::Arc;
use validator::Validate;

use crate::engine;
use crate::models::route::{RouteDetail, RouteListResponse};
use crate::models::schedule::{
    AvailabilityResponse, PartySize, QuoteResponse, ScheduleDetail, ScheduleListResponse, ScheduleWithRoute,
};
use crate::store::BookingStore;
use crate::utils::error::{AppError, AppResult};

#[derive(Clone)]
pub struct ScheduleService {
    store: Arc<dyn BookingStore>,
}

impl ScheduleService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        ScheduleService { store }
    }

    // Active routes, each with its active schedules and their fares
    pub async fn list_routes(&self) -> AppResult<RouteListResponse> {
        let routes = self.store.active_routes().await?;

        let mut details = Vec::with_capacity(routes.len());
        for route in routes {
            let schedules = self
                .store
                .active_schedules(route.id)
                .await?
                .iter()
                .map(|schedule| ScheduleDetail::new(schedule, &route))
                .collect();
            details.push(RouteDetail::new(&route, schedules));
        }

        Ok(RouteListResponse { routes: details })
    }

    pub async fn list_schedules(&self, route_id: i64) -> AppResult<ScheduleListResponse> {
        let route = self
            .store
            .find_route(route_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ferry route not found".into()))?;

        let schedules = self
            .store
            .active_schedules(route.id)
            .await?
            .iter()
            .map(|schedule| ScheduleDetail::new(schedule, &route))
            .collect();

        Ok(ScheduleListResponse { schedules })
    }

    pub async fn find_schedule(&self, schedule_id: i64) -> AppResult<ScheduleWithRoute> {
        self.store
            .find_schedule(schedule_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ferry schedule not found".into()))
    }

    // Seat counts stay readable for inactive sailings; existing bookings still hold them
    pub async fn get_availability(
        &self,
        schedule_id: i64,
        travel_date: NaiveDate,
    ) -> AppResult<AvailabilityResponse> {
        let target = self.find_schedule(schedule_id).await?;
        let occupancy = self.store.occupancy(schedule_id, travel_date).await?;
        let available = engine::available_seats(target.schedule.total_seats, occupancy);

        Ok(AvailabilityResponse {
            schedule_id,
            travel_date,
            total_seats: target.schedule.total_seats,
            booked_seats: occupancy.passengers(),
            available_seats: available.max(0),
        })
    }

    /// Prices a party on one sailing, refusing sailings that take no bookings
    /// and parties that no longer fit.
    pub async fn quote(
        &self,
        schedule_id: i64,
        travel_date: NaiveDate,
        party: PartySize,
    ) -> AppResult<QuoteResponse> {
        party.validate()?;

        let target = self.find_schedule(schedule_id).await?;
        if !target.is_bookable() {
            return Err(AppError::invalid_field(
                "schedule_id",
                "The selected ferry schedule is not available for booking.",
            ));
        }

        let occupancy = self.store.occupancy(schedule_id, travel_date).await?;
        let quote = engine::validate_and_quote(
            &target.route,
            &target.schedule,
            occupancy,
            party.adults,
            party.children,
        )?;

        Ok(QuoteResponse::new(schedule_id, travel_date, &quote))
    }
}
