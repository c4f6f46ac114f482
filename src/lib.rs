#[macro_use]
extern crate rocket;
extern crate rocket_okapi;

pub mod config;
pub mod db;
pub mod engine;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod swagger;
pub mod utils;

use std::sync::Arc;

use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::make_swagger_ui;

use crate::config::{AuthSettings, BookingSettings};
use crate::services::admin_service::AdminService;
use crate::services::booking_service::BookingService;
use crate::services::schedule_service::ScheduleService;
use crate::store::BookingStore;
use crate::swagger::swagger_ui;

/// Assembles the HTTP service over the given store.
pub fn build_rocket(
    store: Arc<dyn BookingStore>,
    booking: BookingSettings,
    auth: AuthSettings,
) -> Rocket<Build> {
    let schedule_service = ScheduleService::new(store.clone());
    let booking_service = BookingService::new(store, booking);
    let admin_service = AdminService::new(auth.clone());

    rocket::build()
        .manage(schedule_service)
        .manage(booking_service)
        .manage(admin_service)
        .manage(auth)
        .mount(
            "/api",
            openapi_get_routes![
                routes::health_route::health,
                routes::schedule_route::list_routes,
                routes::schedule_route::list_schedules,
                routes::schedule_route::get_availability,
                routes::schedule_route::get_quote,
                routes::booking_route::create_booking,
                routes::admin_route::login,
                routes::admin_route::dashboard,
                routes::admin_route::list_bookings,
                routes::admin_route::get_booking,
                routes::admin_route::update_booking,
            ],
        )
        .mount("/swagger", make_swagger_ui(&swagger_ui()))
        .register("/", catchers![routes::catchers::default_catcher])
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
            })
        }))
}
