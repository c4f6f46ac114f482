use ferry_booking_system::{
    build_rocket,
    config::{AuthSettings, BookingSettings},
};
use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use rocket::serde::json::{json, Value};
use rust_decimal::Decimal;
use std::str::FromStr;

mod common {
    pub mod test_utils;
}
use common::test_utils::{memory_store_with_sailing, upcoming_date};

const ADMIN_PASSWORD: &str = "harbour-master";

// Rocket over an in-memory store with one 10-seat sailing at x1.20
async fn client() -> (Client, i64) {
    let (store, target) = memory_store_with_sailing(10, 120).await;

    let mut auth = AuthSettings::new("api-test-secret");
    auth.admin_password_hash = Some(bcrypt::hash(ADMIN_PASSWORD, 4).unwrap());

    let rocket = build_rocket(store, BookingSettings::default(), auth);
    let client = Client::tracked(rocket).await.expect("valid rocket instance");
    (client, target.schedule.id)
}

fn booking_body(schedule_id: i64, adults: i32, children: i32, method: &str) -> String {
    json!({
        "ferry_schedule_id": schedule_id,
        "travel_date": upcoming_date(30).to_string(),
        "passenger_name": "Budi Santoso",
        "passenger_email": "budi@example.com",
        "passenger_phone": "081298765432",
        "adults_count": adults,
        "children_count": children,
        "payment_method": method,
    })
    .to_string()
}

fn decimal(value: &Value) -> Decimal {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Decimal::from_str(&text).unwrap()
}

async fn post_booking(client: &Client, body: String) -> (Status, Value) {
    let response = client
        .post("/api/bookings")
        .header(ContentType::JSON)
        .body(body)
        .dispatch()
        .await;
    let status = response.status();
    (status, response.into_json::<Value>().await.unwrap())
}

async fn available_seats(client: &Client, schedule_id: i64) -> i64 {
    let response = client
        .get(format!(
            "/api/schedules/{}/availability?travel_date={}",
            schedule_id,
            upcoming_date(30)
        ))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_json::<Value>().await.unwrap();
    body["available_seats"].as_i64().unwrap()
}

async fn admin_token(client: &Client) -> String {
    let response = client
        .post("/api/admin/login")
        .header(ContentType::JSON)
        .body(json!({ "username": "admin", "password": ADMIN_PASSWORD }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_json::<Value>().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {}", token))
}

#[tokio::test]
async fn test_health_and_route_listing() {
    let (client, _) = client().await;

    let health = client.get("/api/health").dispatch().await;
    assert_eq!(health.status(), Status::Ok);
    let body = health.into_json::<Value>().await.unwrap();
    assert_eq!(body["status"], "ok");

    let routes = client.get("/api/routes").dispatch().await;
    assert_eq!(routes.status(), Status::Ok);
    let body = routes.into_json::<Value>().await.unwrap();
    let listed = body["routes"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["duration_formatted"], "12h");
    assert_eq!(decimal(&listed[0]["schedules"][0]["adult_price"]), Decimal::new(420000, 0));
}

#[tokio::test]
async fn test_create_booking_over_http() {
    let (client, schedule_id) = client().await;

    let (status, body) = post_booking(&client, booking_body(schedule_id, 1, 1, "bank_transfer")).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(decimal(&body["booking"]["total_amount"]), Decimal::new(720000, 0));
    assert_eq!(body["booking"]["payment_status"], "pending");
    assert_eq!(body["booking"]["total_passengers"], 2);
    assert!(body["booking"]["booking_code"].as_str().unwrap().starts_with("FB"));
    assert_eq!(body["bank_account"]["bank"], "Bank Mandiri");

    let (_, office) = post_booking(&client, booking_body(schedule_id, 1, 0, "office")).await;
    assert!(office["bank_account"].is_null());

    assert_eq!(available_seats(&client, schedule_id).await, 7);
}

#[tokio::test]
async fn test_capacity_error_reports_remaining_seats() {
    let (client, schedule_id) = client().await;

    let (status, _) = post_booking(&client, booking_body(schedule_id, 5, 3, "office")).await;
    assert_eq!(status, Status::Ok);

    let (status, body) = post_booking(&client, booking_body(schedule_id, 2, 1, "office")).await;
    assert_eq!(status, Status::Conflict);
    assert_eq!(body["remaining_seats"], 2);
    assert_eq!(
        body["error"],
        "Not enough seats available. Only 2 seats remaining."
    );
    assert!(body["fields"]["seats"].is_array());

    assert_eq!(available_seats(&client, schedule_id).await, 2);
}

#[tokio::test]
async fn test_invalid_requests() {
    let (client, schedule_id) = client().await;

    let mut body: Value = serde_json::from_str(&booking_body(schedule_id, 1, 0, "office")).unwrap();
    body["passenger_email"] = json!("nope");
    let (status, response) = post_booking(&client, body.to_string()).await;
    assert_eq!(status, Status::UnprocessableEntity);
    assert!(response["fields"]["passenger_email"].is_array());

    let (status, response) = post_booking(&client, "{\"ferry_schedule_id\": 1}".to_string()).await;
    assert_eq!(status, Status::UnprocessableEntity);
    assert!(response["error"].is_string());

    let (status, _) = post_booking(&client, booking_body(999, 1, 0, "office")).await;
    assert_eq!(status, Status::NotFound);

    let response = client
        .get(format!("/api/schedules/{}/availability?travel_date=15-03-2030", schedule_id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[tokio::test]
async fn test_quote_endpoint() {
    let (client, schedule_id) = client().await;

    let response = client
        .get(format!(
            "/api/schedules/{}/quote?travel_date={}&adults=1&children=1",
            schedule_id,
            upcoming_date(30)
        ))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_json::<Value>().await.unwrap();
    assert_eq!(decimal(&body["total_amount"]), Decimal::new(720000, 0));
    assert_eq!(body["available_seats"], 10);

    let response = client
        .get(format!(
            "/api/schedules/{}/quote?travel_date={}&adults=11",
            schedule_id,
            upcoming_date(30)
        ))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::UnprocessableEntity);
}

#[tokio::test]
async fn test_admin_requires_a_valid_token() {
    let (client, _) = client().await;

    let response = client.get("/api/admin/dashboard").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);
    let body = response.into_json::<Value>().await.unwrap();
    assert!(body["error"].is_string());

    let response = client
        .get("/api/admin/bookings")
        .header(bearer("not-a-token"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);

    let response = client
        .post("/api/admin/login")
        .header(ContentType::JSON)
        .body(json!({ "username": "admin", "password": "guess" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[tokio::test]
async fn test_admin_payment_review() {
    let (client, schedule_id) = client().await;
    let (_, created) = post_booking(&client, booking_body(schedule_id, 2, 1, "bank_transfer")).await;
    let booking_id = created["booking"]["id"].as_i64().unwrap();
    assert_eq!(available_seats(&client, schedule_id).await, 7);

    let token = admin_token(&client).await;

    let response = client
        .patch(format!("/api/admin/bookings/{}", booking_id))
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(json!({ "payment_status": "confirmed", "payment_notes": "Transfer received" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_json::<Value>().await.unwrap();
    assert_eq!(body["payment_status"], "confirmed");
    assert!(body["payment_confirmed_at"].is_string());
    assert_eq!(available_seats(&client, schedule_id).await, 7);

    let response = client
        .patch(format!("/api/admin/bookings/{}", booking_id))
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(json!({ "payment_status": "cancelled" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_json::<Value>().await.unwrap();
    assert!(body["payment_confirmed_at"].is_null());
    assert_eq!(body["payment_notes"], "Transfer received");
    assert_eq!(available_seats(&client, schedule_id).await, 10);

    let response = client
        .get("/api/admin/bookings?page=1")
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let page = response.into_json::<Value>().await.unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["booking_code"], created["booking"]["booking_code"]);

    let response = client
        .get("/api/admin/dashboard")
        .header(bearer(&token))
        .dispatch()
        .await;
    let dashboard = response.into_json::<Value>().await.unwrap();
    assert_eq!(dashboard["stats"]["total_bookings"], 1);
    assert_eq!(dashboard["stats"]["pending_bookings"], 0);
}
