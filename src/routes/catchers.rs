use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::Request;

// Framework-level failures (bad JSON, missing guards, unknown paths) in the
// same JSON shape as AppError responses
#[catch(default)]
pub fn default_catcher(status: Status, request: &Request) -> status::Custom<Json<Value>> {
    let message = match status.code {
        401 => "Authentication error: missing or invalid admin token".to_string(),
        404 => format!("Not found: {}", request.uri().path()),
        422 => "Validation failed: request body is malformed or has invalid values".to_string(),
        _ => status.reason().unwrap_or("Unknown error").to_string(),
    };

    status::Custom(status, Json(json!({ "error": message })))
}
