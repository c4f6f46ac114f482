use rocket::http::ContentType;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::Request;
use rocket::Response;
use rocket_okapi::JsonSchema;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Cursor;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug, Serialize, JsonSchema)]
pub enum AppError {
    #[error("Database error")]
    DatabaseError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Validation failed")]
    InvalidFields(BTreeMap<String, Vec<String>>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not enough seats available. Only {remaining} seats remaining.")]
    CapacityExceeded { remaining: i64 },

    #[error("Could not allocate a booking code after {0} attempts")]
    CodeSpaceExhausted(u32),

    // Uniqueness violation that reached the caller; booking creation retries
    // duplicate codes itself and only surfaces CodeSpaceExhausted
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Capacity rejection. Overbooked schedules report zero seats left, never a negative count.
    pub fn capacity(remaining: i64) -> Self {
        AppError::CapacityExceeded {
            remaining: remaining.max(0),
        }
    }

    /// Single-field validation failure.
    pub fn invalid_field(field: &str, message: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), vec![message.to_string()]);
        AppError::InvalidFields(fields)
    }

    pub fn status(&self) -> Status {
        match self {
            AppError::InvalidFields(_) => Status::UnprocessableEntity,
            AppError::NotFound(_) => Status::NotFound,
            AppError::DatabaseError(_) => Status::InternalServerError,
            AppError::AuthError(_) => Status::Unauthorized,
            AppError::CapacityExceeded { .. } => Status::Conflict,
            AppError::CodeSpaceExhausted(_) => Status::ServiceUnavailable,
            AppError::Conflict(_) => Status::Conflict,
            AppError::BadRequest(_) => Status::BadRequest,
        }
    }
}

// Convert sqlx::Error (database error) to AppError::DatabaseError
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => AppError::DatabaseError(e.to_string()),
            StoreError::DuplicateBookingCode(code) => {
                AppError::Conflict(format!("Booking code {} is already taken", code))
            }
            StoreError::CapacityExceeded { remaining } => AppError::capacity(remaining),
            StoreError::ScheduleNotFound(id) => {
                AppError::NotFound(format!("Ferry schedule {} not found", id))
            }
        }
    }
}

// Field-scoped messages from #[derive(Validate)] requests
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            let messages = fields.entry(field.to_string()).or_default();
            for error in field_errors.iter() {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value ({})", error.code),
                };
                messages.push(message);
            }
        }
        AppError::InvalidFields(fields)
    }
}

// Define a type alias for the result type
pub type AppResult<T> = Result<T, AppError>;

// Format all errors from the route level into a JSON Http Response
#[rocket::async_trait]
impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, _: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = self.status();

        let body = match &self {
            AppError::InvalidFields(fields) => json!({
                "error": self.to_string(),
                "fields": fields,
            }),
            AppError::CapacityExceeded { remaining } => json!({
                "error": self.to_string(),
                "fields": { "seats": [self.to_string()] },
                "remaining_seats": remaining,
            }),
            _ => json!({
                "error": self.to_string()
            }),
        };

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(None, Cursor::new(body.to_string()))
            .ok()
    }
}
