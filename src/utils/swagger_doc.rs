use crate::utils::error::AppError;
use indexmap::IndexMap;
use okapi::openapi3::SchemaObject;
use rocket::http::Status;
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::RefOr;
use rocket_okapi::okapi::openapi3::{MediaType, Response, Responses};
use rocket_okapi::response::OpenApiResponderInner;
use serde_json::json;
use std::collections::BTreeMap;

impl OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        let mut responses = Responses::default();

        let mut fields = BTreeMap::new();
        fields.insert(
            "passenger_email".to_string(),
            vec!["Please enter a valid email address.".to_string()],
        );

        // Define error responses
        let error_responses = [
            (Status::BadRequest, "Bad Request", AppError::BadRequest("Invalid travel date format".to_string())),
            (Status::Unauthorized, "Unauthorized", AppError::AuthError("Invalid credentials".to_string())),
            (Status::NotFound, "NotFound", AppError::NotFound("Ferry schedule not found".to_string())),
            (Status::Conflict, "Not enough seats", AppError::capacity(2)),
            (Status::UnprocessableEntity, "Validation failed", AppError::InvalidFields(fields)),
            (Status::InternalServerError, "InternalServerError", AppError::DatabaseError("Internal ServerError".to_string())),
            (Status::ServiceUnavailable, "ServiceUnavailable", AppError::CodeSpaceExhausted(1000)),
        ];

        for (status, description, error) in error_responses {
            let example = match &error {
                AppError::InvalidFields(fields) => json!({
                    "error": error.to_string(),
                    "fields": fields,
                }),
                AppError::CapacityExceeded { remaining } => json!({
                    "error": error.to_string(),
                    "remaining_seats": remaining,
                }),
                _ => json!({
                    "error": error.to_string()
                }),
            };

            responses.responses.insert(
                status.code.to_string(),
                RefOr::Object(Response {
                    description: description.to_string(),
                    content: {
                        let mut content = IndexMap::new();
                        content.insert(
                            "application/json".to_string(),
                            MediaType {
                                schema: Some(SchemaObject::default()),
                                example: Some(example),
                                ..Default::default()
                            },
                        );
                        content
                    },
                    ..Default::default()
                }),
            );
        }

        Ok(responses)
    }
}
