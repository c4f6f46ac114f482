use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use rocket_okapi::request::OpenApiFromRequest;
use serde::{Deserialize, Serialize};

use crate::config::AuthSettings;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // admin username
    pub role: String,
    pub exp: usize,
}

#[derive(Debug, OpenApiFromRequest)]
pub struct AdminUser {
    pub username: String,
}

pub fn generate_token(settings: &AuthSettings, username: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = (chrono::Utc::now() + chrono::Duration::hours(settings.token_ttl_hours))
        .timestamp() as usize;

    let claims = Claims {
        sub: username.to_string(),
        role: ADMIN_ROLE.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
}

pub fn verify_token(settings: &AuthSettings, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
    .filter(|claims| claims.role == ADMIN_ROLE)
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let settings = match request.rocket().state::<AuthSettings>() {
            Some(settings) => settings,
            None => return Outcome::Error((Status::InternalServerError, ())),
        };

        let token = match request.headers().get_one("Authorization") {
            Some(header) if header.starts_with("Bearer ") => &header[7..],
            _ => return Outcome::Error((Status::Unauthorized, ())),
        };

        match verify_token(settings, token) {
            Some(claims) => Outcome::Success(AdminUser {
                username: claims.sub,
            }),
            None => {
                tracing::warn!("rejected admin request with invalid token");
                Outcome::Error((Status::Unauthorized, ()))
            }
        }
    }
}
