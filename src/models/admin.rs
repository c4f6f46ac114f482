use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, JsonSchema)]
#[schemars(example = "AdminLoginResponse::example")]
pub struct AdminLoginResponse {
    #[schemars(title = "Bearer token")]
    pub token: String,

    #[schemars(title = "Seconds until expiry")]
    pub expires_in: i64,
}

impl AdminLoginResponse {
    pub fn example() -> Self {
        Self {
            token: "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9...".to_string(),
            expires_in: 86400,
        }
    }
}
