use bcrypt::verify;

use crate::config::AuthSettings;
use crate::models::admin::{AdminLoginRequest, AdminLoginResponse};
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt;

pub struct AdminService {
    settings: AuthSettings,
}

impl AdminService {
    pub fn new(settings: AuthSettings) -> Self {
        AdminService { settings }
    }

    // Login the configured admin account
    pub fn login(&self, request: AdminLoginRequest) -> AppResult<AdminLoginResponse> {
        let password_hash = match &self.settings.admin_password_hash {
            Some(hash) => hash,
            None => {
                tracing::warn!("admin login attempted but no admin password is configured");
                return Err(AppError::AuthError("Invalid credentials".into()));
            }
        };

        if request.username != self.settings.admin_username {
            return Err(AppError::AuthError("Invalid credentials".into()));
        }

        // Verify password
        let password_matches = verify(request.password.as_bytes(), password_hash)
            .map_err(|e| AppError::AuthError(e.to_string()))?;

        if !password_matches {
            tracing::warn!(username = %request.username, "admin login failed");
            return Err(AppError::AuthError("Invalid credentials".into()));
        }

        // Generate JWT token
        let token = jwt::generate_token(&self.settings, &request.username)
            .map_err(|e| AppError::AuthError(e.to_string()))?;

        tracing::info!(username = %request.username, "admin logged in");

        Ok(AdminLoginResponse {
            token,
            expires_in: self.settings.token_ttl_hours * 3600,
        })
    }
}
