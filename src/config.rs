use std::env;
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::models::booking::BankAccount;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StorageBackend {
    Mysql,
    Memory,
}

/// How a booking's capacity check and insert are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ReservationMode {
    /// Check and insert in one locked transaction per schedule. Never oversells.
    Serializable,
    /// Separate read then write. Two racing requests can both take the last seats.
    Unguarded,
}

#[derive(Debug, Clone)]
pub struct BookingSettings {
    pub reservation_mode: ReservationMode,
    pub max_code_attempts: u32,
    pub bank_account: BankAccount,
}

impl Default for BookingSettings {
    fn default() -> Self {
        BookingSettings {
            reservation_mode: ReservationMode::Serializable,
            max_code_attempts: 1000,
            bank_account: BankAccount {
                bank: "Bank Mandiri".to_string(),
                account_number: "1610003228298".to_string(),
                account_name: "Ferry Booking System".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub admin_username: String,
    // bcrypt hash; admin login is refused while unset
    pub admin_password_hash: Option<String>,
    pub token_ttl_hours: i64,
}

impl AuthSettings {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        AuthSettings {
            jwt_secret: jwt_secret.into(),
            admin_username: "admin".to_string(),
            admin_password_hash: None,
            token_ttl_hours: 24,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub run_migrations: bool,
    pub seed_catalog: bool,
    pub booking: BookingSettings,
    pub auth: AuthSettings,
}

fn var(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var: name, value }),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let storage = parse_var("STORAGE_BACKEND", StorageBackend::Mysql)?;
        let database_url = var("DATABASE_URL");
        if storage == StorageBackend::Mysql && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let defaults = BookingSettings::default();
        let booking = BookingSettings {
            reservation_mode: parse_var("RESERVATION_MODE", defaults.reservation_mode)?,
            max_code_attempts: parse_var("MAX_CODE_ATTEMPTS", defaults.max_code_attempts)?,
            bank_account: BankAccount {
                bank: var("BANK_NAME").unwrap_or(defaults.bank_account.bank),
                account_number: var("BANK_ACCOUNT_NUMBER")
                    .unwrap_or(defaults.bank_account.account_number),
                account_name: var("BANK_ACCOUNT_NAME").unwrap_or(defaults.bank_account.account_name),
            },
        };
        if booking.max_code_attempts == 0 {
            return Err(ConfigError::Invalid {
                var: "MAX_CODE_ATTEMPTS",
                value: "0".to_string(),
            });
        }

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let auth = AuthSettings {
            admin_username: var("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
            admin_password_hash: var("ADMIN_PASSWORD_HASH"),
            token_ttl_hours: parse_var("ADMIN_TOKEN_TTL_HOURS", 24)?,
            jwt_secret,
        };

        Ok(AppConfig {
            storage,
            database_url,
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
            run_migrations: parse_var("RUN_MIGRATIONS", true)?,
            seed_catalog: parse_var("SEED_CATALOG", false)?,
            booking,
            auth,
        })
    }
}
