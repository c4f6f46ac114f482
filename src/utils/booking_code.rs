use rand::Rng;
use std::future::Future;

use crate::utils::error::{AppError, AppResult};

pub const PREFIX: &str = "FB";
pub const CODE_LEN: usize = 10;
const MIN_SERIAL: u32 = 10_000_000;
const MAX_SERIAL: u32 = 99_999_999;

/// One random candidate: "FB" followed by eight digits.
pub fn candidate<R: Rng>(rng: &mut R) -> String {
    format!("{}{}", PREFIX, rng.gen_range(MIN_SERIAL..=MAX_SERIAL))
}

pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LEN
        && code.starts_with(PREFIX)
        && code[PREFIX.len()..].bytes().all(|b| b.is_ascii_digit())
        && !code[PREFIX.len()..].starts_with('0')
}

/// Draws candidates until `exists` reports one as free, giving up after
/// `max_attempts` draws.
pub async fn generate_unique<R, F, Fut>(rng: &mut R, max_attempts: u32, mut exists: F) -> AppResult<String>
where
    R: Rng,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = AppResult<bool>>,
{
    for attempt in 1..=max_attempts {
        let code = candidate(rng);
        if !exists(code.clone()).await? {
            return Ok(code);
        }
        tracing::debug!(attempt, code = %code, "booking code already taken, drawing again");
    }

    tracing::error!(max_attempts, "booking code space exhausted");
    Err(AppError::CodeSpaceExhausted(max_attempts))
}
