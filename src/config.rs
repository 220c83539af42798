use std::env;
use std::str::FromStr;

use dotenvy::dotenv;

use crate::reconcile::ReconcileSettings;
use crate::reconcile::discrepancy::MissingDirection;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Reconciliation
    pub missing_direction: MissingDirection,
    pub commit_concurrency: usize,
    pub comparison_cache_ttl_secs: u64,
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Unparseable setting, using default");
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),

            rate_protected_per_min: parsed_or("RATE_PROTECTED_PER_MIN", 1000),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            missing_direction: parsed_or(
                "MISSING_DIRECTION",
                MissingDirection::SpreadsheetToDatabase,
            ),
            commit_concurrency: parsed_or("COMMIT_CONCURRENCY", 4),
            comparison_cache_ttl_secs: parsed_or("COMPARISON_CACHE_TTL_SECS", 300),
        }
    }

    pub fn reconcile_settings(&self) -> ReconcileSettings {
        ReconcileSettings {
            missing_direction: self.missing_direction,
            commit_concurrency: self.commit_concurrency.max(1),
        }
    }
}
