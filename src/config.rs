use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_device_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    /// Shared secret the biometric terminals send in X-Api-Key.
    pub device_api_key: String,

    /// Company timezone as a fixed UTC offset in hours (America/Fortaleza is -3).
    pub tz_offset_hours: i32,

    // Punch idempotency window
    pub dedup_capacity: u64,
    pub dedup_ttl_secs: u64,

    /// Inter-message delay of the biometric sync fan-out.
    pub sync_throttle_ms: u64,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env_or("ACCESS_TOKEN_TTL", "900").parse().unwrap(),
            refresh_token_ttl: env_or("REFRESH_TOKEN_TTL", "604800").parse().unwrap(),

            rate_login_per_min: env_or("RATE_LOGIN_PER_MIN", "60").parse().unwrap(),
            rate_device_per_min: env_or("RATE_DEVICE_PER_MIN", "120").parse().unwrap(),
            rate_protected_per_min: env_or("RATE_PROTECTED_PER_MIN", "1000").parse().unwrap(),

            api_prefix: env_or("API_PREFIX", "/api/v1"),

            device_api_key: env::var("DEVICE_API_KEY").expect("DEVICE_API_KEY must be set"),

            tz_offset_hours: env_or("TZ_OFFSET_HOURS", "-3").parse().unwrap(),

            dedup_capacity: env_or("DEDUP_CAPACITY", "1000").parse().unwrap(),
            dedup_ttl_secs: env_or("DEDUP_TTL_SECS", "300").parse().unwrap(),

            sync_throttle_ms: env_or("SYNC_THROTTLE_MS", "150").parse().unwrap(),
        }
    }

    pub fn tz(&self) -> FixedOffset {
        FixedOffset::east_opt(self.tz_offset_hours * 3600).expect("TZ_OFFSET_HOURS out of range")
    }

    /// Current instant in the company timezone. All punches, period checks and
    /// future-date decisions are made against this clock.
    pub fn now_local(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.tz())
    }

    pub fn today_local(&self) -> NaiveDate {
        self.now_local().date_naive()
    }
}
