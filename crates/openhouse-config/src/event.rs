//! Event-level configuration.
//!
//! # Environment Variables
//!
//! - `PUBLIC_BASE_URL`: base of the check-in URLs embedded in QR codes
//!   (default: `http://localhost:4000`)
//! - `ADMIN_PHONES`: comma separated phone numbers that are registered with
//!   the admin role (default: empty)
//! - `EVENT_UTC_OFFSET_HOURS`: offset of the event's local time zone; the
//!   calendar day used for check-in deduplication is computed in it
//!   (default: `7`)

use chrono::{FixedOffset, Offset, Utc};
use std::env;

const DEFAULT_BASE_URL: &str = "http://localhost:4000";
const DEFAULT_UTC_OFFSET_HOURS: i32 = 7;

#[derive(Clone, Debug)]
pub struct EventConfig {
    pub public_base_url: String,
    pub admin_phones: Vec<String>,
    pub utc_offset: FixedOffset,
}

impl EventConfig {
    pub fn from_env() -> Self {
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let admin_phones = env::var("ADMIN_PHONES")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let offset_hours = env::var("EVENT_UTC_OFFSET_HOURS")
            .ok()
            .and_then(|s| s.parse::<i32>().ok())
            .unwrap_or(DEFAULT_UTC_OFFSET_HOURS);

        Self {
            public_base_url,
            admin_phones,
            utc_offset: offset_from_hours(offset_hours),
        }
    }

    pub fn is_admin_phone(&self, phone: &str) -> bool {
        self.admin_phones.iter().any(|p| p == phone)
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            public_base_url: DEFAULT_BASE_URL.to_string(),
            admin_phones: Vec::new(),
            utc_offset: offset_from_hours(DEFAULT_UTC_OFFSET_HOURS),
        }
    }
}

fn offset_from_hours(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| {
        tracing::warn!(hours, "EVENT_UTC_OFFSET_HOURS out of range, falling back to UTC");
        Utc.fix()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_offset_is_bangkok() {
        let config = EventConfig::default();
        assert_eq!(config.utc_offset.local_minus_utc(), 7 * 3600);
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        assert_eq!(offset_from_hours(99).local_minus_utc(), 0);
        assert_eq!(offset_from_hours(-5).local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_is_admin_phone() {
        let config = EventConfig {
            admin_phones: vec!["0811111111".to_string()],
            ..EventConfig::default()
        };
        assert!(config.is_admin_phone("0811111111"));
        assert!(!config.is_admin_phone("0822222222"));
    }
}
