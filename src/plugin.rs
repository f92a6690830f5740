// Host adapter: wires a validator and processor together for the host's
// request pipeline. No booking rules live here.

use crate::capabilities::{Clock, RandomSource, SystemClock, ThreadRandom};
use crate::config::{BookingConfig, ConfigError};
use crate::processor::{BookingProcessor, SharedBookingProcessor};
use crate::validator::BookingValidator;
use std::sync::Arc;
use tracing::info;

// Optional path to a JSON `BookingConfig`
pub const CONFIG_ENV_VAR: &str = "HOTEL_BOOKING_CONFIG";

pub struct BookingPlugin {
    validator: Arc<BookingValidator>,
    processor: SharedBookingProcessor,
}

impl BookingPlugin {
    pub fn init(config: BookingConfig) -> Result<Self, ConfigError> {
        Self::init_with(config, Arc::new(SystemClock), Arc::new(ThreadRandom))
    }

    pub fn init_with(
        config: BookingConfig,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let validator = Arc::new(BookingValidator::with_clock(config.clone(), clock.clone()));
        let processor = BookingProcessor::with_capabilities(
            Arc::clone(&validator),
            config,
            clock,
            random,
        );

        info!(
            rooms = validator.available_rooms().len(),
            "booking plugin initialised"
        );

        Ok(Self {
            validator,
            processor: SharedBookingProcessor::new(processor),
        })
    }

    // Config from the file named by HOTEL_BOOKING_CONFIG, defaults otherwise
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => BookingConfig::from_file(path)?,
            Err(_) => BookingConfig::default(),
        };
        Self::init(config)
    }

    pub fn validator(&self) -> &BookingValidator {
        &self.validator
    }

    pub fn processor(&self) -> SharedBookingProcessor {
        self.processor.clone()
    }
}

pub fn init_tracing() {
    let env = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingRequest, CHECK_IN, GUESTS, GUEST_NAME, ROOM_NUMBER};
    use crate::capabilities::{FixedClock, SeededRandom};
    use chrono::{TimeZone, Utc};

    fn plugin() -> BookingPlugin {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        BookingPlugin::init_with(
            BookingConfig::default(),
            Arc::new(FixedClock(now)),
            Arc::new(SeededRandom::new(5)),
        )
        .unwrap()
    }

    #[test]
    fn test_plugin_wires_validator_into_processor() {
        let plugin = plugin();
        let processor = plugin.processor();

        let booking = BookingRequest::new()
            .with(GUEST_NAME, "John Doe")
            .with(ROOM_NUMBER, "203")
            .with(CHECK_IN, "2025-06-02")
            .with(GUESTS, "4");
        assert!(processor.process(booking.clone()));
        assert!(!processor.process(booking.with(ROOM_NUMBER, "204")));

        // Handles share one store
        assert_eq!(plugin.processor().get_booking_count(), 1);
        assert_eq!(plugin.validator().available_rooms().len(), 6);
    }

    #[test]
    fn test_plugin_rejects_invalid_config() {
        let config = BookingConfig {
            available_rooms: vec![],
            ..BookingConfig::default()
        };
        assert!(matches!(
            BookingPlugin::init(config),
            Err(ConfigError::Invalid(_))
        ));
    }
}
