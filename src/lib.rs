// Hotel booking validation and in-memory booking records

pub mod booking;
pub mod capabilities;
pub mod config;
pub mod plugin;
pub mod processor;
pub mod validator;

// Re-export key types for convenience
pub use booking::{BookingId, BookingRequest, ConfirmationCode, StoredBooking};
pub use capabilities::{
    Clock, FixedClock, FixedRandom, RandomSource, SeededRandom, SystemClock, ThreadRandom,
};
pub use config::{BookingConfig, ConfigError};
pub use plugin::{init_tracing, BookingPlugin};
pub use processor::{generate_confirmation_code, BookingProcessor, SharedBookingProcessor};
pub use validator::{BookingValidation, BookingValidator, Rejection};
