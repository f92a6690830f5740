// Booking processor: validates candidates, enriches the accepted ones and keeps
// them in an append-only in-memory store

use crate::booking::{
    BookingId, BookingRequest, ConfirmationCode, StoredBooking, REQUIRED_FIELDS, ROOM_NUMBER,
};
use crate::capabilities::{Clock, RandomSource, SystemClock, ThreadRandom};
use crate::config::BookingConfig;
use crate::validator::BookingValidation;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct BookingProcessor {
    validator: Box<dyn BookingValidation>,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    config: BookingConfig,
    // Insertion order is retrieval order; nothing is ever removed
    bookings: Vec<StoredBooking>,
}

impl BookingProcessor {
    pub fn new(validator: impl BookingValidation + 'static) -> Self {
        Self::with_capabilities(
            validator,
            BookingConfig::default(),
            Arc::new(SystemClock),
            Arc::new(ThreadRandom),
        )
    }

    pub fn with_capabilities(
        validator: impl BookingValidation + 'static,
        config: BookingConfig,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            validator: Box::new(validator),
            clock,
            random,
            config,
            bookings: Vec::new(),
        }
    }

    // Returns false and stores nothing when validation fails
    pub fn process(&mut self, booking: BookingRequest) -> bool {
        if !self.validator.validate(&booking) {
            debug!(room = %booking.field_text(ROOM_NUMBER), "booking not processed");
            return false;
        }

        let id = self.generate_booking_id();
        if self.bookings.iter().any(|stored| stored.id() == &id) {
            // Ids are random with no uniqueness check; this only gets logged
            warn!(%id, "generated booking id already in use");
        }

        let processed_at = self.clock.now();
        let confirmation_code =
            generate_confirmation_code(&booking, self.config.confirmation_code_len);

        let stored = StoredBooking::new(booking, id, processed_at, confirmation_code);
        info!(
            id = %stored.id(),
            room = %stored.room_number(),
            confirmation_code = %stored.confirmation_code(),
            "booking stored"
        );
        self.bookings.push(stored);

        true
    }

    pub fn get_bookings(&self) -> &[StoredBooking] {
        &self.bookings
    }

    pub fn get_booking_count(&self) -> usize {
        self.bookings.len()
    }

    // First booking in insertion order carrying exactly this code
    pub fn find_by_confirmation_code(&self, code: &str) -> Option<&StoredBooking> {
        self.bookings
            .iter()
            .find(|booking| booking.confirmation_code() == code)
    }

    fn generate_booking_id(&self) -> BookingId {
        let random = self
            .random
            .random_string(self.config.booking_id_random_len, true);
        BookingId::new(format!(
            "{}{}",
            self.config.booking_id_prefix,
            random.to_uppercase()
        ))
    }
}

// Hash of guest name, room, check-in and guest count joined without separators.
// Identical bookings get identical codes.
pub fn generate_confirmation_code(booking: &BookingRequest, length: usize) -> ConfirmationCode {
    let material: String = REQUIRED_FIELDS
        .iter()
        .map(|field| booking.field_text(field))
        .collect();

    let digest = hex::encode(Sha256::digest(material.as_bytes()));
    let prefix: String = digest.chars().take(length).collect();
    ConfirmationCode::new(prefix.to_uppercase())
}

// Processor behind a single lock for hosts that share it between threads
#[derive(Clone)]
pub struct SharedBookingProcessor {
    inner: Arc<Mutex<BookingProcessor>>,
}

impl SharedBookingProcessor {
    pub fn new(processor: BookingProcessor) -> Self {
        Self {
            inner: Arc::new(Mutex::new(processor)),
        }
    }

    pub fn process(&self, booking: BookingRequest) -> bool {
        self.inner.lock().process(booking)
    }

    pub fn get_bookings(&self) -> Vec<StoredBooking> {
        self.inner.lock().get_bookings().to_vec()
    }

    pub fn get_booking_count(&self) -> usize {
        self.inner.lock().get_booking_count()
    }

    pub fn find_by_confirmation_code(&self, code: &str) -> Option<StoredBooking> {
        self.inner.lock().find_by_confirmation_code(code).cloned()
    }
}
