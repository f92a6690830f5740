// Business-rule configuration for validation and enrichment

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

// Hex characters in a SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub available_rooms: Vec<String>,
    pub min_guests: i64,
    pub max_guests: i64,
    pub booking_id_prefix: String,
    pub booking_id_random_len: usize,
    pub confirmation_code_len: usize,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            available_rooms: ["101", "102", "103", "201", "202", "203"]
                .iter()
                .map(|room| room.to_string())
                .collect(),
            min_guests: 1,
            max_guests: 4,
            booking_id_prefix: "BK".to_string(),
            booking_id_random_len: 6,
            confirmation_code_len: 8,
        }
    }
}

impl BookingConfig {
    // Parse and validate; missing keys fall back to the defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: BookingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.available_rooms.is_empty() {
            return Err(ConfigError::Invalid("no rooms available".to_string()));
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = self
            .available_rooms
            .iter()
            .find(|room| !seen.insert(room.as_str()))
        {
            return Err(ConfigError::Invalid(format!(
                "room {} listed more than once",
                duplicate
            )));
        }

        if self.min_guests < 1 {
            return Err(ConfigError::Invalid(format!(
                "min_guests must be at least 1, got {}",
                self.min_guests
            )));
        }

        if self.min_guests > self.max_guests {
            return Err(ConfigError::Invalid(format!(
                "min_guests {} exceeds max_guests {}",
                self.min_guests, self.max_guests
            )));
        }

        if self.confirmation_code_len == 0 || self.confirmation_code_len > DIGEST_HEX_LEN {
            return Err(ConfigError::Invalid(format!(
                "confirmation_code_len must be within 1..={}, got {}",
                DIGEST_HEX_LEN, self.confirmation_code_len
            )));
        }

        Ok(())
    }
}
