// Booking records: the loosely typed candidate a host submits and the
// enriched record the processor keeps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

pub const GUEST_NAME: &str = "guest_name";
pub const ROOM_NUMBER: &str = "room_number";
pub const CHECK_IN: &str = "check_in";
pub const GUESTS: &str = "guests";

pub const ID: &str = "id";
pub const PROCESSED_AT: &str = "processed_at";
pub const CONFIRMATION_CODE: &str = "confirmation_code";

// Fields every candidate must carry, in the order they are checked and hashed
pub const REQUIRED_FIELDS: [&str; 4] = [GUEST_NAME, ROOM_NUMBER, CHECK_IN, GUESTS];

pub const CHECK_IN_FORMAT: &str = "%Y-%m-%d";
pub const PROCESSED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Candidate booking as submitted by the host. Values keep whatever JSON type
// the caller used; the validator decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingRequest(Map<String, Value>);

impl BookingRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn without(mut self, field: &str) -> Self {
        self.0.remove(field);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    // Text form of a field the way it takes part in the confirmation code
    pub fn field_text(&self, field: &str) -> String {
        match self.get(field) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
            Some(Value::Bool(true)) => "1".to_string(),
            Some(Value::String(text)) => text.clone(),
            // Floats print without a trailing ".0" when whole
            Some(Value::Number(number)) => match number.as_f64() {
                Some(float) if number.is_f64() => float.to_string(),
                _ => number.to_string(),
            },
            Some(other) => other.to_string(),
        }
    }
}

impl From<Map<String, Value>> for BookingRequest {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ConfirmationCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

// A booking that passed validation. Only the processor builds these and
// nothing hands out mutable access once it is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredBooking {
    #[serde(flatten)]
    request: BookingRequest,
    id: BookingId,
    #[serde(serialize_with = "serialize_processed_at")]
    processed_at: DateTime<Utc>,
    confirmation_code: ConfirmationCode,
}

impl StoredBooking {
    pub(crate) fn new(
        request: BookingRequest,
        id: BookingId,
        processed_at: DateTime<Utc>,
        confirmation_code: ConfirmationCode,
    ) -> Self {
        // Generated fields win over anything the caller sent under the same key
        let request = request
            .without(ID)
            .without(PROCESSED_AT)
            .without(CONFIRMATION_CODE);

        Self {
            request,
            id,
            processed_at,
            confirmation_code,
        }
    }

    pub fn request(&self) -> &BookingRequest {
        &self.request
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.request.get(field)
    }

    pub fn guest_name(&self) -> String {
        self.request.field_text(GUEST_NAME)
    }

    pub fn room_number(&self) -> String {
        self.request.field_text(ROOM_NUMBER)
    }

    pub fn check_in(&self) -> String {
        self.request.field_text(CHECK_IN)
    }

    pub fn id(&self) -> &BookingId {
        &self.id
    }

    pub fn processed_at(&self) -> DateTime<Utc> {
        self.processed_at
    }

    pub fn processed_at_text(&self) -> String {
        self.processed_at.format(PROCESSED_AT_FORMAT).to_string()
    }

    pub fn confirmation_code(&self) -> &ConfirmationCode {
        &self.confirmation_code
    }
}

fn serialize_processed_at<S: Serializer>(
    processed_at: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&processed_at.format(PROCESSED_AT_FORMAT))
}
