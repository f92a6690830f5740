// Booking validation: a fail-fast chain of business-rule checks over a
// candidate booking

use crate::booking::{
    BookingRequest, CHECK_IN, CHECK_IN_FORMAT, GUESTS, REQUIRED_FIELDS, ROOM_NUMBER,
};
use crate::capabilities::{Clock, SystemClock};
use crate::config::BookingConfig;
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

// Why a candidate was turned away. Callers of `validate` only see a bool;
// this is for logging and diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} has the wrong type, expected {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Room {0} is not available")]
    UnknownRoom(String),

    #[error("Invalid check-in date: {0}")]
    InvalidDate(String),

    #[error("Check-in date {check_in} is before {today}")]
    PastDate { check_in: NaiveDate, today: NaiveDate },

    #[error("Guest count {count} outside {min}..={max}")]
    GuestCountOutOfRange { count: i64, min: i64, max: i64 },
}

// Capability the processor needs from a validator
#[cfg_attr(test, mockall::automock)]
pub trait BookingValidation: Send + Sync {
    fn validate(&self, booking: &BookingRequest) -> bool;
}

pub struct BookingValidator {
    config: BookingConfig,
    clock: Arc<dyn Clock>,
}

impl Default for BookingValidator {
    fn default() -> Self {
        Self::new(BookingConfig::default())
    }
}

impl BookingValidator {
    pub fn new(config: BookingConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: BookingConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn available_rooms(&self) -> &[String] {
        &self.config.available_rooms
    }

    // Run the checks in order and stop at the first failure
    pub fn check(&self, booking: &BookingRequest) -> Result<(), Rejection> {
        self.check_required_fields(booking)?;
        self.check_room(booking.get(ROOM_NUMBER))?;
        self.check_date(booking.get(CHECK_IN))?;
        self.check_guest_count(booking.get(GUESTS))?;
        Ok(())
    }

    fn check_required_fields(&self, booking: &BookingRequest) -> Result<(), Rejection> {
        match REQUIRED_FIELDS
            .iter()
            .find(|field| is_empty(booking.get(field)))
        {
            Some(field) => Err(Rejection::MissingField(*field)),
            None => Ok(()),
        }
    }

    fn check_room(&self, room_number: Option<&Value>) -> Result<(), Rejection> {
        let Some(Value::String(room_number)) = room_number else {
            return Err(Rejection::WrongType {
                field: ROOM_NUMBER,
                expected: "string",
            });
        };

        if self.available_rooms().iter().any(|room| room == room_number) {
            Ok(())
        } else {
            Err(Rejection::UnknownRoom(room_number.clone()))
        }
    }

    fn check_date(&self, check_in: Option<&Value>) -> Result<(), Rejection> {
        let Some(Value::String(check_in)) = check_in else {
            return Err(Rejection::WrongType {
                field: CHECK_IN,
                expected: "string",
            });
        };

        let parsed = NaiveDate::parse_from_str(check_in, CHECK_IN_FORMAT)
            .map_err(|e| Rejection::InvalidDate(format!("{}: {}", check_in, e)))?;

        // Reject anything that only parses by normalising, e.g. "2025-6-1"
        if parsed.format(CHECK_IN_FORMAT).to_string() != *check_in {
            return Err(Rejection::InvalidDate(check_in.clone()));
        }

        let today = self.clock.now().date_naive();
        if parsed < today {
            return Err(Rejection::PastDate {
                check_in: parsed,
                today,
            });
        }

        Ok(())
    }

    fn check_guest_count(&self, guests: Option<&Value>) -> Result<(), Rejection> {
        let count = match guests {
            Some(Value::Number(number)) => number.as_i64().ok_or(Rejection::WrongType {
                field: GUESTS,
                expected: "integer or string",
            })?,
            Some(Value::String(text)) => coerce_to_int(text),
            _ => {
                return Err(Rejection::WrongType {
                    field: GUESTS,
                    expected: "integer or string",
                })
            }
        };

        let (min, max) = (self.config.min_guests, self.config.max_guests);
        if (min..=max).contains(&count) {
            Ok(())
        } else {
            Err(Rejection::GuestCountOutOfRange { count, min, max })
        }
    }
}

impl BookingValidation for BookingValidator {
    fn validate(&self, booking: &BookingRequest) -> bool {
        match self.check(booking) {
            Ok(()) => true,
            Err(rejection) => {
                debug!(%rejection, "booking rejected");
                false
            }
        }
    }
}

// Lets a host keep its own handle on the validator it hands to a processor
impl<T: BookingValidation + ?Sized> BookingValidation for Arc<T> {
    fn validate(&self, booking: &BookingRequest) -> bool {
        (**self).validate(booking)
    }
}

// Absent, null, false, zero, "", "0" and empty collections all count as missing
fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(flag)) => !flag,
        Some(Value::Number(number)) => number.as_f64() == Some(0.0),
        Some(Value::String(text)) => text.is_empty() || text == "0",
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(fields)) => fields.is_empty(),
    }
}

// Integer value of a string the loose way: the longest leading number
// (sign, digits, fraction, exponent) after optional whitespace, truncated.
// No leading number means 0.
fn coerce_to_int(text: &str) -> i64 {
    let leading = text.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    let prefix = &leading[..numeric_prefix_len(leading.as_bytes())];

    match prefix.parse::<f64>() {
        Ok(number) if number.is_finite() => number.trunc() as i64,
        _ => leading_digits(prefix),
    }
}

// Length of `[+-]?digits[.digits][(e|E)[+-]?digits]` at the start of `bytes`,
// or 0 when there is no digit before the exponent
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |mut at: usize| {
        while bytes.get(at).is_some_and(u8::is_ascii_digit) {
            at += 1;
        }
        at
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer_end = digits_from(end);
    let mut mantissa_digits = integer_end - end;
    end = integer_end;

    if bytes.get(end) == Some(&b'.') {
        let fraction_end = digits_from(end + 1);
        mantissa_digits += fraction_end - (end + 1);
        end = fraction_end;
    }

    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_end = digits_from(exponent);
        if exponent_end > exponent {
            end = exponent_end;
        }
    }

    end
}

// Sign and integer digits only, for prefixes too large to be a finite float
fn leading_digits(prefix: &str) -> i64 {
    let (sign, digits) = match prefix.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, prefix.strip_prefix('+').unwrap_or(prefix)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end]
        .parse::<i64>()
        .map(|number| sign * number)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::GUEST_NAME;
    use crate::capabilities::FixedClock;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use test_case::test_case;

    // Pinned "now" so the sample dates stay in the future
    fn validator() -> BookingValidator {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 15, 45, 0).unwrap();
        BookingValidator::with_clock(BookingConfig::default(), Arc::new(FixedClock(now)))
    }

    fn valid_booking() -> BookingRequest {
        BookingRequest::new()
            .with(GUEST_NAME, "John Doe")
            .with(ROOM_NUMBER, "101")
            .with(CHECK_IN, "2025-12-25")
            .with(GUESTS, 2)
    }

    #[test]
    fn test_validate_accepts_valid_booking() {
        assert!(validator().validate(&valid_booking()));
    }

    #[test_case(GUEST_NAME; "#1 guest name")]
    #[test_case(ROOM_NUMBER; "#2 room number")]
    #[test_case(CHECK_IN; "#3 check in")]
    #[test_case(GUESTS; "#4 guests")]
    fn test_missing_field_rejected(field: &'static str) {
        let booking = valid_booking().without(field);
        assert_eq!(
            validator().check(&booking),
            Err(Rejection::MissingField(field))
        );
        assert!(!validator().validate(&booking));
    }

    #[test_case(json!(""); "#1 empty string")]
    #[test_case(json!(null); "#2 null")]
    #[test_case(json!(0); "#3 zero")]
    #[test_case(json!("0"); "#4 zero string")]
    #[test_case(json!(false); "#5 false")]
    #[test_case(json!(0.0); "#6 float zero")]
    #[test_case(json!([]); "#7 empty array")]
    #[test_case(json!({}); "#8 empty object")]
    fn test_empty_guest_name_rejected(value: Value) {
        let booking = valid_booking().with(GUEST_NAME, value);
        assert_eq!(
            validator().check(&booking),
            Err(Rejection::MissingField(GUEST_NAME))
        );
    }

    #[test_case(ROOM_NUMBER, json!(""); "#1 empty room")]
    #[test_case(ROOM_NUMBER, json!(null); "#2 null room")]
    #[test_case(CHECK_IN, json!(""); "#3 empty check in")]
    #[test_case(GUESTS, json!("0"); "#4 zero string guests")]
    #[test_case(GUESTS, json!(0.0); "#5 float zero guests")]
    fn test_empty_required_field_rejected(field: &'static str, value: Value) {
        let booking = valid_booking().with(field, value);
        assert_eq!(
            validator().check(&booking),
            Err(Rejection::MissingField(field))
        );
    }

    #[test]
    fn test_zero_guests_fails_presence_before_range() {
        let booking = valid_booking().with(GUESTS, 0);
        assert_eq!(
            validator().check(&booking),
            Err(Rejection::MissingField(GUESTS))
        );
    }

    #[test_case(json!("999"); "#1 unlisted room")]
    #[test_case(json!("101 "); "#2 trailing space")]
    #[test_case(json!("A101"); "#3 prefixed")]
    fn test_unknown_room_rejected(room: Value) {
        let booking = valid_booking().with(ROOM_NUMBER, room);
        assert!(matches!(
            validator().check(&booking),
            Err(Rejection::UnknownRoom(_))
        ));
    }

    #[test]
    fn test_numeric_room_rejected_by_type() {
        let booking = valid_booking().with(ROOM_NUMBER, 101);
        assert_eq!(
            validator().check(&booking),
            Err(Rejection::WrongType {
                field: ROOM_NUMBER,
                expected: "string"
            })
        );
    }

    #[test_case("2025-13-45"; "#1 impossible month and day")]
    #[test_case("2025-02-30"; "#2 day past month end")]
    #[test_case("2025-6-01"; "#3 unpadded month")]
    #[test_case("2025-06-1"; "#4 unpadded day")]
    #[test_case("25-12-2025"; "#5 reversed")]
    #[test_case("2025/12/25"; "#6 wrong separator")]
    #[test_case("2025-12-25T10:00:00"; "#7 trailing time")]
    #[test_case("tomorrow"; "#8 not a date")]
    fn test_malformed_date_rejected(check_in: &str) {
        let booking = valid_booking().with(CHECK_IN, check_in);
        assert!(matches!(
            validator().check(&booking),
            Err(Rejection::InvalidDate(_))
        ));
    }

    #[test]
    fn test_past_date_rejected() {
        let booking = valid_booking().with(CHECK_IN, "2025-05-31");
        assert!(matches!(
            validator().check(&booking),
            Err(Rejection::PastDate { .. })
        ));
    }

    #[test]
    fn test_same_day_check_in_accepted() {
        let booking = valid_booking().with(CHECK_IN, "2025-06-01");
        assert_eq!(validator().check(&booking), Ok(()));
    }

    #[test]
    fn test_non_string_date_rejected() {
        let booking = valid_booking().with(CHECK_IN, 20251225);
        assert!(matches!(
            validator().check(&booking),
            Err(Rejection::WrongType { field: CHECK_IN, .. })
        ));
    }

    #[test_case(json!(1), true; "#1 lower bound")]
    #[test_case(json!(4), true; "#2 upper bound")]
    #[test_case(json!(5), false; "#3 above range")]
    #[test_case(json!(-1), false; "#4 negative")]
    #[test_case(json!("3"), true; "#5 numeric string")]
    #[test_case(json!(" 2"), true; "#6 leading whitespace")]
    #[test_case(json!("2 guests"), true; "#7 leading digits")]
    #[test_case(json!("3.9"), true; "#8 decimal string truncated")]
    #[test_case(json!("abc"), false; "#9 non numeric string")]
    #[test_case(json!("10"), false; "#10 string above range")]
    #[test_case(json!(2.0), false; "#11 float number")]
    #[test_case(json!(true), false; "#12 boolean")]
    #[test_case(json!([2]), false; "#13 array")]
    fn test_guest_count(guests: Value, expected: bool) {
        let booking = valid_booking().with(GUESTS, guests);
        assert_eq!(validator().validate(&booking), expected);
    }

    #[test_case(json!("4e1 guests"); "#1 exponent reads as forty")]
    #[test_case(json!("1.5e1x"); "#2 fraction and exponent read as fifteen")]
    fn test_guest_count_reads_full_leading_number(guests: Value) {
        let booking = valid_booking().with(GUESTS, guests);
        assert!(matches!(
            validator().check(&booking),
            Err(Rejection::GuestCountOutOfRange { .. })
        ));
    }

    #[test]
    fn test_checks_short_circuit_in_order() {
        // Bad room and bad date: the room is reported
        let booking = valid_booking()
            .with(ROOM_NUMBER, "999")
            .with(CHECK_IN, "not-a-date");
        assert_eq!(
            validator().check(&booking),
            Err(Rejection::UnknownRoom("999".to_string()))
        );
    }

    #[test_case("3", 3; "#1 plain")]
    #[test_case("  4  ", 4; "#2 padded")]
    #[test_case("+2", 2; "#3 explicit sign")]
    #[test_case("-2", -2; "#4 negative")]
    #[test_case("1e1", 10; "#5 exponent")]
    #[test_case("12abc", 12; "#6 trailing text")]
    #[test_case("abc12", 0; "#7 leading text")]
    #[test_case("", 0; "#8 empty")]
    #[test_case("inf", 0; "#9 infinity word")]
    #[test_case("4e1 guests", 40; "#10 exponent before text")]
    #[test_case("1.5e1x", 15; "#11 fraction and exponent before text")]
    #[test_case("1e1abc", 10; "#12 exponent then letters")]
    #[test_case("3e guests", 3; "#13 exponent without digits")]
    #[test_case(" 2.9 rooms", 2; "#14 fraction before text")]
    #[test_case(".5", 0; "#15 fraction only")]
    #[test_case("-.", 0; "#16 sign and dot")]
    fn test_coerce_to_int(text: &str, expected: i64) {
        assert_eq!(coerce_to_int(text), expected);
    }

    #[test]
    fn test_available_rooms_query() {
        assert_eq!(
            validator().available_rooms(),
            &["101", "102", "103", "201", "202", "203"]
        );
    }

    #[test]
    fn test_custom_room_list() {
        let config = BookingConfig {
            available_rooms: vec!["PH1".to_string()],
            ..BookingConfig::default()
        };
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let validator = BookingValidator::with_clock(config, Arc::new(FixedClock(now)));

        assert!(!validator.validate(&valid_booking()));
        assert!(validator.validate(&valid_booking().with(ROOM_NUMBER, "PH1")));
    }
}
