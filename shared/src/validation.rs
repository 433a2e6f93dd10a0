//! Slot validation for the dining suggestions intent.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use validator::ValidateEmail;

use crate::lex::{slot_value, Slots};

/// Cities the concierge can suggest restaurants for.
pub const SUPPORTED_CITIES: &[&str] = &["new york", "manhattan", "brooklyn", "nyc"];

/// Cuisines present in the restaurant index.
pub const SUPPORTED_CUISINES: &[&str] = &["indian", "italian", "chinese", "mexican", "japanese"];

pub const MIN_PARTY_SIZE: i64 = 1;
pub const MAX_PARTY_SIZE: i64 = 10;

/// Slot names used by the dining suggestions intent.
pub mod slot_names {
    pub const CITY: &str = "city";
    pub const CUISINE: &str = "cuisine";
    pub const DATE: &str = "date";
    pub const TIME: &str = "time";
    pub const PEOPLE: &str = "people";
    pub const PHONE_NUMBER: &str = "phone_number";
    pub const EMAIL: &str = "email";
}

/// The first slot that failed validation and the prompt to re-collect it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotViolation {
    pub slot: &'static str,
    pub message: String,
}

impl SlotViolation {
    fn new(slot: &'static str, message: impl Into<String>) -> Self {
        Self {
            slot,
            message: message.into(),
        }
    }
}

/// Options that change which rules run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    pub validate_email: bool,
}

pub fn is_valid_city(city: &str) -> bool {
    SUPPORTED_CITIES.contains(&city.trim().to_lowercase().as_str())
}

pub fn is_valid_cuisine(cuisine: &str) -> bool {
    SUPPORTED_CUISINES.contains(&cuisine.trim().to_lowercase().as_str())
}

pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

pub fn is_valid_party_size(people: &str) -> bool {
    people
        .trim()
        .parse::<i64>()
        .map(|n| (MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&n))
        .unwrap_or(false)
}

pub fn is_valid_email(email: &str) -> bool {
    email.trim().validate_email()
}

/// Calendar date of `now` in the given zone.
pub fn today_in(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Validate the filled slots in order: city, cuisine, date, party size, and
/// email when enabled. Unfilled slots are skipped.
pub fn validate_dining(
    slots: &Slots,
    today: NaiveDate,
    options: ValidationOptions,
) -> Result<(), SlotViolation> {
    if let Some(city) = slot_value(slots, slot_names::CITY) {
        if !is_valid_city(city) {
            return Err(SlotViolation::new(
                slot_names::CITY,
                format!(
                    "We currently do not provide suggestions for {}. We only support New York \
                     (New York, Manhattan, Brooklyn) region. Which location do you want to book for?",
                    city
                ),
            ));
        }
    }

    if let Some(cuisine) = slot_value(slots, slot_names::CUISINE) {
        if !is_valid_cuisine(cuisine) {
            return Err(SlotViolation::new(
                slot_names::CUISINE,
                format!(
                    "We currently do not offer {} cuisine. We recommend 'indian', 'italian', \
                     'chinese', 'mexican', 'japanese' cuisines. Can you try a different one?",
                    cuisine
                ),
            ));
        }
    }

    if let Some(date) = slot_value(slots, slot_names::DATE) {
        match parse_date(date) {
            None => {
                return Err(SlotViolation::new(
                    slot_names::DATE,
                    "Please enter a valid reservation date. When would you like to make your reservation?",
                ))
            }
            Some(date) if date <= today => {
                return Err(SlotViolation::new(
                    slot_names::DATE,
                    "Can you please provide a dining date in the future?",
                ))
            }
            Some(_) => {}
        }
    }

    if let Some(people) = slot_value(slots, slot_names::PEOPLE) {
        if !is_valid_party_size(people) {
            return Err(SlotViolation::new(
                slot_names::PEOPLE,
                "We accept reservations from 1 to 10 guests only. Can you check and specify how \
                 many guests will be attending?",
            ));
        }
    }

    if options.validate_email {
        if let Some(email) = slot_value(slots, slot_names::EMAIL) {
            if !is_valid_email(email) {
                return Err(SlotViolation::new(
                    slot_names::EMAIL,
                    "Please provide a valid email address",
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::Slot;
    use chrono::{Duration, TimeZone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 5, 1).unwrap()
    }

    fn slots_with(pairs: &[(&str, &str)]) -> Slots {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), Some(Slot::interpreted(*value))))
            .collect()
    }

    fn check(pairs: &[(&str, &str)]) -> Result<(), SlotViolation> {
        validate_dining(&slots_with(pairs), today(), ValidationOptions::default())
    }

    #[test]
    fn test_party_size_bounds() {
        for n in 1..=10 {
            assert!(check(&[("people", n.to_string().as_str())]).is_ok(), "{} should pass", n);
        }
        for n in ["0", "11", "-3", "four", "2.5"] {
            let violation = check(&[("people", n)]).unwrap_err();
            assert_eq!(violation.slot, "people");
        }
    }

    #[test]
    fn test_city_allow_list_is_case_insensitive() {
        for city in ["New York", "MANHATTAN", "brooklyn", "Nyc"] {
            assert!(check(&[("city", city)]).is_ok(), "{} should pass", city);
        }
    }

    #[test]
    fn test_unsupported_city_names_city() {
        let violation = check(&[("city", "Boston"), ("cuisine", "Italian")]).unwrap_err();
        assert_eq!(violation.slot, "city");
        assert!(violation.message.contains("Boston"));
        assert!(violation.message.contains("Manhattan, Brooklyn"));
    }

    #[test]
    fn test_unsupported_cuisine() {
        let violation = check(&[("city", "nyc"), ("cuisine", "Thai")]).unwrap_err();
        assert_eq!(violation.slot, "cuisine");
        assert!(violation.message.contains("Thai"));
    }

    #[test]
    fn test_date_must_be_in_future() {
        let tomorrow = (today() + Duration::days(1)).format("%Y-%m-%d").to_string();
        assert!(check(&[("date", tomorrow.as_str())]).is_ok());

        let today_str = today().format("%Y-%m-%d").to_string();
        let violation = check(&[("date", today_str.as_str())]).unwrap_err();
        assert_eq!(violation.slot, "date");
        assert!(violation.message.contains("future"));

        let violation = check(&[("date", "2020-01-01")]).unwrap_err();
        assert_eq!(violation.slot, "date");
    }

    #[test]
    fn test_unparseable_date() {
        let violation = check(&[("date", "next tuesday")]).unwrap_err();
        assert_eq!(violation.slot, "date");
        assert!(violation.message.contains("valid reservation date"));
    }

    #[test]
    fn test_first_failure_wins() {
        let violation = check(&[
            ("city", "Boston"),
            ("cuisine", "Thai"),
            ("date", "garbage"),
            ("people", "40"),
        ])
        .unwrap_err();
        assert_eq!(violation.slot, "city");

        let violation = check(&[("cuisine", "Thai"), ("people", "40")]).unwrap_err();
        assert_eq!(violation.slot, "cuisine");
    }

    #[test]
    fn test_unfilled_slots_are_skipped() {
        let mut slots = slots_with(&[("city", "Brooklyn")]);
        slots.insert("cuisine".to_string(), None);
        assert!(validate_dining(&slots, today(), ValidationOptions::default()).is_ok());
    }

    #[test]
    fn test_email_rule_is_opt_in() {
        let pairs = [("city", "Brooklyn"), ("email", "not-an-email")];
        assert!(check(&pairs).is_ok());

        let violation = validate_dining(
            &slots_with(&pairs),
            today(),
            ValidationOptions { validate_email: true },
        )
        .unwrap_err();
        assert_eq!(violation.slot, "email");

        let ok = slots_with(&[("email", "diner@example.com")]);
        assert!(validate_dining(&ok, today(), ValidationOptions { validate_email: true }).is_ok());
    }

    #[test]
    fn test_today_follows_eastern_time() {
        // 22:00 on May 1st in New York
        let now = Utc.with_ymd_and_hms(2030, 5, 2, 2, 0, 0).unwrap();
        let eastern = today_in(now, chrono_tz::America::New_York);
        assert_eq!(eastern, today());
        assert_eq!(today_in(now, chrono_tz::UTC), today() + Duration::days(1));

        let options = ValidationOptions::default();
        assert!(validate_dining(&slots_with(&[("date", "2030-05-02")]), eastern, options).is_ok());
        let violation =
            validate_dining(&slots_with(&[("date", "2030-05-01")]), eastern, options).unwrap_err();
        assert_eq!(violation.slot, "date");
    }
}
