//! Shared data models.

use std::collections::HashMap;

use crate::{Error, Result};

/// Attribute names carried on every reservation queue message.
pub mod attributes {
    pub const CITY: &str = "city";
    pub const CUISINE: &str = "cuisine";
    pub const DATE: &str = "date";
    pub const TIME: &str = "time";
    pub const PEOPLE: &str = "people";
    pub const PHONE_NUMBER: &str = "phone_number";
    pub const EMAIL: &str = "email";
}

/// A completed dining reservation request collected by the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    pub city: String,
    pub cuisine: String,
    /// ISO calendar date (`YYYY-MM-DD`)
    pub date: String,
    pub time: String,
    pub people: u32,
    pub phone_number: String,
    pub email: String,
}

impl ReservationRequest {
    /// Human-readable queue message body.
    pub fn summary(&self) -> String {
        format!(
            "Dining Suggestions required for Cuisine:{} in City:{}",
            self.cuisine, self.city
        )
    }

    /// Encode as typed queue message attributes.
    pub fn to_attributes(&self) -> Vec<MessageAttribute> {
        use attributes::*;

        vec![
            MessageAttribute::string(CITY, &self.city),
            MessageAttribute::string(CUISINE, &self.cuisine),
            MessageAttribute::string(DATE, &self.date),
            MessageAttribute::number(PEOPLE, self.people),
            MessageAttribute::string(PHONE_NUMBER, &self.phone_number),
            MessageAttribute::string(EMAIL, &self.email),
            MessageAttribute::string(TIME, &self.time),
        ]
    }

    /// Decode from received message attributes, normalizing text to lower case.
    pub fn from_attributes(attrs: &HashMap<String, String>) -> Result<Self> {
        use attributes::*;

        let get = |name: &str| -> Result<String> {
            attrs
                .get(name)
                .map(|value| value.trim().to_lowercase())
                .ok_or_else(|| Error::MissingAttribute(name.to_string()))
        };

        let people_raw = get(PEOPLE)?;
        let people = people_raw
            .parse::<u32>()
            .map_err(|_| Error::InvalidValue {
                name: PEOPLE.to_string(),
                value: people_raw.clone(),
            })?;

        Ok(Self {
            city: get(CITY)?,
            cuisine: get(CUISINE)?,
            date: get(DATE)?,
            time: get(TIME)?,
            people,
            phone_number: get(PHONE_NUMBER)?,
            email: get(EMAIL)?,
        })
    }
}

/// Queue attribute data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Number,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "String",
            AttributeType::Number => "Number",
        }
    }
}

/// A single typed message attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAttribute {
    pub name: String,
    pub data_type: AttributeType,
    pub value: String,
}

impl MessageAttribute {
    pub fn string(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: AttributeType::String,
            value: value.to_string(),
        }
    }

    pub fn number(name: &str, value: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            data_type: AttributeType::Number,
            value: value.to_string(),
        }
    }
}

/// Restaurant record as stored in the key-value table.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    pub business_id: String,
    pub name: String,
    pub address: String,
    pub rating: f64,
    /// Number of reviews
    pub reviews: Option<u64>,
    pub cuisine: Option<String>,
    pub zip_code: Option<String>,
}
