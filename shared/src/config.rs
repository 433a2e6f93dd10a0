//! Configuration management for Lambda functions.

use chrono_tz::Tz;
use std::env;
use std::str::FromStr;

use crate::{Error, Result};

/// Default zone used to decide what "today" means for reservation dates.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

/// Longest lease SQS accepts on a received message (12 hours).
pub const MAX_VISIBILITY_TIMEOUT_SECS: i32 = 43_200;

/// Configuration for the intake dialog Lambda.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// URL of the FIFO reservation queue
    pub queue_url: String,
    /// Zone used when checking that a date lies in the future
    pub timezone: Tz,
    /// Whether the email slot is format-checked during validation
    pub validate_email: bool,
}

impl IntakeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            queue_url: required(&lookup, "QUEUE_URL")?,
            timezone: parse_or(&lookup, "DINING_TIMEZONE", DEFAULT_TIMEZONE)?,
            validate_email: parse_or(&lookup, "VALIDATE_EMAIL", false)?,
        })
    }
}

/// Where the search cluster credentials come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCredentialSource {
    /// Username and password given directly
    Basic { username: String, password: String },
    /// Secrets Manager secret holding `{"username": .., "password": ..}`
    Secret { secret_arn: String },
}

/// Search cluster location and credentials.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub endpoint: String,
    pub index: String,
    pub credentials: SearchCredentialSource,
}

/// Configuration for the suggestion dispatcher Lambda.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// URL of the reservation queue to drain
    pub queue_url: String,
    pub search: SearchConfig,
    /// Key-value table holding restaurant records
    pub restaurant_table: String,
    /// Verified sender address for suggestion emails
    pub sender_email: String,
    /// Lease applied to received messages, in seconds
    pub visibility_timeout_secs: i32,
    /// Messages pulled per invocation (1-10)
    pub receive_batch_size: i32,
    /// Candidate ids requested from the search index
    pub search_result_size: u32,
    /// Restaurants included in each email
    pub sample_size: usize,
    /// Send fewer suggestions instead of failing when candidates run short
    pub allow_partial: bool,
}

impl DispatcherConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = match (
            lookup("SEARCH_USERNAME"),
            lookup("SEARCH_PASSWORD"),
            lookup("SEARCH_SECRET_ARN"),
        ) {
            (Some(username), Some(password), _) => {
                SearchCredentialSource::Basic { username, password }
            }
            (_, _, Some(secret_arn)) => SearchCredentialSource::Secret { secret_arn },
            _ => {
                return Err(Error::Config(
                    "SEARCH_USERNAME and SEARCH_PASSWORD or SEARCH_SECRET_ARN must be set"
                        .to_string(),
                ))
            }
        };

        let receive_batch_size: i32 = parse_or(&lookup, "RECEIVE_BATCH_SIZE", 10)?;
        if !(1..=10).contains(&receive_batch_size) {
            return Err(Error::Config(format!(
                "RECEIVE_BATCH_SIZE must be between 1 and 10, got {}",
                receive_batch_size
            )));
        }

        let sample_size: usize = parse_or(&lookup, "SUGGESTION_SAMPLE_SIZE", 5)?;
        if sample_size == 0 {
            return Err(Error::Config(
                "SUGGESTION_SAMPLE_SIZE must be at least 1".to_string(),
            ));
        }

        let search_result_size: u32 = parse_or(&lookup, "SEARCH_RESULT_SIZE", 10)?;
        let allow_partial: bool = parse_or(&lookup, "ALLOW_PARTIAL_SUGGESTIONS", false)?;
        if !allow_partial && sample_size > search_result_size as usize {
            return Err(Error::Config(format!(
                "SUGGESTION_SAMPLE_SIZE ({}) exceeds SEARCH_RESULT_SIZE ({})",
                sample_size, search_result_size
            )));
        }

        let visibility_timeout_secs: i32 = parse_or(&lookup, "VISIBILITY_TIMEOUT_SECONDS", 10)?;
        if !(0..=MAX_VISIBILITY_TIMEOUT_SECS).contains(&visibility_timeout_secs) {
            return Err(Error::Config(format!(
                "VISIBILITY_TIMEOUT_SECONDS must be between 0 and {}, got {}",
                MAX_VISIBILITY_TIMEOUT_SECS, visibility_timeout_secs
            )));
        }

        Ok(Self {
            queue_url: required(&lookup, "QUEUE_URL")?,
            search: SearchConfig {
                endpoint: required(&lookup, "SEARCH_ENDPOINT")?,
                index: lookup("SEARCH_INDEX").unwrap_or_else(|| "restaurants".to_string()),
                credentials,
            },
            restaurant_table: lookup("RESTAURANT_TABLE")
                .unwrap_or_else(|| "yelp-restaurants".to_string()),
            sender_email: required(&lookup, "SES_FROM_EMAIL")?,
            visibility_timeout_secs,
            receive_batch_size,
            search_result_size,
            sample_size,
            allow_partial,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("{} not set", key)))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}
