//! Shared library for Dining Concierge Lambda functions.
//!
//! This crate provides the dialog and dispatch workflows, their collaborator
//! clients, and the types used across both Lambda functions.

pub mod config;
pub mod dialog;
pub mod dispatch;
pub mod error;
pub mod lex;
pub mod mailer;
pub mod models;
pub mod queue;
pub mod search;
pub mod secrets;
pub mod store;
pub mod suggestions;
pub mod template;
pub mod validation;

#[cfg(test)]
mod testing;

pub use config::{DispatcherConfig, IntakeConfig, SearchConfig, SearchCredentialSource};
pub use dialog::IntakeHandler;
pub use dispatch::{DispatchReport, DispatchSettings, SuggestionDispatcher};
pub use error::{Error, Result};
pub use lex::{LexEvent, LexResponse};
pub use mailer::{EmailMessage, Mailer, SesMailer};
pub use models::{ReservationRequest, Restaurant};
pub use queue::{ReservationQueue, SqsQueue};
pub use search::{OpenSearchClient, RestaurantSearch, SearchCredentials};
pub use secrets::{get_secret, resolve_search_credentials};
pub use store::{DynamoRestaurantStore, RestaurantStore};
