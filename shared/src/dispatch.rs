//! Suggestion dispatcher: drains queued reservation requests and emails a
//! ranked list of matching restaurants for each.
//!
//! A message is deleted only after its email was accepted by the mail
//! transport. Any earlier failure leaves it on the queue to be redelivered
//! once the visibility timeout lapses.

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::mailer::{EmailMessage, Mailer};
use crate::models::ReservationRequest;
use crate::queue::{QueueMessage, ReceiveOptions, ReservationQueue};
use crate::search::RestaurantSearch;
use crate::store::RestaurantStore;
use crate::suggestions::{dedupe, rank_by_rating, sample};
use crate::template::{render_suggestions, SUGGESTION_SUBJECT};
use crate::{DispatcherConfig, Result};

pub const NO_MESSAGES_BODY: &str = "No messages in the queue";
pub const SUCCESS_BODY: &str = "Successfully run the Dining Concierge suggestion dispatcher";

/// Tunables for a dispatcher run.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub sender_email: String,
    pub visibility_timeout_secs: i32,
    pub receive_batch_size: i32,
    pub search_result_size: u32,
    pub sample_size: usize,
    pub allow_partial: bool,
}

impl From<&DispatcherConfig> for DispatchSettings {
    fn from(config: &DispatcherConfig) -> Self {
        Self {
            sender_email: config.sender_email.clone(),
            visibility_timeout_secs: config.visibility_timeout_secs,
            receive_batch_size: config.receive_batch_size,
            search_result_size: config.search_result_size,
            sample_size: config.sample_size,
            allow_partial: config.allow_partial,
        }
    }
}

/// Outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub status_code: u16,
    pub body: String,
    pub messages_received: u32,
    pub suggestions_sent: u32,
    pub errors: u32,
}

pub struct SuggestionDispatcher {
    queue: Arc<dyn ReservationQueue>,
    search: Arc<dyn RestaurantSearch>,
    store: Arc<dyn RestaurantStore>,
    mailer: Arc<dyn Mailer>,
    settings: DispatchSettings,
}

impl SuggestionDispatcher {
    pub fn new(
        queue: Arc<dyn ReservationQueue>,
        search: Arc<dyn RestaurantSearch>,
        store: Arc<dyn RestaurantStore>,
        mailer: Arc<dyn Mailer>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            queue,
            search,
            store,
            mailer,
            settings,
        }
    }

    /// Drain one batch of queued requests.
    ///
    /// Only a failure to receive is returned as an error; per-message
    /// failures are logged and counted in the report.
    pub async fn run(&self) -> Result<DispatchReport> {
        let messages = self
            .queue
            .receive(ReceiveOptions {
                max_messages: self.settings.receive_batch_size,
                visibility_timeout_secs: self.settings.visibility_timeout_secs,
                wait_time_secs: 0,
            })
            .await?;

        if messages.is_empty() {
            info!("No messages in the queue");
            return Ok(DispatchReport {
                status_code: 200,
                body: NO_MESSAGES_BODY.to_string(),
                messages_received: 0,
                suggestions_sent: 0,
                errors: 0,
            });
        }

        info!(messages = messages.len(), "Received reservation requests");

        let mut suggestions_sent = 0u32;
        let mut errors = 0u32;

        for message in &messages {
            let message_id = message.message_id.as_deref().unwrap_or("unknown");

            match self.process(message).await {
                Ok(email_id) => {
                    suggestions_sent += 1;
                    info!(message_id, email_id = %email_id, "Suggestions emailed");

                    match self.queue.delete(&message.receipt_handle).await {
                        Ok(()) => info!(message_id, "Deleted message from queue"),
                        Err(e) => {
                            error!(message_id, error = %e, "Failed to delete message");
                            errors += 1;
                        }
                    }
                }
                Err(e) => {
                    error!(
                        message_id,
                        error = %e,
                        "Failed to process reservation request, leaving for redelivery"
                    );
                    errors += 1;
                }
            }
        }

        let report = DispatchReport {
            status_code: 200,
            body: SUCCESS_BODY.to_string(),
            messages_received: messages.len() as u32,
            suggestions_sent,
            errors,
        };

        info!(
            messages_received = report.messages_received,
            suggestions_sent = report.suggestions_sent,
            errors = report.errors,
            "Suggestion dispatch complete"
        );

        Ok(report)
    }

    /// Build and send the suggestion email for one message, returning the
    /// transport message id.
    async fn process(&self, message: &QueueMessage) -> Result<String> {
        let request = ReservationRequest::from_attributes(&message.attributes)?;
        info!(
            cuisine = %request.cuisine,
            city = %request.city,
            people = request.people,
            "Processing reservation request"
        );

        let candidates = self
            .search
            .ids_for_cuisine(&request.cuisine, self.settings.search_result_size)
            .await?;
        let selected = self.select(candidates)?;
        info!(selected = ?selected, "Selected restaurants");

        let mut restaurants = if selected.is_empty() {
            warn!(cuisine = %request.cuisine, "No candidate restaurants found");
            Vec::new()
        } else {
            self.store.batch_get(&selected).await?
        };
        rank_by_rating(&mut restaurants);

        let email = EmailMessage {
            from: self.settings.sender_email.clone(),
            to: request.email.clone(),
            subject: SUGGESTION_SUBJECT.to_string(),
            html_body: render_suggestions(&request, &restaurants),
        };

        self.mailer.send(&email).await
    }

    fn select(&self, candidates: Vec<String>) -> Result<Vec<String>> {
        let unique = dedupe(candidates);
        let mut rng = rand::thread_rng();
        sample(
            &unique,
            self.settings.sample_size,
            self.settings.allow_partial,
            &mut rng,
        )
    }
}
