//! Intake dialog: routes code hook events by intent, validates dining slots
//! and enqueues finished reservation requests.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::lex::{
    slot_value, IntentFulfillmentState, InvocationSource, LexEvent, LexResponse, Message, Slots,
};
use crate::models::ReservationRequest;
use crate::queue::{OutgoingMessage, ReservationQueue};
use crate::validation::{self, slot_names, ValidationOptions};
use crate::{Error, IntakeConfig, Result};

pub const GREETING_MESSAGE: &str = "Hi there, I am your Dining Concierge Bot, how can I help?";
pub const THANK_YOU_MESSAGE: &str = "You're welcome! Thanks for chatting with us!";
pub const CONFIRMATION_MESSAGE: &str =
    "Thanks, you're all set! You should receive my suggestions via email in a few minutes!";

/// Intents this bot is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    DiningSuggestions,
    ThankYou,
}

impl Intent {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "GreetingIntent" => Ok(Intent::Greeting),
            "DiningSuggestionsIntent" => Ok(Intent::DiningSuggestions),
            "ThankYouIntent" => Ok(Intent::ThankYou),
            other => Err(Error::UnsupportedIntent(other.to_string())),
        }
    }
}

pub struct IntakeHandler {
    queue: Arc<dyn ReservationQueue>,
    timezone: Tz,
    options: ValidationOptions,
}

impl IntakeHandler {
    pub fn new(queue: Arc<dyn ReservationQueue>, config: &IntakeConfig) -> Self {
        Self {
            queue,
            timezone: config.timezone,
            options: ValidationOptions {
                validate_email: config.validate_email,
            },
        }
    }

    /// Handle an event using today's date in the configured zone.
    pub async fn handle(&self, event: LexEvent) -> Result<LexResponse> {
        let today = validation::today_in(Utc::now(), self.timezone);
        self.handle_on(event, today).await
    }

    /// Handle an event as if the current date were `today`.
    pub async fn handle_on(&self, event: LexEvent, today: NaiveDate) -> Result<LexResponse> {
        let intent_name = event.session_state.intent.name.clone();
        info!(
            intent = %intent_name,
            invocation_source = ?event.invocation_source,
            "Handling dialog event"
        );

        let session_attributes = event
            .session_state
            .session_attributes
            .clone()
            .unwrap_or_default();

        match Intent::from_name(&intent_name)? {
            Intent::Greeting => Ok(LexResponse::close(
                session_attributes,
                &intent_name,
                IntentFulfillmentState::Fulfilled,
                Message::plain_text(GREETING_MESSAGE),
            )),
            Intent::ThankYou => Ok(LexResponse::close(
                session_attributes,
                &intent_name,
                IntentFulfillmentState::Fulfilled,
                Message::plain_text(THANK_YOU_MESSAGE),
            )),
            Intent::DiningSuggestions => match event.invocation_source {
                InvocationSource::DialogCodeHook => {
                    let mut slots = event.session_state.intent.slots;
                    match validation::validate_dining(&slots, today, self.options) {
                        Ok(()) => Ok(LexResponse::delegate(session_attributes, &intent_name, slots)),
                        Err(violation) => {
                            info!(slot = violation.slot, "Slot failed validation");
                            slots.insert(violation.slot.to_string(), None);
                            Ok(LexResponse::elicit_slot(
                                session_attributes,
                                &intent_name,
                                slots,
                                violation.slot,
                                Message::plain_text(violation.message),
                            ))
                        }
                    }
                }
                InvocationSource::FulfillmentCodeHook => {
                    let request = reservation_from_slots(&event.session_state.intent.slots)?;
                    let group_id = event
                        .session_state
                        .originating_request_id
                        .clone()
                        .or_else(|| event.session_id.clone())
                        .ok_or_else(|| {
                            Error::Internal("Event has no request or session id".to_string())
                        })?;

                    self.enqueue(&request, group_id).await?;

                    Ok(LexResponse::close(
                        session_attributes,
                        &intent_name,
                        IntentFulfillmentState::Fulfilled,
                        Message::plain_text(CONFIRMATION_MESSAGE),
                    ))
                }
            },
        }
    }

    async fn enqueue(&self, request: &ReservationRequest, group_id: String) -> Result<()> {
        debug!(city = %request.city, cuisine = %request.cuisine, "Enqueuing reservation request");

        let message_id = self
            .queue
            .publish(OutgoingMessage {
                body: request.summary(),
                attributes: request.to_attributes(),
                deduplication_id: Uuid::new_v4().to_string(),
                group_id,
            })
            .await?;

        info!(message_id = %message_id, "Reservation request queued");
        Ok(())
    }
}

/// Build a reservation request from fully elicited slots.
pub fn reservation_from_slots(slots: &Slots) -> Result<ReservationRequest> {
    let get = |name: &str| -> Result<String> {
        slot_value(slots, name)
            .map(String::from)
            .ok_or_else(|| Error::MissingSlot(name.to_string()))
    };

    let people_raw = get(slot_names::PEOPLE)?;
    let people = people_raw
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::InvalidValue {
            name: slot_names::PEOPLE.to_string(),
            value: people_raw.clone(),
        })?;

    Ok(ReservationRequest {
        city: get(slot_names::CITY)?,
        cuisine: get(slot_names::CUISINE)?,
        date: get(slot_names::DATE)?,
        time: get(slot_names::TIME)?,
        people,
        phone_number: get(slot_names::PHONE_NUMBER)?,
        email: get(slot_names::EMAIL)?,
    })
}
