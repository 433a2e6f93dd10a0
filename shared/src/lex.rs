//! Conversational front-end contract (Amazon Lex V2 code hook events).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Slot values keyed by slot name; `None` is an unfilled slot.
pub type Slots = HashMap<String, Option<Slot>>;

/// Session attributes echoed between turns.
pub type SessionAttributes = HashMap<String, String>;

/// Phase of the dialog in which the hook was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvocationSource {
    /// Validation phase, called on each user turn
    DialogCodeHook,
    /// Fulfillment phase, called once all slots are filled
    FulfillmentCodeHook,
}

/// Inbound code hook event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexEvent {
    pub invocation_source: InvocationSource,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub input_transcript: Option<String>,
    pub session_state: SessionState,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub intent: IntentState,
    #[serde(default)]
    pub session_attributes: Option<SessionAttributes>,
    #[serde(default)]
    pub originating_request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentState {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slots: Slots,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub confirmation_state: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Slots, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Slots>::deserialize(deserializer)?.unwrap_or_default())
}

/// A filled slot; fields other than `value` are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<SlotValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreted_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resolved_values: Vec<String>,
}

impl Slot {
    /// Slot holding a single interpreted value.
    pub fn interpreted(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            value: Some(SlotValue {
                original_value: Some(value.clone()),
                interpreted_value: Some(value.clone()),
                resolved_values: vec![value],
            }),
            extra: Map::new(),
        }
    }

    /// The value the front-end resolved for this slot, if any.
    pub fn interpreted_value(&self) -> Option<&str> {
        self.value
            .as_ref()
            .and_then(|v| v.interpreted_value.as_deref())
    }
}

/// Interpreted value of the named slot, if the slot is filled.
pub fn slot_value<'a>(slots: &'a Slots, name: &str) -> Option<&'a str> {
    slots
        .get(name)
        .and_then(|slot| slot.as_ref())
        .and_then(Slot::interpreted_value)
}

/// Outbound code hook response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LexResponse {
    pub session_state: ResponseSessionState,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSessionState {
    pub session_attributes: SessionAttributes,
    pub dialog_action: DialogAction,
    pub intent: ResponseIntent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogAction {
    #[serde(rename = "type")]
    pub action_type: DialogActionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_to_elicit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DialogActionType {
    Close,
    Delegate,
    ElicitSlot,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseIntent {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IntentFulfillmentState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slots: Option<Slots>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntentFulfillmentState {
    Fulfilled,
    ReadyForFulfillment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub content_type: String,
    pub content: String,
}

impl Message {
    pub fn plain_text(content: impl Into<String>) -> Self {
        Self {
            content_type: "PlainText".to_string(),
            content: content.into(),
        }
    }
}

impl LexResponse {
    /// End the intent with the given state and message.
    pub fn close(
        session_attributes: SessionAttributes,
        intent_name: &str,
        state: IntentFulfillmentState,
        message: Message,
    ) -> Self {
        Self {
            session_state: ResponseSessionState {
                session_attributes,
                dialog_action: DialogAction {
                    action_type: DialogActionType::Close,
                    slot_to_elicit: None,
                },
                intent: ResponseIntent {
                    name: intent_name.to_string(),
                    state: Some(state),
                    slots: None,
                },
            },
            messages: vec![message],
        }
    }

    /// Hand the next step back to the front-end, keeping all slots.
    pub fn delegate(session_attributes: SessionAttributes, intent_name: &str, slots: Slots) -> Self {
        Self {
            session_state: ResponseSessionState {
                session_attributes,
                dialog_action: DialogAction {
                    action_type: DialogActionType::Delegate,
                    slot_to_elicit: None,
                },
                intent: ResponseIntent {
                    name: intent_name.to_string(),
                    state: Some(IntentFulfillmentState::ReadyForFulfillment),
                    slots: Some(slots),
                },
            },
            messages: Vec::new(),
        }
    }

    /// Ask the user to supply `slot_to_elicit` again.
    pub fn elicit_slot(
        session_attributes: SessionAttributes,
        intent_name: &str,
        slots: Slots,
        slot_to_elicit: &str,
        message: Message,
    ) -> Self {
        Self {
            session_state: ResponseSessionState {
                session_attributes,
                dialog_action: DialogAction {
                    action_type: DialogActionType::ElicitSlot,
                    slot_to_elicit: Some(slot_to_elicit.to_string()),
                },
                intent: ResponseIntent {
                    name: intent_name.to_string(),
                    state: None,
                    slots: Some(slots),
                },
            },
            messages: vec![message],
        }
    }
}
