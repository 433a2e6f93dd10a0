//! Reservation queue backed by Amazon SQS.

use async_trait::async_trait;
use aws_sdk_sqs::types::MessageAttributeValue;
use aws_sdk_sqs::Client as SqsClient;
use std::collections::HashMap;

use crate::models::MessageAttribute;
use crate::{Error, Result};

/// A message to publish.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub body: String,
    pub attributes: Vec<MessageAttribute>,
    /// Unique per send
    pub deduplication_id: String,
    /// Ordering scope on FIFO queues
    pub group_id: String,
}

/// A received, not yet acknowledged message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub message_id: Option<String>,
    pub receipt_handle: String,
    pub body: Option<String>,
    /// String values of the message attributes
    pub attributes: HashMap<String, String>,
}

/// Receive parameters.
#[derive(Debug, Clone, Copy)]
pub struct ReceiveOptions {
    pub max_messages: i32,
    pub visibility_timeout_secs: i32,
    /// 0 for a short poll
    pub wait_time_secs: i32,
}

#[async_trait]
pub trait ReservationQueue: Send + Sync {
    /// Publish a message, returning the queue-assigned message id.
    async fn publish(&self, message: OutgoingMessage) -> Result<String>;

    /// Receive up to `options.max_messages` messages with all attributes.
    async fn receive(&self, options: ReceiveOptions) -> Result<Vec<QueueMessage>>;

    /// Acknowledge a received message.
    async fn delete(&self, receipt_handle: &str) -> Result<()>;
}

/// SQS implementation of [`ReservationQueue`].
pub struct SqsQueue {
    client: SqsClient,
    queue_url: String,
}

impl SqsQueue {
    pub fn new(client: SqsClient, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }
}

#[async_trait]
impl ReservationQueue for SqsQueue {
    async fn publish(&self, message: OutgoingMessage) -> Result<String> {
        let mut attributes = HashMap::with_capacity(message.attributes.len());
        for attr in &message.attributes {
            let value = MessageAttributeValue::builder()
                .data_type(attr.data_type.as_str())
                .string_value(&attr.value)
                .build()
                .map_err(|e| Error::Aws(format!("Failed to build attribute {}: {}", attr.name, e)))?;
            attributes.insert(attr.name.clone(), value);
        }

        let response = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(message.body)
            .set_message_attributes(Some(attributes))
            .message_group_id(message.group_id)
            .message_deduplication_id(message.deduplication_id)
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to send message: {}", e)))?;

        Ok(response.message_id().unwrap_or_default().to_string())
    }

    async fn receive(&self, options: ReceiveOptions) -> Result<Vec<QueueMessage>> {
        let response = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(options.max_messages)
            .message_attribute_names("All")
            .visibility_timeout(options.visibility_timeout_secs)
            .wait_time_seconds(options.wait_time_secs)
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to receive messages: {}", e)))?;

        let messages = response
            .messages()
            .iter()
            .filter_map(|message| {
                let receipt_handle = message.receipt_handle()?.to_string();
                let attributes = message
                    .message_attributes()
                    .map(|attrs| {
                        attrs
                            .iter()
                            .filter_map(|(name, value)| {
                                value.string_value().map(|v| (name.clone(), v.to_string()))
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                Some(QueueMessage {
                    message_id: message.message_id().map(String::from),
                    receipt_handle,
                    body: message.body().map(String::from),
                    attributes,
                })
            })
            .collect();

        Ok(messages)
    }

    async fn delete(&self, receipt_handle: &str) -> Result<()> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to delete message: {}", e)))?;

        Ok(())
    }
}
