//! Outbound email via Amazon SES.

use async_trait::async_trait;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use aws_sdk_ses::Client as SesClient;

use crate::{Error, Result};

/// A rendered HTML email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the email, returning the transport's message id.
    async fn send(&self, email: &EmailMessage) -> Result<String>;
}

pub struct SesMailer {
    client: SesClient,
}

impl SesMailer {
    pub fn new(client: SesClient) -> Self {
        Self { client }
    }
}

fn utf8_content(data: &str, what: &str) -> Result<Content> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| Error::Aws(format!("Failed to build {}: {}", what, e)))
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send(&self, email: &EmailMessage) -> Result<String> {
        let subject = utf8_content(&email.subject, "subject")?;
        let html_content = utf8_content(&email.html_body, "body")?;

        let body = Body::builder().html(html_content).build();

        let message = Message::builder().subject(subject).body(body).build();

        let destination = Destination::builder().to_addresses(&email.to).build();

        let result = self
            .client
            .send_email()
            .source(&email.from)
            .destination(destination)
            .message(message)
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to send email: {}", e)))?;

        Ok(result.message_id().to_string())
    }
}
