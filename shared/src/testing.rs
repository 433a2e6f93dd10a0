//! In-memory collaborators for unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::mailer::{EmailMessage, Mailer};
use crate::models::{ReservationRequest, Restaurant};
use crate::queue::{OutgoingMessage, QueueMessage, ReceiveOptions, ReservationQueue};
use crate::search::RestaurantSearch;
use crate::store::RestaurantStore;
use crate::{Error, Result};

/// A received message carrying a valid reservation for `cuisine`.
pub fn reservation_message(id: &str, cuisine: &str) -> QueueMessage {
    let request = ReservationRequest {
        city: "Manhattan".to_string(),
        cuisine: cuisine.to_string(),
        date: "2030-05-02".to_string(),
        time: "7 pm".to_string(),
        people: 2,
        phone_number: "2125550100".to_string(),
        email: "Diner@Example.com".to_string(),
    };

    QueueMessage {
        message_id: Some(id.to_string()),
        receipt_handle: format!("receipt-{}", id),
        body: Some(request.summary()),
        attributes: request
            .to_attributes()
            .into_iter()
            .map(|attr| (attr.name, attr.value))
            .collect(),
    }
}

#[derive(Default)]
pub struct FakeQueue {
    pending: Mutex<Vec<QueueMessage>>,
    published: Mutex<Vec<OutgoingMessage>>,
    receives: Mutex<Vec<ReceiveOptions>>,
    deleted: Mutex<Vec<String>>,
    fail_publish: bool,
    fail_receive: bool,
    fail_delete: bool,
}

impl FakeQueue {
    pub fn with_messages(messages: Vec<QueueMessage>) -> Self {
        Self {
            pending: Mutex::new(messages),
            ..Default::default()
        }
    }

    pub fn failing_publish() -> Self {
        Self {
            fail_publish: true,
            ..Default::default()
        }
    }

    pub fn failing_receive() -> Self {
        Self {
            fail_receive: true,
            ..Default::default()
        }
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn published(&self) -> Vec<OutgoingMessage> {
        self.published.lock().unwrap().clone()
    }

    pub fn receives(&self) -> Vec<ReceiveOptions> {
        self.receives.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReservationQueue for FakeQueue {
    async fn publish(&self, message: OutgoingMessage) -> Result<String> {
        if self.fail_publish {
            return Err(Error::Aws("publish rejected".to_string()));
        }
        let mut published = self.published.lock().unwrap();
        published.push(message);
        Ok(format!("msg-{}", published.len()))
    }

    async fn receive(&self, options: ReceiveOptions) -> Result<Vec<QueueMessage>> {
        self.receives.lock().unwrap().push(options);
        if self.fail_receive {
            return Err(Error::Aws("receive failed".to_string()));
        }
        let mut pending = self.pending.lock().unwrap();
        let take = (options.max_messages.max(0) as usize).min(pending.len());
        Ok(pending.drain(..take).collect())
    }

    async fn delete(&self, receipt_handle: &str) -> Result<()> {
        if self.fail_delete {
            return Err(Error::Aws("delete failed".to_string()));
        }
        self.deleted.lock().unwrap().push(receipt_handle.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSearch {
    index: HashMap<String, Vec<String>>,
    queries: Mutex<Vec<(String, u32)>>,
}

impl FakeSearch {
    pub fn with(cuisine: &str, ids: &[&str]) -> Self {
        Self {
            index: HashMap::from([(
                cuisine.to_string(),
                ids.iter().map(|id| id.to_string()).collect(),
            )]),
            ..Default::default()
        }
    }

    pub fn queries(&self) -> Vec<(String, u32)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl RestaurantSearch for FakeSearch {
    async fn ids_for_cuisine(&self, cuisine: &str, size: u32) -> Result<Vec<String>> {
        self.queries.lock().unwrap().push((cuisine.to_string(), size));
        Ok(self
            .index
            .get(cuisine)
            .map(|ids| ids.iter().take(size as usize).cloned().collect())
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeStore {
    records: HashMap<String, Restaurant>,
    requests: Mutex<Vec<Vec<String>>>,
}

impl FakeStore {
    pub fn with(restaurants: Vec<Restaurant>) -> Self {
        Self {
            records: restaurants
                .into_iter()
                .map(|r| (r.business_id.clone(), r))
                .collect(),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RestaurantStore for FakeStore {
    async fn batch_get(&self, ids: &[String]) -> Result<Vec<Restaurant>> {
        self.requests.lock().unwrap().push(ids.to_vec());
        Ok(ids
            .iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect())
    }
}

#[derive(Default)]
pub struct FakeMailer {
    sent: Mutex<Vec<EmailMessage>>,
    attempts: Mutex<usize>,
    fail_first: usize,
}

impl FakeMailer {
    /// Reject the first `n` sends.
    pub fn failing_first(n: usize) -> Self {
        Self {
            fail_first: n,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, email: &EmailMessage) -> Result<String> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            *attempts
        };
        if attempt <= self.fail_first {
            return Err(Error::Aws("Email address is not verified".to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(email.clone());
        Ok(format!("ses-{}", sent.len()))
    }
}
