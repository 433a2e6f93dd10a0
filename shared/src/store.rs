//! Restaurant records in DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, KeysAndAttributes};
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;
use tracing::warn;

use crate::models::Restaurant;
use crate::{Error, Result};

/// Partition key of the restaurant table.
pub const KEY_ATTRIBUTE: &str = "BusinessID";

#[async_trait]
pub trait RestaurantStore: Send + Sync {
    /// Fetch records for `ids`; unknown ids are omitted from the result.
    async fn batch_get(&self, ids: &[String]) -> Result<Vec<Restaurant>>;
}

pub struct DynamoRestaurantStore {
    client: DynamoClient,
    table: String,
}

impl DynamoRestaurantStore {
    pub fn new(client: DynamoClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl RestaurantStore for DynamoRestaurantStore {
    async fn batch_get(&self, ids: &[String]) -> Result<Vec<Restaurant>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<HashMap<String, AttributeValue>> = ids
            .iter()
            .map(|id| HashMap::from([(KEY_ATTRIBUTE.to_string(), AttributeValue::S(id.clone()))]))
            .collect();

        let request = KeysAndAttributes::builder()
            .set_keys(Some(keys))
            .build()
            .map_err(|e| Error::Aws(format!("Failed to build batch request: {}", e)))?;

        let response = self
            .client
            .batch_get_item()
            .request_items(&self.table, request)
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to batch get restaurants: {}", e)))?;

        if let Some(unprocessed) = response
            .unprocessed_keys()
            .and_then(|keys| keys.get(&self.table))
        {
            warn!(
                table = %self.table,
                unprocessed = unprocessed.keys().len(),
                "Batch get left keys unprocessed"
            );
        }

        let items = response
            .responses()
            .and_then(|tables| tables.get(&self.table))
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut restaurants = Vec::with_capacity(items.len());
        for item in items {
            match restaurant_from_item(item) {
                Ok(restaurant) => restaurants.push(restaurant),
                Err(e) => warn!(error = %e, "Skipping malformed restaurant record"),
            }
        }

        Ok(restaurants)
    }
}

fn string_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Option<String> {
    match item.get(name)? {
        AttributeValue::S(value) => Some(value.clone()),
        AttributeValue::N(value) => Some(value.clone()),
        AttributeValue::Ss(values) => Some(values.join(", ")),
        AttributeValue::L(values) => {
            let parts: Vec<String> = values
                .iter()
                .filter_map(|v| v.as_s().ok().cloned())
                .collect();
            Some(parts.join(", "))
        }
        _ => None,
    }
}

fn number_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Option<String> {
    match item.get(name)? {
        AttributeValue::N(value) | AttributeValue::S(value) => Some(value.clone()),
        _ => None,
    }
}

/// Convert a raw DynamoDB item into a [`Restaurant`].
pub fn restaurant_from_item(item: &HashMap<String, AttributeValue>) -> Result<Restaurant> {
    let business_id = string_attr(item, KEY_ATTRIBUTE)
        .ok_or_else(|| Error::Internal(format!("Record missing {}", KEY_ATTRIBUTE)))?;

    let rating = match number_attr(item, "Rating") {
        Some(raw) => raw.trim().parse::<f64>().map_err(|_| Error::InvalidValue {
            name: "Rating".to_string(),
            value: raw.clone(),
        })?,
        None => 0.0,
    };

    Ok(Restaurant {
        name: string_attr(item, "Name").unwrap_or_default(),
        address: string_attr(item, "Address").unwrap_or_default(),
        rating,
        reviews: number_attr(item, "Reviews").and_then(|raw| raw.trim().parse().ok()),
        cuisine: string_attr(item, "Cuisine"),
        zip_code: string_attr(item, "ZipCode"),
        business_id,
    })
}
