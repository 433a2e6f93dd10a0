//! AWS Secrets Manager integration.

use aws_sdk_secretsmanager::Client as SecretsClient;
use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::config::SearchCredentialSource;
use crate::search::SearchCredentials;
use crate::{Error, Result};

/// Cached secrets with lazy initialization.
static SECRETS_CACHE: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

fn get_cache() -> &'static RwLock<HashMap<String, String>> {
    SECRETS_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Get a secret value from Secrets Manager with caching.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    {
        let cache = get_cache().read().await;
        if let Some(value) = cache.get(secret_arn) {
            return Ok(value.clone());
        }
    }

    let response = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Aws(format!("Failed to get secret: {}", e)))?;

    let secret_string = response
        .secret_string()
        .ok_or_else(|| Error::Aws("Secret has no string value".to_string()))?
        .to_string();

    {
        let mut cache = get_cache().write().await;
        cache.insert(secret_arn.to_string(), secret_string.clone());
    }

    Ok(secret_string)
}

fn parse_search_credentials(secret_string: &str) -> Result<SearchCredentials> {
    serde_json::from_str(secret_string)
        .map_err(|e| Error::Aws(format!("Failed to parse search credentials: {}", e)))
}

/// Resolve search cluster credentials from configuration.
pub async fn resolve_search_credentials(
    client: &SecretsClient,
    source: &SearchCredentialSource,
) -> Result<SearchCredentials> {
    match source {
        SearchCredentialSource::Basic { username, password } => Ok(SearchCredentials {
            username: username.clone(),
            password: password.clone(),
        }),
        SearchCredentialSource::Secret { secret_arn } => {
            let secret_string = get_secret(client, secret_arn).await?;
            parse_search_credentials(&secret_string)
        }
    }
}
