//! Suggestion Dispatcher Lambda - Emails restaurant suggestions for queued requests.
//!
//! This Lambda runs on an EventBridge schedule and:
//! 1. Short-polls the reservation queue for up to 10 requests
//! 2. Looks up restaurants for each requested cuisine in the search index
//! 3. Fetches and ranks the sampled restaurants from DynamoDB
//! 4. Emails the suggestions via SES and acknowledges the message

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Deserialize;
use shared::{
    resolve_search_credentials, DispatchReport, DispatchSettings, DispatcherConfig,
    DynamoRestaurantStore, OpenSearchClient, SesMailer, SqsQueue, SuggestionDispatcher,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct ScheduledEvent {
    // EventBridge scheduled event
    #[serde(default, rename = "detail-type")]
    detail_type: String,
}

struct AppState {
    dispatcher: SuggestionDispatcher,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = DispatcherConfig::from_env()?;
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let secrets_client = aws_sdk_secretsmanager::Client::new(&aws_config);
        let credentials =
            resolve_search_credentials(&secrets_client, &config.search.credentials).await?;

        let queue = SqsQueue::new(aws_sdk_sqs::Client::new(&aws_config), config.queue_url.clone());
        let search = OpenSearchClient::new(
            reqwest::Client::new(),
            config.search.endpoint.clone(),
            config.search.index.clone(),
            credentials,
        );
        let store = DynamoRestaurantStore::new(
            aws_sdk_dynamodb::Client::new(&aws_config),
            config.restaurant_table.clone(),
        );
        let mailer = SesMailer::new(aws_sdk_ses::Client::new(&aws_config));

        info!(
            queue_url = %config.queue_url,
            table = %config.restaurant_table,
            sample_size = config.sample_size,
            "Suggestion dispatcher configured"
        );

        Ok(Self {
            dispatcher: SuggestionDispatcher::new(
                Arc::new(queue),
                Arc::new(search),
                Arc::new(store),
                Arc::new(mailer),
                DispatchSettings::from(&config),
            ),
        })
    }
}

async fn handler(
    state: Arc<AppState>,
    event: LambdaEvent<ScheduledEvent>,
) -> Result<DispatchReport, Error> {
    info!(detail_type = %event.payload.detail_type, "Starting suggestion dispatch");

    Ok(state.dispatcher.run().await?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);
    let state_clone = state.clone();

    run(service_fn(move |event| {
        let state = state_clone.clone();
        async move { handler(state, event).await }
    }))
    .await
}
