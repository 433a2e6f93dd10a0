//! Intake Dialog Lambda - Lex V2 code hook for the dining concierge bot.
//!
//! Invoked by the bot on every turn and:
//! 1. Answers greeting and thank-you intents
//! 2. Validates dining suggestion slots, re-eliciting the first bad one
//! 3. On fulfillment, queues the reservation request for the dispatcher

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use shared::{IntakeConfig, IntakeHandler, LexEvent, LexResponse, SqsQueue};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

struct AppState {
    intake: IntakeHandler,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = IntakeConfig::from_env()?;
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let sqs_client = aws_sdk_sqs::Client::new(&aws_config);

        let queue = Arc::new(SqsQueue::new(sqs_client, config.queue_url.clone()));

        Ok(Self {
            intake: IntakeHandler::new(queue, &config),
        })
    }
}

async fn handler(state: Arc<AppState>, event: LambdaEvent<LexEvent>) -> Result<LexResponse, Error> {
    debug!(request_id = %event.context.request_id, "Received Lex event");

    let response = state.intake.handle(event.payload).await?;

    debug!(response = %serde_json::to_string(&response)?, "Returning Lex response");
    Ok(response)
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
