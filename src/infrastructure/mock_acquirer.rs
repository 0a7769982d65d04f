use crate::domain::card::CardNumber;
use crate::domain::payment::Decision;
use crate::domain::ports::{AcquirerGateway, GatewayError};
use crate::domain::routing::AcquirerId;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Stand-in acquirer that approves cards ending in an even digit and denies
/// the rest. The acquirer id is logged but does not affect the decision.
#[derive(Debug, Clone, Default)]
pub struct MockAcquirerGateway {
    latency: Option<Duration>,
}

impl MockAcquirerGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every decision by `latency`, to simulate a slow network acquirer.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
        }
    }
}

#[async_trait]
impl AcquirerGateway for MockAcquirerGateway {
    async fn process(
        &self,
        card: &CardNumber,
        acquirer: AcquirerId,
    ) -> Result<Decision, GatewayError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let decision = if card.last_digit() % 2 == 0 {
            Decision::Approved
        } else {
            Decision::Denied
        };
        debug!(card = %card.masked(), %acquirer, ?decision, "Mock acquirer decision");
        Ok(decision)
    }
}
