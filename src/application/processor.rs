use crate::domain::payment::{PaymentRequest, PaymentResponse, Transaction, TransactionId};
use crate::domain::ports::{AcquirerGatewayBox, TransactionStoreBox};
use crate::domain::routing::choose_acquirer;
use crate::error::{PaymentError, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

/// The entry point for processing card payments.
///
/// `PaymentProcessor` owns the transaction store and the acquirer gateway and
/// drives each request through create, route, decide and record. It holds no
/// per-request state, so one instance serves any number of concurrent calls.
pub struct PaymentProcessor {
    transaction_store: TransactionStoreBox,
    gateway: AcquirerGatewayBox,
    gateway_timeout: Option<Duration>,
}

impl PaymentProcessor {
    /// Creates a new `PaymentProcessor`.
    ///
    /// # Arguments
    ///
    /// * `transaction_store` - Where transactions are recorded.
    /// * `gateway` - The acquirer that decides each payment.
    pub fn new(transaction_store: TransactionStoreBox, gateway: AcquirerGatewayBox) -> Self {
        Self {
            transaction_store,
            gateway,
            gateway_timeout: None,
        }
    }

    /// Bounds every acquirer call by `timeout`. A call that runs over leaves
    /// its transaction `Pending` and is reported as `ProcessingFailed`.
    pub fn with_gateway_timeout(mut self, timeout: Duration) -> Self {
        self.gateway_timeout = Some(timeout);
        self
    }

    /// Processes an already validated payment request.
    ///
    /// No retries and no rollback: if the acquirer fails, the transaction
    /// stays `Pending` in the store and the error carries its id.
    pub async fn process_payment(&self, request: PaymentRequest) -> Result<PaymentResponse> {
        info!(
            merchant = %request.merchant_id,
            amount = %request.amount,
            currency = %request.currency,
            "Processing payment"
        );
        debug!(card = %request.card_number.masked(), "Card number (masked)");

        let card = request.card_number.clone();
        let transaction_id = TransactionId::generate();
        let tx = self.transaction_store.create(transaction_id, request).await?;
        info!(
            merchant = %tx.request.merchant_id,
            %transaction_id,
            status = %tx.status,
            "Created and stored transaction"
        );

        let acquirer = choose_acquirer(&card);
        info!(%transaction_id, %acquirer, "Acquirer chosen");

        let call = self.gateway.process(&card, acquirer);
        let outcome = match self.gateway_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(_) => Err(format!("acquirer {acquirer} timed out after {limit:?}")),
            },
            None => call.await.map_err(|e| e.to_string()),
        };
        let decision = outcome.map_err(|reason| {
            warn!(%transaction_id, %acquirer, %reason, "Acquirer call failed, transaction left pending");
            PaymentError::ProcessingFailed {
                transaction_id,
                reason,
            }
        })?;

        let tx = self
            .transaction_store
            .update_status(transaction_id, decision)
            .await?;
        info!(%transaction_id, status = %tx.status, "Transaction finalized");

        Ok(PaymentResponse::processed(transaction_id, decision, acquirer))
    }

    /// Looks up a transaction, including ones left `Pending` by a failed acquirer call.
    pub async fn transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
        self.transaction_store.get(id).await
    }

    /// Number of transactions recorded so far.
    pub async fn transaction_count(&self) -> Result<usize> {
        self.transaction_store.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::CardNumber;
    use crate::domain::payment::{Amount, Decision, TransactionStatus};
    use crate::domain::ports::{AcquirerGateway, GatewayError, TransactionStore};
    use crate::domain::routing::AcquirerId;
    use crate::infrastructure::in_memory::InMemoryTransactionStore;
    use crate::infrastructure::mock_acquirer::MockAcquirerGateway;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    struct UnavailableGateway;

    #[async_trait]
    impl AcquirerGateway for UnavailableGateway {
        async fn process(
            &self,
            _card: &CardNumber,
            acquirer: AcquirerId,
        ) -> std::result::Result<Decision, GatewayError> {
            Err(GatewayError::Unavailable(acquirer))
        }
    }

    fn request(card: &str) -> PaymentRequest {
        PaymentRequest {
            card_number: CardNumber::parse(card).unwrap(),
            expiry_date: "12/25".to_string(),
            cvv: "123".to_string(),
            amount: Amount::new(dec!(100.0)).unwrap(),
            currency: "USD".to_string(),
            merchant_id: "M123".to_string(),
        }
    }

    fn processor() -> PaymentProcessor {
        PaymentProcessor::new(
            Box::new(InMemoryTransactionStore::new()),
            Box::new(MockAcquirerGateway::new()),
        )
    }

    #[tokio::test]
    async fn test_approved_payment() {
        let processor = processor();
        let response = processor
            .process_payment(request("4242424242424242"))
            .await
            .unwrap();

        assert_eq!(response.status, TransactionStatus::Approved);
        assert_eq!(response.message, "Processed by Acquirer A");

        let stored = processor
            .transaction(response.transaction_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, TransactionStatus::Approved);
        assert_eq!(stored.acquirer(), AcquirerId::A);
    }

    #[tokio::test]
    async fn test_denied_payment() {
        let processor = processor();
        let response = processor
            .process_payment(request("4111111111111111"))
            .await
            .unwrap();

        assert_eq!(response.status, TransactionStatus::Denied);
        assert_eq!(response.message, "Processed by Acquirer B");
    }

    #[tokio::test]
    async fn test_gateway_failure_leaves_transaction_pending() {
        let store = InMemoryTransactionStore::new();
        let processor = PaymentProcessor::new(Box::new(store.clone()), Box::new(UnavailableGateway));

        let err = processor
            .process_payment(request("4242424242424242"))
            .await
            .unwrap_err();

        let transaction_id = match err {
            PaymentError::ProcessingFailed {
                transaction_id,
                reason,
            } => {
                assert_eq!(reason, "acquirer A unavailable");
                transaction_id
            }
            other => panic!("expected ProcessingFailed, got {other:?}"),
        };

        let stored = store.get(transaction_id).await.unwrap().unwrap();
        assert_eq!(stored.status, TransactionStatus::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gateway_timeout_leaves_transaction_pending() {
        let store = InMemoryTransactionStore::new();
        let processor = PaymentProcessor::new(
            Box::new(store.clone()),
            Box::new(MockAcquirerGateway::with_latency(Duration::from_secs(10))),
        )
        .with_gateway_timeout(Duration::from_millis(100));

        let err = processor
            .process_payment(request("4242424242424242"))
            .await
            .unwrap_err();

        let transaction_id = match err {
            PaymentError::ProcessingFailed { transaction_id, .. } => transaction_id,
            other => panic!("expected ProcessingFailed, got {other:?}"),
        };
        let stored = store.get(transaction_id).await.unwrap().unwrap();
        assert_eq!(stored.status, TransactionStatus::Pending);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gateway_within_timeout_succeeds() {
        let processor = PaymentProcessor::new(
            Box::new(InMemoryTransactionStore::new()),
            Box::new(MockAcquirerGateway::with_latency(Duration::from_millis(10))),
        )
        .with_gateway_timeout(Duration::from_secs(1));

        let response = processor
            .process_payment(request("4111111111111111"))
            .await
            .unwrap();
        assert_eq!(response.status, TransactionStatus::Denied);
    }

    #[tokio::test]
    async fn test_each_payment_gets_a_fresh_id() {
        let processor = processor();
        let first = processor
            .process_payment(request("4242424242424242"))
            .await
            .unwrap();
        let second = processor
            .process_payment(request("4242424242424242"))
            .await
            .unwrap();

        assert_ne!(first.transaction_id, second.transaction_id);
        assert_eq!(processor.transaction_count().await.unwrap(), 2);
    }
}
