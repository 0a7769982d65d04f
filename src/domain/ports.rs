use super::card::CardNumber;
use super::payment::{Decision, PaymentRequest, Transaction, TransactionId};
use super::routing::AcquirerId;
use crate::error::Result;
use async_trait::async_trait;
use thiserror::Error;

/// Failure talking to an acquirer. Distinct from a `Denied` decision.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("acquirer {0} unavailable")]
    Unavailable(AcquirerId),
}

/// Obtains an approve/deny decision from an acquirer.
///
/// Implementations must not mutate or persist anything. Real integrations may
/// be slow or fail; callers treat every call as a suspension point.
#[async_trait]
pub trait AcquirerGateway: Send + Sync {
    async fn process(
        &self,
        card: &CardNumber,
        acquirer: AcquirerId,
    ) -> std::result::Result<Decision, GatewayError>;
}

/// Registry of transactions keyed by id.
///
/// Callers always receive copies; the store owns the canonical record.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Inserts a new `Pending` record. Fails with `DuplicateTransaction` if `id` exists.
    async fn create(&self, id: TransactionId, request: PaymentRequest) -> Result<Transaction>;

    /// Moves a `Pending` record to the terminal status for `decision`.
    ///
    /// Fails with `TransactionNotFound` for unknown ids and `AlreadyFinalized`
    /// if the record has already left `Pending`.
    async fn update_status(&self, id: TransactionId, decision: Decision) -> Result<Transaction>;

    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>>;

    async fn count(&self) -> Result<usize>;
}

pub type TransactionStoreBox = Box<dyn TransactionStore>;
pub type AcquirerGatewayBox = Box<dyn AcquirerGateway>;
