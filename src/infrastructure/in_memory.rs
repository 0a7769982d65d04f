use crate::domain::payment::{
    Decision, PaymentRequest, Transaction, TransactionId, TransactionStatus,
};
use crate::domain::ports::TransactionStore;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const DEFAULT_SHARDS: usize = 16;

type Shard = RwLock<HashMap<TransactionId, Transaction>>;

/// A thread-safe in-memory store for transactions.
///
/// Records are spread over independently locked shards, selected by the
/// transaction id's UUID value modulo the shard count. v4 ids are random, so
/// this spreads evenly. Writers to different shards never wait on each other. `Clone` shares the underlying shards.
#[derive(Clone)]
pub struct InMemoryTransactionStore {
    shards: Arc<[Shard]>,
}

impl InMemoryTransactionStore {
    /// Creates a new, empty store with [`DEFAULT_SHARDS`] shards.
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }

    /// Creates a new, empty store with `shards` shards (at least one).
    pub fn with_shards(shards: usize) -> Self {
        let shards = (0..shards.max(1))
            .map(|_| RwLock::new(HashMap::new()))
            .collect();
        Self { shards }
    }

    fn shard_index(&self, id: &TransactionId) -> usize {
        (id.as_uuid().as_u128() % self.shards.len() as u128) as usize
    }

    fn shard(&self, id: &TransactionId) -> &Shard {
        &self.shards[self.shard_index(id)]
    }
}

impl Default for InMemoryTransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn create(&self, id: TransactionId, request: PaymentRequest) -> Result<Transaction> {
        let mut shard = self.shard(&id).write().await;
        if shard.contains_key(&id) {
            return Err(PaymentError::DuplicateTransaction(id));
        }
        let tx = Transaction::pending(id, request);
        shard.insert(id, tx.clone());
        Ok(tx)
    }

    async fn update_status(&self, id: TransactionId, decision: Decision) -> Result<Transaction> {
        let mut shard = self.shard(&id).write().await;
        let tx = shard
            .get_mut(&id)
            .ok_or(PaymentError::TransactionNotFound(id))?;
        if tx.status.is_terminal() {
            return Err(PaymentError::AlreadyFinalized {
                id,
                status: tx.status,
            });
        }
        tx.status = TransactionStatus::from(decision);
        Ok(tx.clone())
    }

    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>> {
        let shard = self.shard(&id).read().await;
        Ok(shard.get(&id).cloned())
    }

    async fn count(&self) -> Result<usize> {
        let mut total = 0;
        for shard in self.shards.iter() {
            total += shard.read().await.len();
        }
        Ok(total)
    }
}
