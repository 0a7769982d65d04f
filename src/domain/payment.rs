use super::card::CardNumber;
use super::routing::{AcquirerId, choose_acquirer};
use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A strictly positive payment amount.
///
/// No currency normalization is applied; the value is carried as submitted.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Amount(Decimal);

impl Amount {
    /// Returns `None` unless `value` is strictly positive.
    pub fn new(value: Decimal) -> Option<Self> {
        (value > Decimal::ZERO).then_some(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A payment request that has passed field validation.
///
/// Only `card_number` drives routing and the acquirer decision; the other
/// fields are carried through to the stored transaction.
#[derive(Clone, PartialEq)]
pub struct PaymentRequest {
    pub card_number: CardNumber,
    pub expiry_date: String,
    pub cvv: String,
    pub amount: Amount,
    pub currency: String,
    pub merchant_id: String,
}

impl fmt::Debug for PaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentRequest")
            .field("card_number", &self.card_number)
            .field("amount", &self.amount)
            .field("currency", &self.currency)
            .field("merchant_id", &self.merchant_id)
            .finish_non_exhaustive()
    }
}

/// Opaque transaction identifier backed by a random (v4) UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for TransactionId {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| PaymentError::InvalidTransactionId(s.to_string()))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

/// The acquirer's verdict on a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TransactionStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

impl TransactionStatus {
    /// `Approved` and `Denied` are final; nothing transitions out of them.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl From<Decision> for TransactionStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approved => TransactionStatus::Approved,
            Decision::Denied => TransactionStatus::Denied,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Pending => f.write_str("Pending"),
            TransactionStatus::Approved => f.write_str("Approved"),
            TransactionStatus::Denied => f.write_str("Denied"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub request: PaymentRequest,
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn pending(id: TransactionId, request: PaymentRequest) -> Self {
        Self {
            id,
            request,
            status: TransactionStatus::Pending,
        }
    }

    /// The acquirer this transaction is routed to.
    ///
    /// Routing depends only on the BIN of the immutable request, so this is
    /// always the acquirer that decided (or will decide) the transaction.
    pub fn acquirer(&self) -> AcquirerId {
        choose_acquirer(&self.request.card_number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub transaction_id: TransactionId,
    pub status: TransactionStatus,
    pub message: String,
}

impl PaymentResponse {
    pub fn processed(transaction_id: TransactionId, decision: Decision, acquirer: AcquirerId) -> Self {
        Self {
            transaction_id,
            status: decision.into(),
            message: format!("Processed by Acquirer {acquirer}"),
        }
    }
}
