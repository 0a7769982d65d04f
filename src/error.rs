use crate::domain::payment::{TransactionId, TransactionStatus};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single rejected request field, reported back to the client as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Transaction {0} already exists")]
    DuplicateTransaction(TransactionId),

    #[error("Transaction {0} not found")]
    TransactionNotFound(TransactionId),

    #[error("Transaction {id} is already {status}")]
    AlreadyFinalized {
        id: TransactionId,
        status: TransactionStatus,
    },

    #[error("Processing failed for transaction {transaction_id}: {reason}")]
    ProcessingFailed {
        transaction_id: TransactionId,
        reason: String,
    },

    #[error("Invalid transaction id: {0}")]
    InvalidTransactionId(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, PaymentError>;
