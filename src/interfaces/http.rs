//! HTTP API for submitting and inspecting payments.
//!
//! `POST /payments` validates the JSON body and hands it to the
//! [`PaymentProcessor`]; `GET /payments/{id}` returns the stored record;
//! `GET /health` reports liveness and the number of recorded transactions.

use crate::application::processor::PaymentProcessor;
use crate::domain::card::CardNumber;
use crate::domain::payment::{
    Amount, PaymentResponse, Transaction, TransactionId, TransactionStatus,
};
use crate::domain::routing::AcquirerId;
use crate::error::{FieldError, PaymentError};
use crate::interfaces::validation::PaymentRequestBody;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared handler state. Cloning shares the same processor.
#[derive(Clone)]
pub struct AppState {
    processor: Arc<PaymentProcessor>,
}

impl AppState {
    pub fn new(processor: PaymentProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/payments", post(create_payment))
        .route("/payments/{id}", get(get_payment))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    errors: Vec<FieldError>,
}

/// Stored transaction as exposed over HTTP. The card number is masked.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionView {
    transaction_id: TransactionId,
    status: TransactionStatus,
    acquirer: AcquirerId,
    card_number: CardNumber,
    amount: Amount,
    currency: String,
    merchant_id: String,
}

impl From<Transaction> for TransactionView {
    fn from(tx: Transaction) -> Self {
        let acquirer = tx.acquirer();
        Self {
            transaction_id: tx.id,
            status: tx.status,
            acquirer,
            card_number: tx.request.card_number,
            amount: tx.request.amount,
            currency: tx.request.currency,
            merchant_id: tx.request.merchant_id,
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    transactions: usize,
}

/// Everything a handler can fail with, mapped onto a status code and body.
#[derive(Debug)]
enum ApiError {
    MalformedBody(String),
    NotFound(TransactionId),
    Payment(PaymentError),
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        ApiError::Payment(err)
    }
}

fn error_body(status: StatusCode, errors: Vec<FieldError>) -> Response {
    (status, Json(ErrorBody { errors })).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MalformedBody(message) => {
                error_body(StatusCode::BAD_REQUEST, vec![FieldError::new("body", message)])
            }
            ApiError::NotFound(id) => error_body(
                StatusCode::NOT_FOUND,
                vec![FieldError::new(
                    "transactionId",
                    format!("Transaction {id} not found"),
                )],
            ),
            ApiError::Payment(PaymentError::Validation(errors)) => {
                error_body(StatusCode::BAD_REQUEST, errors)
            }
            ApiError::Payment(err @ PaymentError::InvalidTransactionId(_)) => error_body(
                StatusCode::BAD_REQUEST,
                vec![FieldError::new("transactionId", err.to_string())],
            ),
            ApiError::Payment(PaymentError::ProcessingFailed {
                transaction_id,
                reason,
            }) => (
                StatusCode::BAD_GATEWAY,
                Json(PaymentResponse {
                    transaction_id,
                    status: TransactionStatus::Pending,
                    message: format!("Processing failed: {reason}"),
                }),
            )
                .into_response(),
            ApiError::Payment(err) => {
                error!(error = %err, "Internal error while handling payment");
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec![FieldError::new("internal", err.to_string())],
                )
            }
        }
    }
}

async fn create_payment(
    State(state): State<AppState>,
    payload: Result<Json<PaymentRequestBody>, JsonRejection>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;

    let request = body.validate().inspect_err(|err| {
        info!(error = %err, "Rejected payment request");
    })?;

    let response = state.processor.process_payment(request).await?;
    Ok(Json(response))
}

async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TransactionView>, ApiError> {
    let id: TransactionId = id.parse()?;
    let tx = state
        .processor
        .transaction(id)
        .await?
        .ok_or(ApiError::NotFound(id))?;
    Ok(Json(tx.into()))
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let transactions = state.processor.transaction_count().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        transactions,
    }))
}
