use crate::domain::card::CardNumber;
use crate::domain::payment::{Amount, PaymentRequest};
use crate::error::{FieldError, PaymentError, Result};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::LazyLock;

static EXPIRY_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])/(\d{2}|\d{4})$").expect("expiry date pattern is valid")
});

static CVV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}$").expect("cvv pattern is valid"));

pub const INVALID_CARD_NUMBER: &str = "Invalid card number";
pub const INVALID_EXPIRY_DATE: &str =
    "expiryDate must be in MM/YY or MM/YYYY format and month between 01 and 12";
pub const INVALID_CVV: &str = "CVV must be 3 or 4 digits";
pub const INVALID_AMOUNT: &str = "Amount must be positive";
pub const UNREPRESENTABLE_AMOUNT: &str = "Amount is out of the supported range";
pub const MISSING_CURRENCY: &str = "Currency is required";
pub const MISSING_MERCHANT_ID: &str = "Merchant ID is required";

/// A payment request as submitted by a client, before any checks.
///
/// Every field is optional so that a missing field is reported alongside the
/// others instead of failing deserialization. Field names are camelCase on
/// the wire, both in JSON bodies and in CSV headers. `amount` is read as any
/// JSON or CSV number and only converted to a decimal during validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequestBody {
    pub card_number: Option<String>,
    pub expiry_date: Option<String>,
    pub cvv: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub merchant_id: Option<String>,
}

impl PaymentRequestBody {
    /// Checks every field and builds a [`PaymentRequest`].
    ///
    /// On failure returns `PaymentError::Validation` with one entry per bad
    /// field, in field order.
    pub fn validate(self) -> Result<PaymentRequest> {
        let mut errors = Vec::new();

        let card_number = self.card_number.as_deref().and_then(CardNumber::parse);
        if card_number.is_none() {
            errors.push(FieldError::new("cardNumber", INVALID_CARD_NUMBER));
        }

        if !matches_pattern(&EXPIRY_DATE, self.expiry_date.as_deref()) {
            errors.push(FieldError::new("expiryDate", INVALID_EXPIRY_DATE));
        }

        if !matches_pattern(&CVV, self.cvv.as_deref()) {
            errors.push(FieldError::new("cvv", INVALID_CVV));
        }

        let amount = match self.amount {
            Some(value) if value > 0.0 => {
                let amount = to_amount(value);
                if amount.is_none() {
                    errors.push(FieldError::new("amount", UNREPRESENTABLE_AMOUNT));
                }
                amount
            }
            _ => {
                errors.push(FieldError::new("amount", INVALID_AMOUNT));
                None
            }
        };

        if is_blank(self.currency.as_deref()) {
            errors.push(FieldError::new("currency", MISSING_CURRENCY));
        }

        if is_blank(self.merchant_id.as_deref()) {
            errors.push(FieldError::new("merchantId", MISSING_MERCHANT_ID));
        }

        match (card_number, amount) {
            (Some(card_number), Some(amount)) if errors.is_empty() => Ok(PaymentRequest {
                card_number,
                expiry_date: self.expiry_date.unwrap_or_default(),
                cvv: self.cvv.unwrap_or_default(),
                amount,
                currency: self.currency.unwrap_or_default(),
                merchant_id: self.merchant_id.unwrap_or_default(),
            }),
            _ => Err(PaymentError::Validation(errors)),
        }
    }
}

/// Converts through the shortest decimal rendering of `value`, so `49.99`
/// stays `49.99`. Values too large or too fine for `Decimal` give `None`.
fn to_amount(value: f64) -> Option<Amount> {
    Decimal::from_str(&value.to_string())
        .ok()
        .and_then(Amount::new)
}

fn matches_pattern(pattern: &Regex, value: Option<&str>) -> bool {
    value.is_some_and(|v| pattern.is_match(v))
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
