#![allow(dead_code)]

use psp_gateway::application::processor::PaymentProcessor;
use psp_gateway::domain::card::CardNumber;
use psp_gateway::domain::payment::{Amount, PaymentRequest};
use psp_gateway::infrastructure::in_memory::InMemoryTransactionStore;
use psp_gateway::infrastructure::mock_acquirer::MockAcquirerGateway;
use rand::Rng;
use rust_decimal_macros::dec;

pub fn request(card: &str) -> PaymentRequest {
    PaymentRequest {
        card_number: CardNumber::parse(card).expect("test card must be valid"),
        expiry_date: "12/25".to_string(),
        cvv: "123".to_string(),
        amount: Amount::new(dec!(100.0)).unwrap(),
        currency: "USD".to_string(),
        merchant_id: "M123".to_string(),
    }
}

pub fn processor() -> PaymentProcessor {
    PaymentProcessor::new(
        Box::new(InMemoryTransactionStore::new()),
        Box::new(MockAcquirerGateway::new()),
    )
}

/// Luhn check digit for `payload` (the card number without its last digit).
pub fn luhn_check_digit(payload: &str) -> char {
    let sum: u32 = payload
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    char::from(b'0' + ((10 - sum % 10) % 10) as u8)
}

/// A random Luhn-valid card number of exactly `len` digits.
pub fn random_card<R: Rng>(rng: &mut R, len: usize) -> String {
    let mut number: String = (0..len - 1)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    let check = luhn_check_digit(&number);
    number.push(check);
    number
}

pub fn bin_digit_sum(card: &str) -> u32 {
    card[..6].bytes().map(|b| u32::from(b - b'0')).sum()
}

pub fn last_digit(card: &str) -> u8 {
    card.as_bytes()[card.len() - 1] - b'0'
}
