use psp_gateway::domain::payment::TransactionStatus;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::sync::Arc;

mod common;

#[tokio::test]
async fn test_approved_end_to_end() {
    let processor = common::processor();
    let response = processor
        .process_payment(common::request("4242424242424242"))
        .await
        .unwrap();

    assert_eq!(response.status, TransactionStatus::Approved);
    assert_eq!(response.message, "Processed by Acquirer A");
    assert!(!response.transaction_id.to_string().is_empty());
}

#[tokio::test]
async fn test_denied_end_to_end() {
    let processor = common::processor();
    let response = processor
        .process_payment(common::request("4111111111111111"))
        .await
        .unwrap();

    assert_eq!(response.status, TransactionStatus::Denied);
    assert_eq!(response.message, "Processed by Acquirer B");

    let stored = processor
        .transaction(response.transaction_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, TransactionStatus::Denied);
    assert_eq!(stored.request.merchant_id, "M123");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_payments_do_not_interfere() {
    let processor = Arc::new(common::processor());
    let mut rng = StdRng::seed_from_u64(42);
    let cards: Vec<String> = (0..500).map(|_| common::random_card(&mut rng, 16)).collect();

    let handles: Vec<_> = cards
        .into_iter()
        .map(|card| {
            let processor = Arc::clone(&processor);
            tokio::spawn(async move {
                let response = processor
                    .process_payment(common::request(&card))
                    .await
                    .unwrap();
                (card, response)
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let (card, response) = handle.await.unwrap();

        let expected_status = if common::last_digit(&card) % 2 == 0 {
            TransactionStatus::Approved
        } else {
            TransactionStatus::Denied
        };
        let expected_acquirer = if common::bin_digit_sum(&card) % 2 == 0 { "A" } else { "B" };

        assert_eq!(response.status, expected_status);
        assert_eq!(
            response.message,
            format!("Processed by Acquirer {expected_acquirer}")
        );

        let stored = processor
            .transaction(response.transaction_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, expected_status);
        assert_eq!(stored.request.card_number.as_str(), card);

        assert!(ids.insert(response.transaction_id), "transaction id reused");
    }

    assert_eq!(ids.len(), 500);
    assert_eq!(processor.transaction_count().await.unwrap(), 500);
}
