//! CSV batch interface: read payment requests, run them through the
//! processor one by one and write the outcomes.

pub mod outcome_writer;
pub mod payment_reader;

use crate::application::processor::PaymentProcessor;
use crate::error::{PaymentError, Result};
use outcome_writer::OutcomeWriter;
use payment_reader::PaymentReader;
use std::io::{Read, Write};
use tracing::info;

/// Counts of what happened to each row of a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub rejected: usize,
    pub failed: usize,
}

/// Processes every row of `reader` and writes one outcome per processed row.
///
/// Bad rows are reported on stderr and skipped; only writer failures abort
/// the batch.
pub async fn run_batch<R: Read, W: Write>(
    processor: &PaymentProcessor,
    reader: PaymentReader<R>,
    writer: &mut OutcomeWriter<W>,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for (line, body) in reader.payments() {
        let request = match body.and_then(|body| body.validate()) {
            Ok(request) => request,
            Err(PaymentError::Validation(errors)) => {
                let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
                eprintln!("Rejected payment on line {line}: {}", details.join("; "));
                summary.rejected += 1;
                continue;
            }
            Err(e) => {
                eprintln!("Error reading payment on line {line}: {e}");
                summary.rejected += 1;
                continue;
            }
        };

        match processor.process_payment(request).await {
            Ok(response) => {
                writer.write(&response)?;
                summary.processed += 1;
            }
            Err(e) => {
                eprintln!("Error processing payment on line {line}: {e}");
                summary.failed += 1;
            }
        }
    }

    writer.flush()?;
    info!(
        processed = summary.processed,
        rejected = summary.rejected,
        failed = summary.failed,
        "Batch complete"
    );
    Ok(summary)
}
