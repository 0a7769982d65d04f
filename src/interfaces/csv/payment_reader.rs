use crate::error::{PaymentError, Result};
use crate::interfaces::validation::PaymentRequestBody;
use std::io::Read;

/// Reads payment requests from a CSV source.
///
/// The header row uses the same camelCase field names as the JSON API.
/// Records are returned unvalidated; see [`PaymentRequestBody::validate`].
pub struct PaymentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PaymentReader<R> {
    /// Creates a new `PaymentReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes requests,
    /// paired with the line number each record starts on.
    pub fn payments(mut self) -> impl Iterator<Item = (u64, Result<PaymentRequestBody>)> {
        let headers = self.reader.headers().cloned().ok();
        self.reader.into_records().map(move |record| -> (u64, Result<PaymentRequestBody>) {
            let record = match record {
                Ok(record) => record,
                Err(e) => return (e.position().map_or(0, |p| p.line()), Err(e.into())),
            };
            let line = record.position().map_or(0, |p| p.line());
            let body = record
                .deserialize(headers.as_ref())
                .map_err(PaymentError::from);
            (line, body)
        })
    }
}
