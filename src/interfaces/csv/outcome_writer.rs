use crate::domain::payment::PaymentResponse;
use crate::error::Result;
use std::io::Write;

/// Writes payment outcomes as CSV with a `transactionId,status,message` header.
pub struct OutcomeWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write(&mut self, response: &PaymentResponse) -> Result<()> {
        self.writer.serialize(response)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
