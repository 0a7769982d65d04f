use serde::{Serialize, Serializer};
use std::fmt;

pub const CARD_NUMBER_MIN_LENGTH: usize = 13;
pub const CARD_NUMBER_MAX_LENGTH: usize = 19;

/// Number of leading digits used as the Bank Identification Number.
pub const BIN_LENGTH: usize = 6;

/// Returns `true` if `candidate` is a structurally valid card number.
///
/// A valid candidate has between 13 and 19 ASCII digits, nothing else, and
/// passes the Luhn checksum. This is a transcription check, not a security
/// control.
pub fn is_valid(candidate: &str) -> bool {
    let len = candidate.len();
    if !(CARD_NUMBER_MIN_LENGTH..=CARD_NUMBER_MAX_LENGTH).contains(&len) {
        return false;
    }
    if !candidate.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    luhn_sum(candidate) % 10 == 0
}

/// Luhn sum over a string already known to be all ASCII digits.
fn luhn_sum(digits: &str) -> u32 {
    digits
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum()
}

/// A card number that has passed [`is_valid`].
///
/// The only way to obtain one is [`CardNumber::parse`], so code holding a
/// `CardNumber` can slice the BIN and the last digit without further checks.
/// `Debug` and `Display` print the masked form.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CardNumber(String);

impl CardNumber {
    pub fn parse(candidate: &str) -> Option<Self> {
        is_valid(candidate).then(|| Self(candidate.to_string()))
    }

    /// The full primary account number. Never log this.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn bin(&self) -> &str {
        &self.0[..BIN_LENGTH]
    }

    pub fn last_digit(&self) -> u8 {
        // Non-empty and all digits by construction.
        self.0.as_bytes()[self.0.len() - 1] - b'0'
    }

    pub fn last_four(&self) -> &str {
        &self.0[self.0.len() - 4..]
    }

    pub fn masked(&self) -> String {
        format!("****{}", self.last_four())
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CardNumber").field(&self.masked()).finish()
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Serializes masked; the full number never leaves the process through serde.
impl Serialize for CardNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.masked())
    }
}
