//! Ledger transactions and amount coercion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when building a transaction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransactionError {
    #[error("amount is not a number: {0:?}")]
    InvalidAmount(String),

    #[error("amount must be finite, got {0}")]
    NonFiniteAmount(f64),
}

/// A value transfer recorded in a block.
///
/// The ledger has no notion of accounts: sender and recipient are opaque
/// labels and the amount is never checked against a balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transaction {
    /// Sending party.
    pub sender: String,
    /// Receiving party.
    pub recipient: String,
    /// Transferred amount, always stored as a float.
    pub amount: f64,
}

impl Transaction {
    /// Create a transaction, coercing the amount to a finite float.
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: impl IntoAmount,
    ) -> Result<Self, TransactionError> {
        Ok(Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount: amount.into_amount()?,
        })
    }
}

/// Conversion of caller-supplied amounts into the stored float form.
///
/// Integers, floats and decimal strings are accepted so that the same logical
/// amount always serializes the same way (`1`, `1.0` and `"1"` all become
/// `1.0`).
pub trait IntoAmount {
    fn into_amount(self) -> Result<f64, TransactionError>;
}

fn finite(value: f64) -> Result<f64, TransactionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TransactionError::NonFiniteAmount(value))
    }
}

impl IntoAmount for f64 {
    fn into_amount(self) -> Result<f64, TransactionError> {
        finite(self)
    }
}

impl IntoAmount for f32 {
    fn into_amount(self) -> Result<f64, TransactionError> {
        finite(f64::from(self))
    }
}

macro_rules! int_amount {
    ($($t:ty),*) => {
        $(
            impl IntoAmount for $t {
                fn into_amount(self) -> Result<f64, TransactionError> {
                    Ok(self as f64)
                }
            }
        )*
    };
}

int_amount!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl IntoAmount for &str {
    fn into_amount(self) -> Result<f64, TransactionError> {
        let trimmed = self.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| TransactionError::InvalidAmount(self.to_string()))?;
        finite(value)
    }
}

impl IntoAmount for String {
    fn into_amount(self) -> Result<f64, TransactionError> {
        self.as_str().into_amount()
    }
}

impl IntoAmount for &String {
    fn into_amount(self) -> Result<f64, TransactionError> {
        self.as_str().into_amount()
    }
}
