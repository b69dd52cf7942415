//! Strongly-typed satoshi amounts.
//!
//! The signature hash of a segwit or taproot input commits to the value of the
//! output it spends, so signature checkers carry the spent [`Amount`] alongside
//! the transaction.

use std::{convert::TryFrom, fmt, ops::RangeInclusive};

#[cfg(test)]
mod tests;

/// The result of an amount operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The number of satoshis in one bitcoin.
pub const COIN: i64 = 100_000_000;

/// The maximum number of satoshis that can ever exist.
pub const MAX_MONEY: i64 = 21_000_000 * COIN;

/// The range of valid [`Amount`] values.
pub const VALID_RANGE: RangeInclusive<i64> = 0..=MAX_MONEY;

/// A runtime validated amount of satoshis, in the range `0..=MAX_MONEY`.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64")]
#[serde(into = "i64")]
pub struct Amount(i64);

impl Amount {
    /// Create a new [`Amount`] from a provided value in satoshis.
    ///
    /// # Panics
    ///
    /// If `satoshis` is outside the valid range. Use `try_from` for untrusted values.
    pub const fn new(satoshis: i64) -> Self {
        assert!(satoshis <= MAX_MONEY && satoshis >= 0);
        Self(satoshis)
    }

    /// Create a zero `Amount`.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Returns the number of satoshis in this amount.
    pub fn satoshis(&self) -> i64 {
        self.0
    }

    /// To little endian byte array
    pub fn to_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// From little endian byte array
    pub fn from_bytes(bytes: [u8; 8]) -> Result<Amount> {
        i64::from_le_bytes(bytes).try_into()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sats = self.satoshis();

        f.pad_integral(sats >= 0, "", &sats.to_string())
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Amount").field(&self.0).finish()
    }
}

impl TryFrom<i64> for Amount {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if VALID_RANGE.contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::Constraint {
                value,
                range: VALID_RANGE,
            })
        }
    }
}

impl TryFrom<u64> for Amount {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        let value = i64::try_from(value).map_err(|source| Error::Convert {
            value: value.into(),
            source,
        })?;

        value.try_into()
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> Self {
        amount
            .0
            .try_into()
            .expect("non-negative i64 amounts are always valid u64 values")
    }
}

#[allow(missing_docs)]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors that can be returned when validating [`Amount`]s.
pub enum Error {
    #[error("input {value} is outside of valid range for satoshi Amount, valid_range={range:?}")]
    Constraint {
        value: i64,
        range: RangeInclusive<i64>,
    },

    #[error("{value} could not be converted to an i64 Amount")]
    Convert {
        value: i128,
        source: std::num::TryFromIntError,
    },
}

impl Error {
    /// Returns the invalid value for this error.
    pub fn invalid_value(&self) -> i128 {
        match self {
            Error::Constraint { value, .. } => (*value).into(),
            Error::Convert { value, .. } => *value,
        }
    }
}
