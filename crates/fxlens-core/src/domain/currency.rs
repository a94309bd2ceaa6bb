use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Validated uppercase 3-letter ISO currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse and normalize a currency code to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();
        let valid =
            normalized.len() == 3 && normalized.bytes().all(|b| b.is_ascii_uppercase());

        if !valid {
            return Err(ValidationError::InvalidCurrency {
                value: input.to_owned(),
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

/// A base→target conversion pair.
///
/// The provider-facing instrument form is the two codes concatenated with
/// the FX suffix, e.g. `USDEUR=X` for USD→EUR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairCode {
    base: CurrencyCode,
    target: CurrencyCode,
}

impl PairCode {
    pub const fn new(base: CurrencyCode, target: CurrencyCode) -> Self {
        Self { base, target }
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn target(&self) -> &CurrencyCode {
        &self.target
    }

    /// Instrument symbol understood by the rate provider.
    pub fn instrument(&self) -> String {
        format!("{}{}=X", self.base, self.target)
    }
}

impl Display for PairCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.instrument())
    }
}
