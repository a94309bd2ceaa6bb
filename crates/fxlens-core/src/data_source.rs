//! Source traits and request/response types.
//!
//! The aligner consumes two upstream series through these contracts: a
//! price source (daily closes plus the asset's native quote currency) and a
//! rate source (daily closes for a conversion pair). Instrument search is a
//! third, independent capability used by suggestion helpers.
//!
//! | Trait | Operations |
//! |-------|------------|
//! | [`PriceSource`] | `quote_currency`, `daily_prices` |
//! | [`RateSource`] | `daily_rates` |
//! | [`InstrumentSearch`] | `search` |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::domain::{CurrencyCode, DailySeries, Day, PairCode, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured source error carried up from provider adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request for daily closing prices over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub start: Day,
    pub end: Day,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, start: Day, end: Day) -> Result<Self, SourceError> {
        if start > end {
            return Err(SourceError::invalid_request(
                "history request start must not be after end",
            ));
        }
        Ok(Self { symbol, start, end })
    }
}

/// Request for daily conversion rates over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatesRequest {
    pub pair: PairCode,
    pub start: Day,
    pub end: Day,
}

impl RatesRequest {
    pub fn new(pair: PairCode, start: Day, end: Day) -> Result<Self, SourceError> {
        if start > end {
            return Err(SourceError::invalid_request(
                "rates request start must not be after end",
            ));
        }
        Ok(Self { pair, start, end })
    }
}

/// Request for instrument search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub limit: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, limit: usize) -> Result<Self, SourceError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(SourceError::invalid_request(
                "search query must not be empty",
            ));
        }
        if limit == 0 {
            return Err(SourceError::invalid_request(
                "search limit must be greater than zero",
            ));
        }
        Ok(Self { query, limit })
    }
}

/// Instrument classification reported by search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    Equity,
    Etf,
    Index,
    Fund,
    Crypto,
    Currency,
    Other,
}

/// One search hit, with the provider's raw instrument symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentMatch {
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: Option<String>,
    pub kind: InstrumentKind,
}

/// Normalized search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBatch {
    pub query: String,
    pub matches: Vec<InstrumentMatch>,
}

/// Daily price history for an asset, plus its native quote currency.
///
/// Implementations must be `Send + Sync`; the aligner shares them across
/// concurrently running fetches.
pub trait PriceSource: Send + Sync {
    /// Currency the asset's quotes are natively denominated in.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the ticker is unknown to the provider or
    /// the provider call fails.
    fn quote_currency<'a>(
        &'a self,
        ticker: Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<CurrencyCode, SourceError>> + Send + 'a>>;

    /// Daily closing prices over the inclusive range, ascending, one entry
    /// per trading day the provider reported.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on provider failure or a malformed payload.
    fn daily_prices<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<DailySeries, SourceError>> + Send + 'a>>;
}

/// Daily conversion-rate history for a currency pair.
pub trait RateSource: Send + Sync {
    /// Daily closing rates, same shape as price history. May legitimately
    /// be empty or sparser than the price series.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on provider failure or a malformed payload.
    fn daily_rates<'a>(
        &'a self,
        req: RatesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<DailySeries, SourceError>> + Send + 'a>>;
}

/// Provider instrument search.
pub trait InstrumentSearch: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SourceError`] on provider failure or a malformed payload.
    fn search<'a>(
        &'a self,
        req: SearchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SearchBatch, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_request_rejects_inverted_range() {
        let symbol = Symbol::parse("AAPL").expect("valid");
        let start = Day::parse("2024-02-01").expect("valid");
        let end = Day::parse("2024-01-01").expect("valid");

        let error = HistoryRequest::new(symbol, start, end).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
    }

    #[test]
    fn search_request_rejects_blank_query_and_zero_limit() {
        assert!(SearchRequest::new("   ", 5).is_err());
        assert!(SearchRequest::new("apple", 0).is_err());
    }

    #[test]
    fn source_error_codes_are_stable() {
        assert_eq!(SourceError::unavailable("x").code(), "source.unavailable");
        assert_eq!(SourceError::internal("x").code(), "source.internal");
        assert!(SourceError::rate_limited("x").retryable());
        assert!(!SourceError::invalid_request("x").retryable());
    }
}
