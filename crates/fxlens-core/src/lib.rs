//! # fxlens-core
//!
//! Currency-converted daily price series. The crate fetches an asset's
//! price history and a currency pair's rate history from a provider,
//! joins them by calendar date, and fills rate gaps so every priced day
//! gets a converted value whenever any rate was observed in range.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Validated domain types (days, currencies, series) |
//! | [`data_source`] | Source traits, requests, and structured errors |
//! | [`adapters`] | Provider adapters (Yahoo chart + search endpoints) |
//! | [`aligner`] | The fetch/join/fill engine |
//! | [`search`] | Ticker and counter-currency suggestion helpers |
//! | [`http_client`] | Transport abstraction (reqwest in production) |
//! | [`error`] | Validation and caller-facing error taxonomy |
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fxlens_core::{DateRange, ReqwestHttpClient, SeriesAligner, YahooClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let yahoo = Arc::new(YahooClient::new(Arc::new(ReqwestHttpClient::new())));
//!     let aligner = SeriesAligner::new(yahoo.clone(), yahoo);
//!
//!     let series = aligner.align("AAPL", "EUR", DateRange::default()).await?;
//!     for point in &series.points {
//!         println!("{}: {:?}", point.day, point.target_price);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error handling
//!
//! Alignment failures split into exactly two caller-facing kinds: invalid
//! input (missing or malformed parameters, detected before any provider
//! call) and upstream unavailability (transport failures, bad statuses,
//! unparseable payloads). Upstream causes are logged via `tracing` but
//! never embedded in the message shown to callers.

pub mod adapters;
pub mod aligner;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod search;

pub use adapters::YahooClient;
pub use aligner::SeriesAligner;
pub use data_source::{
    HistoryRequest, InstrumentKind, InstrumentMatch, InstrumentSearch, PriceSource, RateSource,
    RatesRequest, SearchBatch, SearchRequest, SourceError, SourceErrorKind,
};
pub use domain::{
    AlignedPoint, AlignedSeries, CurrencyCode, DailyClose, DailySeries, DateRange, Day, PairCode,
    Symbol,
};
pub use error::{AlignError, AlignErrorKind, ValidationError};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use search::{currency_suggestions, ticker_suggestions, DEFAULT_SUGGESTION_LIMIT};
