//! The series aligner: concurrent source fetches, an exact-date join, and
//! the two gap-fill passes.
//!
//! Fetch ordering follows the data dependency: price history and the
//! base-currency lookup run in parallel, the rate fetch starts once the
//! base currency is known, and the purely computational alignment starts
//! only after both series are in hand.

use std::collections::HashMap;
use std::sync::Arc;

use crate::data_source::{
    HistoryRequest, PriceSource, RateSource, RatesRequest, SourceError, SourceErrorKind,
};
use crate::domain::{
    AlignedPoint, AlignedSeries, CurrencyCode, DailySeries, DateRange, Day, PairCode, Symbol,
};
use crate::error::AlignError;

/// Produces a currency-converted daily price series from a price source and
/// a rate source.
pub struct SeriesAligner {
    prices: Arc<dyn PriceSource>,
    rates: Arc<dyn RateSource>,
}

impl SeriesAligner {
    pub fn new(prices: Arc<dyn PriceSource>, rates: Arc<dyn RateSource>) -> Self {
        Self { prices, rates }
    }

    /// Fetch, join, and gap-fill the converted series for `ticker`.
    ///
    /// Exactly one round trip per source: one price history fetch, one
    /// quote-currency lookup, one rate history fetch. Missing rates are
    /// forward-filled from the last observed rate, then a leading run of
    /// unresolved points is back-filled from the earliest future rate. A
    /// point whose rate never resolves keeps `target_price = None`; that is
    /// a valid outcome, not an error.
    ///
    /// # Errors
    ///
    /// [`AlignError::MissingParameter`] / [`AlignError::InvalidParameter`]
    /// for an empty or malformed ticker, currency, or range — checked
    /// before any provider call. [`AlignError::SourceUnavailable`] when any
    /// of the three fetches fails; no partial series is returned.
    pub async fn align(
        &self,
        ticker: &str,
        target_currency: &str,
        range: DateRange,
    ) -> Result<AlignedSeries, AlignError> {
        if ticker.trim().is_empty() {
            return Err(AlignError::MissingParameter("ticker"));
        }
        if target_currency.trim().is_empty() {
            return Err(AlignError::MissingParameter("target-currency"));
        }

        let symbol = Symbol::parse(ticker)?;
        let target = CurrencyCode::parse(target_currency)?;
        let (start, end) = range.resolve(Day::today_utc())?;

        tracing::debug!(%symbol, %target, %start, %end, "aligning series");

        let history = HistoryRequest::new(symbol.clone(), start, end).map_err(request_failure)?;
        let (prices, base) = tokio::join!(
            self.prices.daily_prices(history),
            self.prices.quote_currency(symbol),
        );
        let prices = prices.map_err(source_failure)?;
        let base = base.map_err(source_failure)?;

        let pair = PairCode::new(base.clone(), target.clone());
        let rates_request = RatesRequest::new(pair, start, end).map_err(request_failure)?;
        let rates = self
            .rates
            .daily_rates(rates_request)
            .await
            .map_err(source_failure)?;

        let mut points = join_by_day(&prices, &rates);
        forward_fill(&mut points);
        back_fill(&mut points);

        Ok(AlignedSeries::new(points, base, target))
    }
}

fn source_failure(cause: SourceError) -> AlignError {
    tracing::error!(error = %cause, "upstream fetch failed");
    AlignError::SourceUnavailable { cause }
}

/// Classify a failed request construction: a rejected request is a caller
/// error, anything else counts as a source failure.
fn request_failure(cause: SourceError) -> AlignError {
    if cause.kind() == SourceErrorKind::InvalidRequest {
        return AlignError::InvalidRequest { cause };
    }
    source_failure(cause)
}

/// Exact-date join: one output point per priced day, converted when a rate
/// exists for exactly that day, unresolved otherwise. No interpolation.
fn join_by_day(prices: &DailySeries, rates: &DailySeries) -> Vec<AlignedPoint> {
    let rate_by_day: HashMap<Day, f64> = rates
        .closes()
        .iter()
        .map(|close| (close.day, close.close))
        .collect();

    prices
        .closes()
        .iter()
        .map(|price| AlignedPoint {
            day: price.day,
            base_price: price.close,
            target_price: rate_by_day.get(&price.day).map(|rate| price.close * rate),
        })
        .collect()
}

/// Carry the most recent implied rate (`target_price / base_price`) forward
/// into unresolved points.
fn forward_fill(points: &mut [AlignedPoint]) {
    let mut last_rate: Option<f64> = None;
    for point in points.iter_mut() {
        match point.target_price {
            Some(converted) => last_rate = Some(converted / point.base_price),
            None => {
                if let Some(rate) = last_rate {
                    point.target_price = Some(point.base_price * rate);
                }
            }
        }
    }
}

/// Resolve a leading run of points the forward pass could not reach, using
/// the nearest future implied rate. Scans the post-forward-fill values on
/// purpose; the two passes are not a symmetric pair and must not be
/// collapsed into one.
fn back_fill(points: &mut [AlignedPoint]) {
    let mut next_rate: Option<f64> = None;
    for point in points.iter_mut().rev() {
        match point.target_price {
            Some(converted) => next_rate = Some(converted / point.base_price),
            None => {
                if let Some(rate) = next_rate {
                    point.target_price = Some(point.base_price * rate);
                }
            }
        }
    }
}
