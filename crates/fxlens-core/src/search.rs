//! Suggestion helpers over [`InstrumentSearch`].
//!
//! Thin filters for the two lookups the presentation layer offers: ticker
//! completion and counter-currency completion against a known base.

use crate::data_source::{InstrumentKind, InstrumentMatch, InstrumentSearch, SearchRequest, SourceError};
use crate::domain::CurrencyCode;

/// Provider-side result cap used by the suggestion endpoints.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 6;

/// Equity tickers matching `query`.
///
/// An empty query yields no suggestions without touching the provider.
pub async fn ticker_suggestions(
    source: &dyn InstrumentSearch,
    query: &str,
    limit: usize,
) -> Result<Vec<String>, SourceError> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }

    let request = SearchRequest::new(query, limit)?;
    let batch = source.search(request).await?;

    Ok(batch
        .matches
        .into_iter()
        .filter(|found| found.kind == InstrumentKind::Equity)
        .map(|found| found.symbol)
        .collect())
}

/// Counter currencies quoted against `base` that match `query`.
///
/// Searches the provider for `BASE/QUERY` and keeps currency instruments
/// whose name confirms the base side, extracting the right-hand code from
/// pair names like `USD/EUR`.
pub async fn currency_suggestions(
    source: &dyn InstrumentSearch,
    base: &CurrencyCode,
    query: &str,
    limit: usize,
) -> Result<Vec<String>, SourceError> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }

    let request = SearchRequest::new(format!("{}/{}", base.as_str(), query.trim()), limit)?;
    let batch = source.search(request).await?;

    Ok(batch
        .matches
        .into_iter()
        .filter(|found| found.kind == InstrumentKind::Currency)
        .filter(|found| {
            found
                .name
                .as_deref()
                .is_some_and(|name| name.to_ascii_uppercase().starts_with(base.as_str()))
        })
        .map(|found| counter_code(&found))
        .collect())
}

/// Right-hand code of a pair name (`USD/EUR` → `EUR`), falling back to the
/// instrument symbol with its FX suffix stripped (`USDEUR=X` → `USDEUR`).
fn counter_code(found: &InstrumentMatch) -> String {
    found
        .name
        .as_deref()
        .and_then(|name| name.split('/').nth(1))
        .map(str::to_owned)
        .unwrap_or_else(|| {
            found
                .symbol
                .split('=')
                .next()
                .unwrap_or(&found.symbol)
                .to_owned()
        })
}
