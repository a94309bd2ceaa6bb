use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::data_source::{
    HistoryRequest, InstrumentKind, InstrumentMatch, InstrumentSearch, PriceSource, RateSource,
    RatesRequest, SearchBatch, SearchRequest, SourceError,
};
use crate::domain::{CurrencyCode, DailyClose, DailySeries, Day, Symbol};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::ValidationError;

const CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const SEARCH_BASE: &str = "https://query2.finance.yahoo.com/v1/finance/search";
const REQUEST_TIMEOUT_MS: u64 = 10_000;
const SECONDS_PER_DAY: i64 = 86_400;

/// Yahoo Finance client over the public chart and search endpoints.
///
/// The chart endpoint serves daily closes for equities and FX pair
/// instruments alike, so one client implements [`PriceSource`],
/// [`RateSource`], and [`InstrumentSearch`]. Neither endpoint needs the
/// cookie/crumb dance the authenticated quote API requires.
#[derive(Clone)]
pub struct YahooClient {
    http: Arc<dyn HttpClient>,
}

impl YahooClient {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn execute(&self, endpoint: String, what: &str) -> Result<HttpResponse, SourceError> {
        let request = HttpRequest::get(endpoint)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(REQUEST_TIMEOUT_MS);

        let response = self.http.execute(request).await.map_err(|error| {
            if error.retryable() {
                SourceError::unavailable(format!("yahoo transport error: {}", error.message()))
            } else {
                SourceError::internal(format!("yahoo transport error: {}", error.message()))
            }
        })?;

        if response.status == 429 {
            return Err(SourceError::rate_limited(format!(
                "yahoo throttled the {what} request"
            )));
        }
        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo {what} returned status {}",
                response.status
            )));
        }

        Ok(response)
    }

    async fn fetch_chart(
        &self,
        instrument: &str,
        query: &str,
    ) -> Result<YahooChartResult, SourceError> {
        let endpoint = format!("{CHART_BASE}/{}?{query}", urlencoding::encode(instrument));
        let response = self.execute(endpoint, "chart").await?;

        let parsed: YahooChartResponse = serde_json::from_str(&response.body).map_err(|error| {
            SourceError::unavailable(format!("yahoo chart payload did not parse: {error}"))
        })?;

        if let Some(error) = parsed.chart.error {
            return Err(SourceError::unavailable(format!(
                "yahoo chart error: {}",
                error.describe()
            )));
        }

        parsed
            .chart
            .result
            .and_then(|mut results| (!results.is_empty()).then(|| results.remove(0)))
            .ok_or_else(|| SourceError::unavailable("yahoo chart response had no result"))
    }

    async fn fetch_daily_closes(
        &self,
        instrument: &str,
        start: Day,
        end: Day,
    ) -> Result<DailySeries, SourceError> {
        let period1 = start.start_of_day_unix();
        // chart bounds are half-open; push period2 past the end day so the
        // requested range stays inclusive
        let period2 = end.start_of_day_unix() + SECONDS_PER_DAY;
        let query = format!("period1={period1}&period2={period2}&interval=1d");

        let result = self.fetch_chart(instrument, &query).await?;
        daily_series_from_chart(result)
    }
}

impl PriceSource for YahooClient {
    fn quote_currency<'a>(
        &'a self,
        ticker: Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<CurrencyCode, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let result = self
                .fetch_chart(ticker.as_str(), "range=1d&interval=1d")
                .await?;
            let currency = result
                .meta
                .and_then(|meta| meta.currency)
                .ok_or_else(|| {
                    SourceError::unavailable(format!(
                        "yahoo chart meta for {ticker} carried no currency"
                    ))
                })?;
            CurrencyCode::parse(&currency).map_err(validation_to_source)
        })
    }

    fn daily_prices<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<DailySeries, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            self.fetch_daily_closes(req.symbol.as_str(), req.start, req.end)
                .await
        })
    }
}

impl RateSource for YahooClient {
    fn daily_rates<'a>(
        &'a self,
        req: RatesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<DailySeries, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let instrument = req.pair.instrument();
            self.fetch_daily_closes(&instrument, req.start, req.end)
                .await
        })
    }
}

impl InstrumentSearch for YahooClient {
    fn search<'a>(
        &'a self,
        req: SearchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SearchBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let endpoint = format!(
                "{SEARCH_BASE}?q={}&quotesCount={}&newsCount=0",
                urlencoding::encode(&req.query),
                req.limit
            );
            let response = self.execute(endpoint, "search").await?;

            let parsed: YahooSearchResponse =
                serde_json::from_str(&response.body).map_err(|error| {
                    SourceError::unavailable(format!(
                        "yahoo search payload did not parse: {error}"
                    ))
                })?;

            let matches = parsed
                .quotes
                .into_iter()
                .filter(|quote| quote.is_yahoo_finance == Some(true))
                .map(|quote| InstrumentMatch {
                    kind: instrument_kind(&quote.quote_type),
                    symbol: quote.symbol,
                    name: quote.short_name.or(quote.long_name),
                    exchange: quote.exchange,
                })
                .take(req.limit)
                .collect();

            Ok(SearchBatch {
                query: req.query,
                matches,
            })
        })
    }
}

/// Collapse a chart result into a validated daily series.
///
/// Null closes are dropped (market holidays show up this way), and rows
/// whose timestamps land on an already-seen calendar day keep the first
/// observation.
fn daily_series_from_chart(result: YahooChartResult) -> Result<DailySeries, SourceError> {
    // no timestamp array means no data in the window, which is a valid
    // empty series rather than an error
    let Some(timestamps) = result.timestamp else {
        return Ok(DailySeries::empty());
    };

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::unavailable("yahoo chart result had no quote block"))?;

    let mut closes: Vec<DailyClose> = Vec::with_capacity(timestamps.len());
    for (index, &ts) in timestamps.iter().enumerate() {
        let Some(Some(close)) = quote.close.get(index).copied() else {
            continue;
        };
        let day = Day::from_unix_timestamp(ts).map_err(validation_to_source)?;
        if closes.last().is_some_and(|prev| prev.day >= day) {
            continue;
        }
        closes.push(DailyClose::new(day, close).map_err(validation_to_source)?);
    }

    DailySeries::new(closes).map_err(validation_to_source)
}

fn instrument_kind(quote_type: &str) -> InstrumentKind {
    match quote_type {
        "EQUITY" => InstrumentKind::Equity,
        "ETF" => InstrumentKind::Etf,
        "INDEX" => InstrumentKind::Index,
        "MUTUALFUND" => InstrumentKind::Fund,
        "CRYPTOCURRENCY" => InstrumentKind::Crypto,
        "CURRENCY" => InstrumentKind::Currency,
        _ => InstrumentKind::Other,
    }
}

fn validation_to_source(error: ValidationError) -> SourceError {
    SourceError::internal(error.to_string())
}

// Yahoo chart API response shapes.

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: Option<YahooChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooQuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct YahooApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl YahooApiError {
    fn describe(&self) -> String {
        match (&self.code, &self.description) {
            (_, Some(description)) => description.clone(),
            (Some(code), None) => code.clone(),
            (None, None) => String::from("unknown error"),
        }
    }
}

// Yahoo search API response shapes.

#[derive(Debug, Deserialize)]
struct YahooSearchResponse {
    #[serde(default)]
    quotes: Vec<YahooSearchQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooSearchQuote {
    symbol: String,
    #[serde(rename = "shortname", default)]
    short_name: Option<String>,
    #[serde(rename = "longname", default)]
    long_name: Option<String>,
    #[serde(default)]
    exchange: Option<String>,
    #[serde(rename = "quoteType", default)]
    quote_type: String,
    #[serde(rename = "isYahooFinance", default)]
    is_yahoo_finance: Option<bool>,
}
