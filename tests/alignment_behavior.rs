//! Behavior tests for the series aligner: join, gap filling, and the
//! fetch choreography against in-memory sources.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use fxlens_core::domain::{DateRange, Day};
use fxlens_core::SeriesAligner;
use fxlens_tests::{day, series, FakePriceSource, FakeRateSource};

fn range(start: &str, end: &str) -> DateRange {
    DateRange::new(Some(day(start)), Some(day(end)))
}

const JAN_RANGE: (&str, &str) = ("2024-01-01", "2024-01-31");

#[tokio::test]
async fn dates_present_in_both_series_join_exactly() {
    // Given: rates cover every priced day
    let prices = Arc::new(FakePriceSource::new(
        "USD",
        series(&[("2024-01-02", 10.0), ("2024-01-03", 20.0)]),
    ));
    let rates = Arc::new(FakeRateSource::new(series(&[
        ("2024-01-02", 2.0),
        ("2024-01-03", 3.0),
    ])));
    let aligner = SeriesAligner::new(prices, rates);

    // When: the series is aligned
    let aligned = aligner
        .align("AAPL", "EUR", range(JAN_RANGE.0, JAN_RANGE.1))
        .await
        .expect("alignment should succeed");

    // Then: each converted value is exactly base price times that day's rate
    assert_eq!(aligned.points[0].target_price, Some(20.0));
    assert_eq!(aligned.points[1].target_price, Some(60.0));
}

#[tokio::test]
async fn missing_rates_forward_fill_from_the_last_observation() {
    // Given: a rate observed only on the first priced day
    let prices = Arc::new(FakePriceSource::new(
        "USD",
        series(&[
            ("2024-01-02", 10.0),
            ("2024-01-03", 11.0),
            ("2024-01-04", 12.0),
        ]),
    ));
    let rates = Arc::new(FakeRateSource::new(series(&[("2024-01-02", 2.0)])));
    let aligner = SeriesAligner::new(prices, rates);

    // When
    let aligned = aligner
        .align("AAPL", "EUR", range(JAN_RANGE.0, JAN_RANGE.1))
        .await
        .expect("alignment should succeed");

    // Then: the 2.0 rate carries forward across both gaps
    let converted: Vec<_> = aligned.points.iter().map(|p| p.target_price).collect();
    assert_eq!(converted, vec![Some(20.0), Some(22.0), Some(24.0)]);
}

#[tokio::test]
async fn leading_gaps_back_fill_from_the_earliest_future_rate() {
    // Given: a rate observed only on the last priced day
    let prices = Arc::new(FakePriceSource::new(
        "USD",
        series(&[
            ("2024-01-02", 10.0),
            ("2024-01-03", 11.0),
            ("2024-01-04", 12.0),
        ]),
    ));
    let rates = Arc::new(FakeRateSource::new(series(&[("2024-01-04", 3.0)])));
    let aligner = SeriesAligner::new(prices, rates);

    // When
    let aligned = aligner
        .align("AAPL", "EUR", range(JAN_RANGE.0, JAN_RANGE.1))
        .await
        .expect("alignment should succeed");

    // Then: all three points use the 3.0 rate
    let converted: Vec<_> = aligned.points.iter().map(|p| p.target_price).collect();
    assert_eq!(converted, vec![Some(30.0), Some(33.0), Some(36.0)]);
}

#[tokio::test]
async fn interior_gaps_prefer_the_forward_fill_rate() {
    // Given: rates at the edges only, a two-day hole in the middle
    let prices = Arc::new(FakePriceSource::new(
        "USD",
        series(&[
            ("2024-01-02", 10.0),
            ("2024-01-03", 11.0),
            ("2024-01-04", 12.0),
            ("2024-01-05", 13.0),
        ]),
    ));
    let rates = Arc::new(FakeRateSource::new(series(&[
        ("2024-01-02", 2.0),
        ("2024-01-05", 4.0),
    ])));
    let aligner = SeriesAligner::new(prices, rates);

    // When
    let aligned = aligner
        .align("AAPL", "EUR", range(JAN_RANGE.0, JAN_RANGE.1))
        .await
        .expect("alignment should succeed");

    // Then: the hole fills forward at 2.0; nothing back-fills because the
    // forward pass already resolved every point
    let converted: Vec<_> = aligned.points.iter().map(|p| p.target_price).collect();
    assert_eq!(
        converted,
        vec![Some(20.0), Some(22.0), Some(24.0), Some(52.0)]
    );
}

#[tokio::test]
async fn empty_rate_series_yields_all_unresolved_points() {
    // Given: the pair has no observations in range at all
    let prices = Arc::new(FakePriceSource::new(
        "USD",
        series(&[("2024-01-02", 10.0), ("2024-01-03", 11.0)]),
    ));
    let rates = Arc::new(FakeRateSource::new(series(&[])));
    let aligner = SeriesAligner::new(prices, rates);

    // When
    let aligned = aligner
        .align("AAPL", "EUR", range(JAN_RANGE.0, JAN_RANGE.1))
        .await
        .expect("no rates is a valid result, not an error");

    // Then: every point stays unresolved but the labels are populated
    assert!(aligned.points.iter().all(|p| p.target_price.is_none()));
    assert_eq!(aligned.base_currency.as_str(), "USD");
    assert_eq!(aligned.target_currency.as_str(), "EUR");
}

#[tokio::test]
async fn output_mirrors_price_series_dates_in_count_and_order() {
    // Given: a sparse rate series unrelated to the price dates
    let price_series = series(&[
        ("2024-01-02", 10.0),
        ("2024-01-03", 11.0),
        ("2024-01-04", 12.0),
        ("2024-01-08", 13.0),
        ("2024-01-09", 14.0),
    ]);
    let prices = Arc::new(FakePriceSource::new("USD", price_series.clone()));
    let rates = Arc::new(FakeRateSource::new(series(&[("2024-01-03", 2.0)])));
    let aligner = SeriesAligner::new(prices, rates);

    // When
    let aligned = aligner
        .align("AAPL", "EUR", range(JAN_RANGE.0, JAN_RANGE.1))
        .await
        .expect("alignment should succeed");

    // Then: one output point per priced day, same order
    assert_eq!(aligned.len(), price_series.len());
    let days: Vec<Day> = aligned.points.iter().map(|p| p.day).collect();
    let expected: Vec<Day> = price_series.closes().iter().map(|c| c.day).collect();
    assert_eq!(days, expected);
}

#[tokio::test]
async fn empty_price_series_produces_an_empty_result() {
    let prices = Arc::new(FakePriceSource::new("USD", series(&[])));
    let rates = Arc::new(FakeRateSource::new(series(&[("2024-01-03", 2.0)])));
    let aligner = SeriesAligner::new(prices, rates);

    let aligned = aligner
        .align("AAPL", "EUR", range(JAN_RANGE.0, JAN_RANGE.1))
        .await
        .expect("an empty price window is valid");

    assert!(aligned.is_empty());
    assert_eq!(aligned.base_currency.as_str(), "USD");
}

#[tokio::test]
async fn each_source_is_hit_exactly_once_with_the_resolved_pair() {
    // Given
    let prices = Arc::new(FakePriceSource::new(
        "USD",
        series(&[("2024-01-02", 10.0)]),
    ));
    let rates = Arc::new(FakeRateSource::new(series(&[("2024-01-02", 2.0)])));
    let aligner = SeriesAligner::new(prices.clone(), rates.clone());

    // When
    aligner
        .align("AAPL", "EUR", range(JAN_RANGE.0, JAN_RANGE.1))
        .await
        .expect("alignment should succeed");

    // Then: one price fetch, one currency lookup, one rate fetch; the rate
    // fetch keyed by the base currency the lookup resolved
    assert_eq!(prices.price_calls.load(Ordering::SeqCst), 1);
    assert_eq!(prices.currency_calls.load(Ordering::SeqCst), 1);
    assert_eq!(rates.total_calls(), 1);
    assert_eq!(
        rates.seen_pair.lock().expect("pair recorded").as_deref(),
        Some("USDEUR=X")
    );
}

#[tokio::test]
async fn explicit_range_bounds_reach_the_sources_unchanged() {
    let prices = Arc::new(FakePriceSource::new(
        "USD",
        series(&[("2023-12-04", 10.0)]),
    ));
    let rates = Arc::new(FakeRateSource::new(series(&[])));
    let aligner = SeriesAligner::new(prices.clone(), rates);

    aligner
        .align("AAPL", "EUR", range("2023-12-01", "2023-12-31"))
        .await
        .expect("alignment should succeed");

    let seen = prices
        .seen_range
        .lock()
        .expect("range recorded")
        .expect("price fetch happened");
    assert_eq!(seen.0, day("2023-12-01"));
    assert_eq!(seen.1, day("2023-12-31"));
}

#[tokio::test]
async fn aligning_twice_with_identical_inputs_is_idempotent() {
    let prices = Arc::new(FakePriceSource::new(
        "USD",
        series(&[
            ("2024-01-02", 10.0),
            ("2024-01-03", 11.0),
            ("2024-01-04", 12.0),
        ]),
    ));
    let rates = Arc::new(FakeRateSource::new(series(&[("2024-01-03", 2.0)])));
    let aligner = SeriesAligner::new(prices, rates);

    let first = aligner
        .align("AAPL", "EUR", range(JAN_RANGE.0, JAN_RANGE.1))
        .await
        .expect("first run succeeds");
    let second = aligner
        .align("AAPL", "EUR", range(JAN_RANGE.0, JAN_RANGE.1))
        .await
        .expect("second run succeeds");

    assert_eq!(first, second);
}

#[tokio::test]
async fn ticker_and_currency_inputs_are_normalized() {
    let prices = Arc::new(FakePriceSource::new(
        "USD",
        series(&[("2024-01-02", 10.0)]),
    ));
    let rates = Arc::new(FakeRateSource::new(series(&[])));
    let aligner = SeriesAligner::new(prices, rates.clone());

    let aligned = aligner
        .align(" aapl ", " eur ", range(JAN_RANGE.0, JAN_RANGE.1))
        .await
        .expect("normalized inputs should align");

    assert_eq!(aligned.target_currency.as_str(), "EUR");
    assert_eq!(
        rates.seen_pair.lock().expect("pair recorded").as_deref(),
        Some("USDEUR=X")
    );
}
