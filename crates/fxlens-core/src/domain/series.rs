use serde::{Deserialize, Serialize};

use crate::domain::{CurrencyCode, Day};
use crate::ValidationError;

/// One daily closing observation: a calendar day and its close value.
///
/// Shared shape for both price history and conversion-rate history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    pub day: Day,
    pub close: f64,
}

impl DailyClose {
    pub fn new(day: Day, close: f64) -> Result<Self, ValidationError> {
        if !close.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "close" });
        }
        if close < 0.0 {
            return Err(ValidationError::NegativeValue { field: "close" });
        }
        Ok(Self { day, close })
    }
}

/// Daily close series, strictly ascending by day with no duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DailyClose>", into = "Vec<DailyClose>")]
pub struct DailySeries {
    closes: Vec<DailyClose>,
}

impl DailySeries {
    /// Wrap a vector of closes, enforcing strictly ascending unique days.
    pub fn new(closes: Vec<DailyClose>) -> Result<Self, ValidationError> {
        for index in 1..closes.len() {
            if closes[index - 1].day >= closes[index].day {
                return Err(ValidationError::NonAscendingSeries { index });
            }
        }
        Ok(Self { closes })
    }

    /// Series with no observations. Valid: a provider may have nothing in
    /// the requested window.
    pub const fn empty() -> Self {
        Self { closes: Vec::new() }
    }

    pub fn closes(&self) -> &[DailyClose] {
        &self.closes
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}

impl TryFrom<Vec<DailyClose>> for DailySeries {
    type Error = ValidationError;

    fn try_from(value: Vec<DailyClose>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DailySeries> for Vec<DailyClose> {
    fn from(value: DailySeries) -> Self {
        value.closes
    }
}

/// One output point: the priced day, its native-currency close, and the
/// converted close once a rate was resolved.
///
/// `target_price` stays `None` only when no applicable rate was observed
/// anywhere in the range, even after both fill passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedPoint {
    #[serde(rename = "date")]
    pub day: Day,
    #[serde(rename = "basePrice")]
    pub base_price: f64,
    #[serde(rename = "targetPrice")]
    pub target_price: Option<f64>,
}

/// The merged series: one point per priced day plus both currency labels.
///
/// Holds the alignment invariant: points mirror the price series dates in
/// count and order, regardless of rate coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedSeries {
    #[serde(rename = "data")]
    pub points: Vec<AlignedPoint>,
    pub base_currency: CurrencyCode,
    pub target_currency: CurrencyCode,
}

impl AlignedSeries {
    pub const fn new(
        points: Vec<AlignedPoint>,
        base_currency: CurrencyCode,
        target_currency: CurrencyCode,
    ) -> Self {
        Self {
            points,
            base_currency,
            target_currency,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(day: &str, value: f64) -> DailyClose {
        DailyClose::new(Day::parse(day).expect("valid day"), value).expect("valid close")
    }

    #[test]
    fn rejects_non_finite_and_negative_closes() {
        let day = Day::parse("2024-01-02").expect("valid");
        assert!(matches!(
            DailyClose::new(day, f64::NAN),
            Err(ValidationError::NonFiniteValue { field: "close" })
        ));
        assert!(matches!(
            DailyClose::new(day, -1.0),
            Err(ValidationError::NegativeValue { field: "close" })
        ));
    }

    #[test]
    fn rejects_unordered_and_duplicate_days() {
        let unordered = vec![close("2024-01-03", 1.0), close("2024-01-02", 2.0)];
        assert!(matches!(
            DailySeries::new(unordered),
            Err(ValidationError::NonAscendingSeries { index: 1 })
        ));

        let duplicated = vec![close("2024-01-02", 1.0), close("2024-01-02", 2.0)];
        assert!(matches!(
            DailySeries::new(duplicated),
            Err(ValidationError::NonAscendingSeries { index: 1 })
        ));
    }

    #[test]
    fn aligned_series_serializes_with_presentation_field_names() {
        let series = AlignedSeries::new(
            vec![AlignedPoint {
                day: Day::parse("2024-01-02").expect("valid"),
                base_price: 10.0,
                target_price: Some(9.2),
            }],
            CurrencyCode::parse("USD").expect("valid"),
            CurrencyCode::parse("EUR").expect("valid"),
        );

        let json = serde_json::to_value(&series).expect("must serialize");
        assert_eq!(json["baseCurrency"], "USD");
        assert_eq!(json["targetCurrency"], "EUR");
        assert_eq!(json["data"][0]["date"], "2024-01-02");
        assert_eq!(json["data"][0]["basePrice"], 10.0);
        assert_eq!(json["data"][0]["targetPrice"], 9.2);
    }
}
