//! Domain types for daily series alignment.
//!
//! Everything here validates at construction time so the aligner and the
//! adapters can assume well-formed values:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Day`] | Calendar date, `YYYY-MM-DD`, the join key |
//! | [`DateRange`] | Optional bounds with trailing-30-day defaults |
//! | [`Symbol`] | Normalized asset ticker |
//! | [`CurrencyCode`] | Uppercase 3-letter ISO code |
//! | [`PairCode`] | base→target pair with its `=X` instrument form |
//! | [`DailyClose`] / [`DailySeries`] | Ordered daily observations |
//! | [`AlignedPoint`] / [`AlignedSeries`] | The merged output |

mod currency;
mod date;
mod series;
mod symbol;

pub use currency::{CurrencyCode, PairCode};
pub use date::{DateRange, Day};
pub use series::{AlignedPoint, AlignedSeries, DailyClose, DailySeries};
pub use symbol::Symbol;
