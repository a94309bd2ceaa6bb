//! Provider adapters.

mod yahoo;

pub use yahoo::YahooClient;
