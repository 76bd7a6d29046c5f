//! Price history providers and signal state stores.

mod coinmarketcap;
mod csv_source;
mod json_store;
mod memory_store;

pub use coinmarketcap::{CoinMarketCapConfig, CoinMarketCapProvider};
pub use csv_source::CsvPriceHistory;
pub use json_store::JsonStateStore;
pub use memory_store::MemoryStateStore;
