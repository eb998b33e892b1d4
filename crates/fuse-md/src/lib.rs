//! fuse-md
//!
//! Historical-price query resolution and the upstream market-data boundary.
//!
//! This crate owns the query model, validation, endpoint-shape selection, date
//! normalization, the provider trait and the IEX HTTP provider. It does **not**
//! own HTTP routing or configuration; `fuse-daemon` wires those.

pub mod date;
pub mod iex;
pub mod provider;
pub mod query;
pub mod record;
pub mod resolver;
pub mod service;
pub mod shape;

pub use date::{normalize, normalize_in, DateError, RawDate};
pub use iex::IexHttpProvider;
pub use provider::{MarketDataProvider, ProviderError};
pub use query::{validate, HistoricalPriceQuery, QueryError};
pub use record::{HistoricalPrice, LastTradedPrice, RawPriceRecord, SymbolRecord};
pub use resolver::{HistoricalResolver, ResolveError};
pub use service::MarketDataService;
pub use shape::{select, ChartShape};
