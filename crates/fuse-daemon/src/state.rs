//! Shared state for fuse-daemon.
//!
//! One [`AppState`] is built at startup and shared across handlers behind an
//! `Arc`. It holds no mutable state: every request resolves independently.

use std::sync::Arc;

use fuse_md::{MarketDataProvider, MarketDataService};

/// Static build metadata included in health responses.
#[derive(Clone, Debug)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            service: "fuse-daemon",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub build: BuildInfo,
    pub market: MarketDataService,
}

impl AppState {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            build: BuildInfo::default(),
            market: MarketDataService::new(provider),
        }
    }
}
