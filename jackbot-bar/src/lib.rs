#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]
#![allow(clippy::type_complexity)]

//! # Jackbot-Bar
//! Streaming bar computations over normalised derivative market data. It is:
//! * **Incremental**: every [`MarketEvent`](event::MarketEvent) is folded into a single in-progress
//!   bar, the input is never buffered.
//! * **Deterministic**: bars are bucketed on exchange timestamps, so replaying the same events
//!   always yields the same bars.
//! * **Isolated**: each session builds its own accumulators from a
//!   [`ComputableFactory`](compute::ComputableFactory), state never leaks between sessions.
//!
//! ## Bar kinds
//! - [`BarKind::Time`](bar::BarKind::Time): epoch aligned windows of `interval` milliseconds,
//!   closed by the first event (derivative ticker or book change) of a later window.
//! - [`BarKind::Volume`](bar::BarKind::Volume): closed once open interest has increased by
//!   `interval` since the bar opened.
//! - [`BarKind::Tick`](bar::BarKind::Tick): closed after `interval` derivative tickers.
//!
//! ## Example
//! ```rust
//! use jackbot_bar::{
//!     compute::Computed,
//!     config::ComputeConfig,
//!     logging::init_logging,
//!     test_utils::{book_change, oi_ticker},
//! };
//!
//! init_logging();
//!
//! let config = ComputeConfig::from_json_str(r#"{"bars": [{"kind": "time", "interval": 60000}]}"#)
//!     .unwrap();
//!
//! let bars = config
//!     .router()
//!     .unwrap()
//!     .compute([oi_ticker(10_000, 5000.0), book_change(65_000)])
//!     .filter_map(Computed::into_output)
//!     .collect::<Vec<_>>();
//!
//! assert_eq!(bars.len(), 1);
//! assert_eq!(bars[0].time.timestamp_millis(), 60_000);
//! ```

/// All [`Error`](std::error::Error)s generated in Jackbot-Bar.
pub mod error;

/// Defines the generic [`MarketEvent<T>`](event::MarketEvent) consumed by every computation.
pub mod event;

/// [`SubKind`](subscription::SubKind)s a computation requires upstream.
pub mod subscription;

/// [`Bar`](bar::Bar) output model, [`BarSpec`](bar::BarSpec) configuration and the
/// [`BarAccumulator`](bar::accumulator::BarAccumulator) that computes bars.
pub mod bar;

/// [`Computable`](compute::Computable) & [`ComputableFactory`](compute::ComputableFactory)
/// protocol, and the [`ComputeRouter`](compute::router::ComputeRouter) host that drives it.
pub mod compute;

/// JSON [`ComputeConfig`](config::ComputeConfig) describing the bars to compute.
pub mod config;

/// Default `tracing` subscriber initialisation.
pub mod logging;

pub mod test_utils {
    use crate::event::{BookChange, DataKind, DerivativeTicker, MarketEvent};
    use chrono::{DateTime, Utc};
    use jackbot_instrument::exchange::ExchangeId;
    use smol_str::SmolStr;

    pub const SYMBOL: &str = "BTCUSD";

    pub fn time_ms(millis: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(millis).unwrap()
    }

    pub fn market_event<T>(symbol: &str, millis: i64, kind: T) -> MarketEvent
    where
        T: Into<DataKind>,
    {
        MarketEvent {
            exchange_time: time_ms(millis),
            received_time: time_ms(millis),
            exchange: ExchangeId::Mock,
            symbol: SmolStr::new(symbol),
            kind: kind.into(),
        }
    }

    pub fn derivative_ticker(millis: i64, ticker: DerivativeTicker) -> MarketEvent {
        market_event(SYMBOL, millis, ticker)
    }

    pub fn oi_ticker(millis: i64, open_interest: f64) -> MarketEvent {
        oi_ticker_for(SYMBOL, millis, open_interest)
    }

    pub fn oi_ticker_for(symbol: &str, millis: i64, open_interest: f64) -> MarketEvent {
        market_event(
            symbol,
            millis,
            DerivativeTicker {
                last_price: Some(100.0),
                open_interest: Some(open_interest),
                ..DerivativeTicker::default()
            },
        )
    }

    pub fn book_change(millis: i64) -> MarketEvent {
        market_event(SYMBOL, millis, BookChange::default())
    }
}
