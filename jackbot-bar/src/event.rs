use crate::subscription::SubKind;
use chrono::{DateTime, Utc};
use derive_more::{Constructor, From};
use jackbot_instrument::exchange::ExchangeId;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Normalised Jackbot [`MarketEvent<T>`](Self) wrapping the `T` data variant in metadata.
///
/// Events are produced upstream (normalisation or replay) in non-decreasing `exchange_time`
/// order per instrument, and are read-only to every computation that consumes them.
///
/// ### Examples
/// - [`MarketEvent<DerivativeTicker>`](DerivativeTicker)
/// - [`MarketEvent<BookChange>`](BookChange)
/// - [`MarketEvent<DataKind>`](DataKind)
#[derive(Clone, PartialEq, PartialOrd, Debug, Deserialize, Serialize)]
pub struct MarketEvent<T = DataKind> {
    pub exchange_time: DateTime<Utc>,
    pub received_time: DateTime<Utc>,
    pub exchange: ExchangeId,
    pub symbol: SmolStr,
    pub kind: T,
}

impl<T> MarketEvent<T> {
    /// Map the `T` data variant, keeping the event metadata.
    pub fn map_kind<U, F>(self, f: F) -> MarketEvent<U>
    where
        F: FnOnce(T) -> U,
    {
        MarketEvent {
            exchange_time: self.exchange_time,
            received_time: self.received_time,
            exchange: self.exchange,
            symbol: self.symbol,
            kind: f(self.kind),
        }
    }
}

impl MarketEvent<DataKind> {
    /// [`SubKind`] this event was delivered through.
    pub fn sub_kind(&self) -> SubKind {
        self.kind.sub_kind()
    }
}

/// Available kinds of normalised Jackbot [`MarketEvent<T>`](MarketEvent).
#[derive(Clone, PartialEq, PartialOrd, Debug, Deserialize, Serialize, From)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataKind {
    DerivativeTicker(DerivativeTicker),
    BookChange(BookChange),
}

impl DataKind {
    pub fn sub_kind(&self) -> SubKind {
        match self {
            DataKind::DerivativeTicker(_) => SubKind::DerivativeTicker,
            DataKind::BookChange(_) => SubKind::BookChange,
        }
    }
}

/// Normalised Jackbot derivative ticker update.
///
/// Exchanges publish partial tickers, so every numeric field is optional.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default, Deserialize, Serialize)]
pub struct DerivativeTicker {
    pub last_price: Option<f64>,
    pub open_interest: Option<f64>,
    pub funding_rate: Option<f64>,
    pub index_price: Option<f64>,
    pub mark_price: Option<f64>,
    pub predicted_funding_rate: Option<f64>,
}

/// Normalised Jackbot order book change.
///
/// Bar computations only use these as evidence that time has passed for an instrument.
#[derive(Clone, PartialEq, PartialOrd, Debug, Default, Deserialize, Serialize)]
pub struct BookChange {
    pub is_snapshot: bool,
    pub bids: Vec<Level>,
    pub asks: Vec<Level>,
}

/// Normalised Jackbot order book [`Level`].
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default, Deserialize, Serialize, Constructor)]
pub struct Level {
    pub price: f64,
    pub amount: f64,
}

impl From<MarketEvent<DerivativeTicker>> for MarketEvent<DataKind> {
    fn from(event: MarketEvent<DerivativeTicker>) -> Self {
        event.map_kind(DataKind::DerivativeTicker)
    }
}

impl From<MarketEvent<BookChange>> for MarketEvent<DataKind> {
    fn from(event: MarketEvent<BookChange>) -> Self {
        event.map_kind(DataKind::BookChange)
    }
}
