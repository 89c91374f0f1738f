use serde::{
    Deserialize, Serialize,
    de::{
        IntoDeserializer,
        value::{Error as ValueError, StrDeserializer},
    },
};
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier for a derivative market data venue.
///
/// ### Notes
/// A venue may serve distinct APIs for different contract families.
///
/// For example, BinanceFuturesUsd (USD-M) and BinanceFuturesCoin (COIN-M) publish separate
/// derivative ticker feeds, and are therefore represented as unique variants.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
#[serde(rename = "exchange", rename_all = "snake_case")]
pub enum ExchangeId {
    Mock,
    BinanceFuturesCoin,
    BinanceFuturesUsd,
    BinanceOptions,
    BitfinexDerivatives,
    Bitget,
    Bitmex,
    BybitInverse,
    BybitPerpetualsUsd,
    CoinbaseInternational,
    CryptoFacilities,
    Deribit,
    Dydx,
    GateioFuturesUsd,
    GateioPerpetualsBtc,
    GateioPerpetualsUsd,
    #[serde(alias = "huobi_dm_swap")]
    HtxSwap,
    Hyperliquid,
    KucoinFutures,
    #[serde(alias = "okex_swap")]
    OkxSwap,
    #[serde(alias = "okex_futures")]
    OkxFutures,
}

impl ExchangeId {
    /// Return the &str representation of this [`ExchangeId`]
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeId::Mock => "mock",
            ExchangeId::BinanceFuturesCoin => "binance_futures_coin",
            ExchangeId::BinanceFuturesUsd => "binance_futures_usd",
            ExchangeId::BinanceOptions => "binance_options",
            ExchangeId::BitfinexDerivatives => "bitfinex_derivatives",
            ExchangeId::Bitget => "bitget",
            ExchangeId::Bitmex => "bitmex",
            ExchangeId::BybitInverse => "bybit_inverse",
            ExchangeId::BybitPerpetualsUsd => "bybit_perpetuals_usd",
            ExchangeId::CoinbaseInternational => "coinbase_international",
            ExchangeId::CryptoFacilities => "crypto_facilities",
            ExchangeId::Deribit => "deribit",
            ExchangeId::Dydx => "dydx",
            ExchangeId::GateioFuturesUsd => "gateio_futures_usd",
            ExchangeId::GateioPerpetualsBtc => "gateio_perpetuals_btc",
            ExchangeId::GateioPerpetualsUsd => "gateio_perpetuals_usd",
            ExchangeId::HtxSwap => "htx_swap", // huobi_dm_swap alias
            ExchangeId::Hyperliquid => "hyperliquid",
            ExchangeId::KucoinFutures => "kucoin_futures",
            ExchangeId::OkxSwap => "okx_swap", // okex_swap alias
            ExchangeId::OkxFutures => "okx_futures", // okex_futures alias
        }
    }
}

impl std::fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failed to parse an [`ExchangeId`] from an identifier string.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Error)]
pub enum ExchangeIdError {
    #[error("unknown ExchangeId: {0}")]
    Unknown(String),
}

impl FromStr for ExchangeId {
    type Err = ExchangeIdError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        // Re-use the serde aliases so both parse paths accept the same identifiers
        let deserializer: StrDeserializer<'_, ValueError> = input.into_deserializer();
        ExchangeId::deserialize(deserializer)
            .map_err(|_| ExchangeIdError::Unknown(input.to_string()))
    }
}
