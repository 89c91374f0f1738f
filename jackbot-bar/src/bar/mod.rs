use crate::{error::BarError, event::DerivativeTicker};
use chrono::{DateTime, Utc};
use derive_more::{Constructor, Display};
use jackbot_instrument::exchange::ExchangeId;
use jackbot_integration::Validator;
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};
use std::str::FromStr;

/// [`BarAccumulator`](accumulator::BarAccumulator) state machine folding derivative tickers into
/// [`Bar`]s.
pub mod accumulator;

/// Largest interval that is exactly representable as an `f64` whole number.
const MAX_WHOLE_INTERVAL: f64 = 9_007_199_254_740_992.0;

/// Rule used to decide when an in-progress [`Bar`] is complete.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize, Display,
)]
#[serde(rename_all = "lowercase", try_from = "SmolStr")]
pub enum BarKind {
    /// Interval is a duration in milliseconds, bars close on epoch aligned boundaries.
    #[display("time")]
    Time,
    /// Interval is an open interest increase threshold.
    #[display("volume")]
    Volume,
    /// Interval is a count of derivative ticker events.
    #[display("tick")]
    Tick,
}

impl BarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BarKind::Time => "time",
            BarKind::Volume => "volume",
            BarKind::Tick => "tick",
        }
    }

    /// Suffix appended to the interval when deriving a default [`BarSpec`] name.
    pub fn name_suffix(&self) -> &'static str {
        match self {
            BarKind::Time => "ms",
            BarKind::Volume => "vol",
            BarKind::Tick => "ticks",
        }
    }
}

impl FromStr for BarKind {
    type Err = BarError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "time" => Ok(BarKind::Time),
            "volume" => Ok(BarKind::Volume),
            "tick" => Ok(BarKind::Tick),
            other => Err(BarError::UnknownKind(other.to_string())),
        }
    }
}

impl TryFrom<SmolStr> for BarKind {
    type Error = BarError;

    fn try_from(value: SmolStr) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Raw, unvalidated bar configuration as supplied by a user.
///
/// eg/ `{"kind": "time", "interval": 60000}`
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, Constructor)]
pub struct BarConfig {
    pub kind: BarKind,
    pub interval: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<SmolStr>,
}

/// Validated, immutable [`Bar`] configuration.
///
/// Can only be constructed via validation, so every `BarSpec` has a positive, finite interval
/// (whole for [`BarKind::Time`] and [`BarKind::Tick`]).
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(try_from = "BarConfig", into = "BarConfig")]
pub struct BarSpec {
    kind: BarKind,
    interval: f64,
    name: SmolStr,
}

impl BarSpec {
    /// Construct a new [`BarSpec`] with the default deterministic name.
    ///
    /// eg/ `BarSpec::new(BarKind::Time, 60000.0)` is named `derivative_bar_60000ms`.
    pub fn new(kind: BarKind, interval: f64) -> Result<Self, BarError> {
        Self {
            kind,
            interval,
            name: Self::default_name(kind, interval),
        }
        .validate()
    }

    /// Construct a new [`BarSpec`] with a user provided name.
    pub fn with_name<S>(kind: BarKind, interval: f64, name: S) -> Result<Self, BarError>
    where
        S: Into<SmolStr>,
    {
        Self {
            kind,
            interval,
            name: name.into(),
        }
        .validate()
    }

    pub fn default_name(kind: BarKind, interval: f64) -> SmolStr {
        format_smolstr!("{}_{}{}", Bar::DATA_TYPE, interval, kind.name_suffix())
    }

    pub fn kind(&self) -> BarKind {
        self.kind
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    /// Index of the epoch aligned [`BarKind::Time`] bucket the provided time falls into.
    ///
    /// For non-time kinds the interval is still treated as milliseconds.
    pub fn time_bucket(&self, time: DateTime<Utc>) -> i64 {
        time.timestamp_millis().div_euclid(self.interval_ms())
    }

    /// Closing boundary of the provided [`BarKind::Time`] bucket, ie/ the start of the next.
    ///
    /// Validation keeps time intervals inside chrono's range, so only the final bucket before
    /// [`DateTime::<Utc>::MAX_UTC`] saturates.
    pub fn time_bucket_close(&self, bucket: i64) -> DateTime<Utc> {
        bucket
            .checked_add(1)
            .and_then(|next| next.checked_mul(self.interval_ms()))
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn interval_ms(&self) -> i64 {
        // Validation guarantees a whole, positive interval no larger than 2^53 (time intervals
        // no larger than the chrono range)
        (self.interval as i64).max(1)
    }

    fn invalid(&self, reason: &str) -> BarError {
        BarError::InvalidInterval {
            kind: self.kind,
            interval: self.interval,
            reason: reason.to_string(),
        }
    }
}

impl Validator for BarSpec {
    type Error = BarError;

    fn validate(self) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        if !self.interval.is_finite() {
            return Err(self.invalid("interval must be finite"));
        }

        if self.interval <= 0.0 {
            return Err(self.invalid("interval must be positive"));
        }

        match self.kind {
            BarKind::Time | BarKind::Tick if self.interval.fract() != 0.0 => {
                Err(self.invalid("interval must be a whole number"))
            }
            BarKind::Time
                if self.interval as i64 > DateTime::<Utc>::MAX_UTC.timestamp_millis() =>
            {
                Err(self.invalid("interval must not exceed the representable time range"))
            }
            BarKind::Time | BarKind::Tick if self.interval > MAX_WHOLE_INTERVAL => {
                Err(self.invalid("interval must not exceed 2^53"))
            }
            BarKind::Time | BarKind::Tick | BarKind::Volume => Ok(self),
        }
    }
}

impl TryFrom<BarConfig> for BarSpec {
    type Error = BarError;

    fn try_from(config: BarConfig) -> Result<Self, Self::Error> {
        match config.name {
            Some(name) => Self::with_name(config.kind, config.interval, name),
            None => Self::new(config.kind, config.interval),
        }
    }
}

impl From<BarSpec> for BarConfig {
    fn from(spec: BarSpec) -> Self {
        Self {
            kind: spec.kind,
            interval: spec.interval,
            name: Some(spec.name),
        }
    }
}

/// Snapshot of the derivative ticker fields tracked at the open and close of a [`Bar`].
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default, Deserialize, Serialize)]
pub struct DerivativeSnapshot {
    pub last_price: Option<f64>,
    pub open_interest: Option<f64>,
    pub funding_rate: Option<f64>,
    pub index_price: Option<f64>,
    pub mark_price: Option<f64>,
}

impl From<&DerivativeTicker> for DerivativeSnapshot {
    fn from(ticker: &DerivativeTicker) -> Self {
        Self {
            last_price: ticker.last_price,
            open_interest: ticker.open_interest,
            funding_rate: ticker.funding_rate,
            index_price: ticker.index_price,
            mark_price: ticker.mark_price,
        }
    }
}

/// Normalised Jackbot derivative [`Bar`] summarising the derivative tickers of one instrument
/// between two bar boundaries.
///
/// Serialises with a `"type": "derivative_bar"` discriminator used by downstream data type
/// filters.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename = "derivative_bar")]
pub struct Bar {
    pub exchange: ExchangeId,
    pub symbol: SmolStr,
    pub name: SmolStr,
    pub interval: f64,
    pub kind: BarKind,
    pub open: DerivativeSnapshot,
    pub close: DerivativeSnapshot,
    pub open_time: DateTime<Utc>,
    pub close_time: DateTime<Utc>,
    /// Canonical bar timestamp.
    ///
    /// For [`BarKind::Time`] bars this is the bucket closing boundary, otherwise the exchange
    /// time of the last folded ticker.
    pub time: DateTime<Utc>,
    /// Local receipt time of the event that closed the bar.
    pub received_time: DateTime<Utc>,
    pub delta_oi: f64,
    pub predicted_funding_rate: Option<f64>,
    pub ticks: u64,
}

impl Bar {
    /// Data type discriminator of every [`Bar`].
    pub const DATA_TYPE: &'static str = "derivative_bar";
}
