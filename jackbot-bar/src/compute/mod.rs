use crate::{
    bar::{Bar, BarConfig, BarSpec, accumulator::BarAccumulator},
    error::BarError,
    event::MarketEvent,
    subscription::SubKind,
};
use chrono::{DateTime, Utc};
use derive_more::{Constructor, From};
use jackbot_integration::collection::none_one_or_two::NoneOneOrTwo;
use serde::{Deserialize, Serialize};

/// [`ComputeRouter`](router::ComputeRouter) fanning [`MarketEvent`]s out to per-instrument
/// [`Computable`]s, plus iterator & stream adaptors.
pub mod router;

/// Data stamped with the time it represents.
pub trait Timed {
    fn time(&self) -> DateTime<Utc>;
}

impl Timed for Bar {
    fn time(&self) -> DateTime<Utc> {
        self.time
    }
}

/// Stateful computation that derives new data from a stream of [`MarketEvent`]s.
///
/// A computable performs no I/O and never blocks. It must be driven synchronously: every output
/// of one `compute` call is returned before the next event is fed.
///
/// Outputs must never be stamped later than the `exchange_time` of the event that produced them.
pub trait Computable {
    type Output: Timed;

    /// [`SubKind`]s this computable requires upstream. Events of any other kind are never fed.
    fn subscriptions(&self) -> &'static [SubKind];

    /// Consume the next [`MarketEvent`], returning any outputs it completed.
    fn compute(&mut self, event: &MarketEvent) -> NoneOneOrTwo<Self::Output>;
}

/// Zero-argument constructor of [`Computable`]s.
///
/// Every call to [`init`](Self::init) must return a fresh computable sharing no state with any
/// other, so independent sessions using the same configuration never observe each other.
pub trait ComputableFactory {
    type Computable: Computable;

    /// [`SubKind`]s required by every [`Computable`] this factory constructs.
    fn subscriptions(&self) -> &'static [SubKind];

    fn init(&self) -> Self::Computable;
}

/// Any zero-argument closure returning a [`BarAccumulator`] is a factory.
impl<F> ComputableFactory for F
where
    F: Fn() -> BarAccumulator,
{
    type Computable = BarAccumulator;

    fn subscriptions(&self) -> &'static [SubKind] {
        crate::bar::accumulator::BAR_SUBSCRIPTIONS
    }

    fn init(&self) -> Self::Computable {
        self()
    }
}

/// [`ComputableFactory`] of [`BarAccumulator`]s for a validated [`BarSpec`].
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, Constructor, From)]
pub struct BarFactory {
    pub spec: BarSpec,
}

impl ComputableFactory for BarFactory {
    type Computable = BarAccumulator;

    fn subscriptions(&self) -> &'static [SubKind] {
        crate::bar::accumulator::BAR_SUBSCRIPTIONS
    }

    fn init(&self) -> Self::Computable {
        BarAccumulator::new(self.spec.clone())
    }
}

/// Validate a user supplied [`BarConfig`] and return the [`BarFactory`] that builds fresh
/// [`BarAccumulator`]s for it.
///
/// Invalid configurations are rejected here, before any event is consumed.
pub fn compute_derivative_bars(config: BarConfig) -> Result<BarFactory, BarError> {
    BarSpec::try_from(config).map(BarFactory::new)
}

/// Output of a [`ComputeRouter`](router::ComputeRouter): either a computed item or the original
/// [`MarketEvent`] passed through.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Computed<Output = Bar> {
    Output(Output),
    Market(MarketEvent),
}

impl<Output> Computed<Output> {
    pub fn output(&self) -> Option<&Output> {
        match self {
            Computed::Output(output) => Some(output),
            Computed::Market(_) => None,
        }
    }

    pub fn into_output(self) -> Option<Output> {
        match self {
            Computed::Output(output) => Some(output),
            Computed::Market(_) => None,
        }
    }
}

impl<Output> Timed for Computed<Output>
where
    Output: Timed,
{
    fn time(&self) -> DateTime<Utc> {
        match self {
            Computed::Output(output) => output.time(),
            Computed::Market(event) => event.exchange_time,
        }
    }
}

impl Computed<Bar> {
    /// Data type discriminator used by downstream filters.
    pub fn data_type(&self) -> &'static str {
        match self {
            Computed::Output(_) => Bar::DATA_TYPE,
            Computed::Market(event) => event.sub_kind().as_str(),
        }
    }
}
