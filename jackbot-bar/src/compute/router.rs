use crate::{
    compute::{Computable, ComputableFactory, Computed, Timed},
    error::BarError,
    event::MarketEvent,
    subscription::SubKind,
};
use fnv::FnvHashMap;
use futures::{Stream, StreamExt};
use jackbot_instrument::exchange::ExchangeId;
use smol_str::SmolStr;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Convenient type alias for the output of a [`ComputeRouter`] built from `Factory`s.
pub type RouterOutput<Factory> =
    Computed<<<Factory as ComputableFactory>::Computable as Computable>::Output>;

/// Drives a set of [`ComputableFactory`] configurations over a single event session.
///
/// One [`Computable`] per factory is lazily initialised for every `(ExchangeId, symbol)` seen, so
/// instruments never share state. Each event is fanned out by reference to every interested
/// computable before the router advances.
///
/// A router is owned by one session. Concurrent sessions build their own router from the same
/// factories.
#[derive(Debug)]
pub struct ComputeRouter<Factory>
where
    Factory: ComputableFactory,
{
    factories: Vec<Factory>,
    computables: FnvHashMap<(ExchangeId, SmolStr), Vec<Factory::Computable>>,
}

impl<Factory> ComputeRouter<Factory>
where
    Factory: ComputableFactory,
{
    /// Construct a new [`ComputeRouter`] from a non-empty collection of factories.
    pub fn new<Iter>(factories: Iter) -> Result<Self, BarError>
    where
        Iter: IntoIterator<Item = Factory>,
    {
        let factories = factories.into_iter().collect::<Vec<_>>();
        if factories.is_empty() {
            return Err(BarError::FactoriesEmpty);
        }

        let router = Self {
            factories,
            computables: FnvHashMap::default(),
        };

        info!(
            factories = router.factories.len(),
            subscriptions = ?router.subscriptions(),
            "initialised ComputeRouter"
        );

        Ok(router)
    }

    /// Union of the [`SubKind`]s required by every factory, ie/ what the host must subscribe to.
    pub fn subscriptions(&self) -> BTreeSet<SubKind> {
        self.factories
            .iter()
            .flat_map(|factory| factory.subscriptions().iter().copied())
            .collect()
    }

    /// Number of instruments with initialised computables.
    pub fn num_instruments(&self) -> usize {
        self.computables.len()
    }

    /// Feed the next [`MarketEvent`] to every interested computable of its instrument.
    ///
    /// Returns the computed outputs ordered by time (ties kept in factory order), followed by the
    /// original event. Outputs are never stamped later than the event that produced them, so the
    /// sequence stays in non-decreasing time order.
    pub fn process(&mut self, event: MarketEvent) -> Vec<RouterOutput<Factory>> {
        let sub_kind = event.sub_kind();
        let factories = &self.factories;

        let computables = self
            .computables
            .entry((event.exchange, event.symbol.clone()))
            .or_insert_with(|| {
                debug!(
                    exchange = %event.exchange,
                    symbol = %event.symbol,
                    computables = factories.len(),
                    "initialised computables for instrument"
                );
                factories.iter().map(ComputableFactory::init).collect()
            });

        let mut outputs = computables
            .iter_mut()
            .filter(|computable| computable.subscriptions().contains(&sub_kind))
            .flat_map(|computable| computable.compute(&event))
            .collect::<Vec<_>>();

        // Time bars are stamped at their bucket boundary, which precedes tick & volume bars
        // stamped with this event
        outputs.sort_by_key(Timed::time);

        let mut outputs = outputs
            .into_iter()
            .map(Computed::Output)
            .collect::<Vec<_>>();
        outputs.push(Computed::Market(event));
        outputs
    }

    /// Lazily compute over an [`Iterator`] of [`MarketEvent`]s, consuming the router.
    pub fn compute<Iter>(self, events: Iter) -> Compute<Iter::IntoIter, Factory>
    where
        Iter: IntoIterator<Item = MarketEvent>,
    {
        Compute {
            router: self,
            events: events.into_iter(),
            pending: Vec::new().into_iter(),
        }
    }

    /// Lazily compute over a [`Stream`] of [`MarketEvent`]s, consuming the router.
    pub fn compute_stream<St>(mut self, events: St) -> impl Stream<Item = RouterOutput<Factory>>
    where
        St: Stream<Item = MarketEvent>,
    {
        events.flat_map(move |event| futures::stream::iter(self.process(event)))
    }
}

/// [`Iterator`] adaptor returned by [`ComputeRouter::compute`].
///
/// Holds at most the outputs of one event at a time.
pub struct Compute<Iter, Factory>
where
    Factory: ComputableFactory,
{
    router: ComputeRouter<Factory>,
    events: Iter,
    pending: std::vec::IntoIter<RouterOutput<Factory>>,
}

impl<Iter, Factory> std::fmt::Debug for Compute<Iter, Factory>
where
    Iter: std::fmt::Debug,
    Factory: ComputableFactory + std::fmt::Debug,
    Factory::Computable: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compute")
            .field("router", &self.router)
            .field("events", &self.events)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<Iter, Factory> Iterator for Compute<Iter, Factory>
where
    Iter: Iterator<Item = MarketEvent>,
    Factory: ComputableFactory,
{
    type Item = RouterOutput<Factory>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(output) = self.pending.next() {
                return Some(output);
            }

            let event = self.events.next()?;
            self.pending = self.router.process(event).into_iter();
        }
    }
}
