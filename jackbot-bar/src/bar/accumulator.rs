use crate::{
    bar::{Bar, BarKind, BarSpec, DerivativeSnapshot},
    compute::Computable,
    event::{DataKind, DerivativeTicker, MarketEvent},
    subscription::SubKind,
};
use chrono::{DateTime, Utc};
use jackbot_integration::collection::none_one_or_two::NoneOneOrTwo;
use tracing::debug;

/// [`SubKind`]s a [`BarAccumulator`] must be fed. [`SubKind::BookChange`] is only used as a
/// clock, closing time bars when no derivative ticker arrives in a new bucket.
pub const BAR_SUBSCRIPTIONS: &[SubKind] = &[SubKind::DerivativeTicker, SubKind::BookChange];

/// Mutable state of the bar currently being accumulated.
///
/// `ticks == 0` means no bar is open, and the state must never be emitted.
#[derive(Clone, PartialEq, Debug)]
struct InProgressBar {
    open: DerivativeSnapshot,
    close: DerivativeSnapshot,
    open_time: DateTime<Utc>,
    close_time: DateTime<Utc>,
    time: DateTime<Utc>,
    delta_oi: f64,
    predicted_funding_rate: Option<f64>,
    ticks: u64,
}

impl Default for InProgressBar {
    fn default() -> Self {
        Self {
            open: DerivativeSnapshot::default(),
            close: DerivativeSnapshot::default(),
            open_time: DateTime::<Utc>::MIN_UTC,
            close_time: DateTime::<Utc>::MIN_UTC,
            time: DateTime::<Utc>::MIN_UTC,
            delta_oi: 0.0,
            predicted_funding_rate: None,
            ticks: 0,
        }
    }
}

impl InProgressBar {
    fn is_open(&self) -> bool {
        self.ticks > 0
    }

    fn update(&mut self, exchange_time: DateTime<Utc>, ticker: &DerivativeTicker) {
        if !self.is_open() {
            self.open = DerivativeSnapshot::from(ticker);
            self.open_time = exchange_time;
        }

        self.close = DerivativeSnapshot::from(ticker);
        self.close_time = exchange_time;
        self.predicted_funding_rate = ticker.predicted_funding_rate;
        self.delta_oi =
            self.close.open_interest.unwrap_or(0.0) - self.open.open_interest.unwrap_or(0.0);
        self.ticks += 1;
        self.time = exchange_time;
    }
}

/// Folds the [`DerivativeTicker`]s of a single instrument into [`Bar`]s according to a
/// [`BarSpec`].
///
/// State machine: `Empty` (no ticks) → `Accumulating` → back to `Empty` on every emission.
/// Bars are emitted in input order and never buffered beyond the one in progress.
///
/// An accumulator is owned by exactly one session; build a fresh one per session using a
/// [`BarFactory`](crate::compute::BarFactory).
#[derive(Clone, PartialEq, Debug)]
pub struct BarAccumulator {
    spec: BarSpec,
    bar: InProgressBar,
}

impl BarAccumulator {
    pub fn new(spec: BarSpec) -> Self {
        Self {
            spec,
            bar: InProgressBar::default(),
        }
    }

    pub fn spec(&self) -> &BarSpec {
        &self.spec
    }

    /// Number of derivative tickers folded into the bar in progress (0 if none is open).
    pub fn ticks(&self) -> u64 {
        self.bar.ticks
    }

    /// Consume the next [`MarketEvent`], returning the [`Bar`]s it completed.
    ///
    /// At most two bars are returned: one closed because the event crossed into a new bucket,
    /// and one closed because the event itself pushed the bar over its threshold.
    pub fn consume(&mut self, event: &MarketEvent) -> NoneOneOrTwo<Bar> {
        let crossed = self.has_new_bar(event).then(|| self.compute_bar(event));

        let DataKind::DerivativeTicker(ticker) = &event.kind else {
            return NoneOneOrTwo::from(crossed);
        };

        self.bar.update(event.exchange_time, ticker);

        let completed = self.has_new_bar(event).then(|| self.compute_bar(event));

        NoneOneOrTwo::from((crossed, completed))
    }

    /// Determine if the bar in progress is complete given the next event.
    ///
    /// For [`BarKind::Time`] this also snaps the bar time to the closing bucket boundary.
    fn has_new_bar(&mut self, event: &MarketEvent) -> bool {
        if !self.bar.is_open() {
            return false;
        }

        match self.spec.kind() {
            BarKind::Time => {
                let open_bucket = self.spec.time_bucket(self.bar.open_time);
                let event_bucket = self.spec.time_bucket(event.exchange_time);

                if event_bucket > open_bucket {
                    self.bar.time = self.spec.time_bucket_close(open_bucket);
                    true
                } else {
                    false
                }
            }
            BarKind::Volume => self.bar.delta_oi >= self.spec.interval(),
            BarKind::Tick => self.bar.ticks as f64 >= self.spec.interval(),
        }
    }

    /// Take the bar in progress, stamped with the closing event, leaving an empty bar behind.
    fn compute_bar(&mut self, event: &MarketEvent) -> Bar {
        let InProgressBar {
            open,
            close,
            open_time,
            close_time,
            time,
            delta_oi,
            predicted_funding_rate,
            ticks,
        } = std::mem::take(&mut self.bar);

        debug!(
            exchange = %event.exchange,
            symbol = %event.symbol,
            name = %self.spec.name(),
            %time,
            ticks,
            delta_oi,
            "computed derivative bar"
        );

        Bar {
            exchange: event.exchange,
            symbol: event.symbol.clone(),
            name: self.spec.name().clone(),
            interval: self.spec.interval(),
            kind: self.spec.kind(),
            open,
            close,
            open_time,
            close_time,
            time,
            received_time: event.received_time,
            delta_oi,
            predicted_funding_rate,
            ticks,
        }
    }
}

impl Computable for BarAccumulator {
    type Output = Bar;

    fn subscriptions(&self) -> &'static [SubKind] {
        BAR_SUBSCRIPTIONS
    }

    fn compute(&mut self, event: &MarketEvent) -> NoneOneOrTwo<Self::Output> {
        self.consume(event)
    }
}
