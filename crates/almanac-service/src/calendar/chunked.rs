//! Chunked asynchronous batch assembly.
//!
//! Produces the same document as [`super::create_events`] but suspends the
//! task at a fixed cadence so that large batches share the runtime with other
//! work. Suspension only happens between events, so output order always
//! follows input order.

use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use almanac_core::config::{EngineConfig, YieldStrategy};
use almanac_core::constants::DEFAULT_YIELD_EVERY;
use almanac_core::error::CoreError;
use almanac_rfc::rfc::ical::record::Attributes;
use futures::FutureExt;

use super::assemble::{Assembly, panicked};
use crate::error::{ServiceError, ServiceResult};

const DEFAULT_CADENCE: NonZeroUsize = match NonZeroUsize::new(DEFAULT_YIELD_EVERY) {
    Some(cadence) => cadence,
    None => NonZeroUsize::MIN,
};

const DEFAULT_TIMER_DELAY: Duration = Duration::from_millis(1);

/// Whether the assembler suspends after rendering the event at `index`.
///
/// The first event never triggers a suspension.
const fn yields_after(index: usize, every: NonZeroUsize) -> bool {
    index > 0 && index % every.get() == 0
}

/// Assembles calendar documents on an async runtime, suspending every
/// `yield_every` events.
#[derive(Debug, Clone)]
pub struct ChunkedAssembler {
    yield_every: NonZeroUsize,
    strategy: YieldStrategy,
    timer_delay: Duration,
}

impl Default for ChunkedAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_CADENCE)
    }
}

impl ChunkedAssembler {
    #[must_use]
    pub const fn new(yield_every: NonZeroUsize) -> Self {
        Self {
            yield_every,
            strategy: YieldStrategy::Immediate,
            timer_delay: DEFAULT_TIMER_DELAY,
        }
    }

    /// ## Summary
    /// Builds an assembler from the engine section of the settings.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` if `yield_every` is zero.
    pub fn from_config(config: &EngineConfig) -> ServiceResult<Self> {
        let yield_every = NonZeroUsize::new(config.yield_every).ok_or_else(|| {
            CoreError::InvalidConfiguration("engine.yield_every must be greater than zero".into())
        })?;

        Ok(Self::new(yield_every)
            .with_strategy(config.yield_strategy, Duration::from_millis(config.timer_delay_ms)))
    }

    /// Sets how the assembler suspends. `timer_delay` only applies to
    /// [`YieldStrategy::Timer`].
    #[must_use]
    pub const fn with_strategy(mut self, strategy: YieldStrategy, timer_delay: Duration) -> Self {
        self.strategy = strategy;
        self.timer_delay = timer_delay;
        self
    }

    #[must_use]
    pub const fn yield_every(&self) -> NonZeroUsize {
        self.yield_every
    }

    #[must_use]
    pub const fn strategy(&self) -> YieldStrategy {
        self.strategy
    }

    /// ## Summary
    /// Assembles a calendar document from `events` with `header` attributes
    /// shared by every event.
    ///
    /// The returned future always completes with a result; panics raised
    /// while assembling are caught and reported as errors.
    ///
    /// ## Errors
    /// Returns `ServiceError::MissingInput` when `events` is `None`, the first
    /// header or event validation error otherwise, or `ServiceError::Panicked`
    /// if assembly panicked.
    #[tracing::instrument(skip_all, fields(yield_every = self.yield_every.get()))]
    pub async fn assemble(
        &self,
        events: Option<&[Attributes]>,
        header: &Attributes,
    ) -> ServiceResult<String> {
        AssertUnwindSafe(self.run(events, header))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(panicked(payload.as_ref())))
    }

    async fn run(&self, events: Option<&[Attributes]>, header: &Attributes) -> ServiceResult<String> {
        let events = events.ok_or(ServiceError::MissingInput)?;

        let mut assembly = Assembly::begin(events, header)?;
        for (index, event) in events.iter().enumerate() {
            assembly
                .push_event(event)
                .inspect_err(|error| tracing::debug!(index, %error, "Event rejected"))?;

            if yields_after(index, self.yield_every) {
                tracing::trace!(index, "Yielding to scheduler");
                self.tick().await;
            }
        }

        tracing::debug!(count = events.len(), "Assembled calendar");
        Ok(assembly.finish())
    }

    /// Suspends once. The timer strategy needs a Tokio runtime with its time
    /// driver enabled and falls back to an immediate yield without one.
    async fn tick(&self) {
        match self.strategy {
            YieldStrategy::Immediate => tokio::task::yield_now().await,
            YieldStrategy::Timer => match timer(self.timer_delay) {
                Some(sleep) => sleep.await,
                None => tokio::task::yield_now().await,
            },
        }
    }
}

/// A sleep future for `delay`, or `None` when the current context cannot
/// drive timers.
fn timer(delay: Duration) -> Option<tokio::time::Sleep> {
    if tokio::runtime::Handle::try_current().is_err() {
        tracing::trace!("No Tokio runtime, yielding without a timer");
        return None;
    }

    // Tokio panics when the sleep is created on a runtime built without timers
    std::panic::catch_unwind(|| tokio::time::sleep(delay))
        .inspect_err(|_| tracing::trace!("Timers disabled, yielding without a timer"))
        .ok()
}

/// ## Summary
/// Assembles a calendar document with the default cadence, suspending every
/// thousand events.
///
/// ## Errors
/// As [`ChunkedAssembler::assemble`].
pub async fn create_events_async(
    events: Option<&[Attributes]>,
    header: Option<&Attributes>,
) -> ServiceResult<String> {
    let empty = Attributes::new();
    ChunkedAssembler::default()
        .assemble(events, header.unwrap_or(&empty))
        .await
}
