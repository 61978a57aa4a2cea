//! Synchronous batch assembly of calendar documents.
//!
//! A batch validates its header once, then renders each event in input order.
//! The first failure ends the batch and discards everything rendered so far.
//! Panics raised while assembling are turned into [`ServiceError::Panicked`],
//! so no entry point in this module unwinds into its caller.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use almanac_rfc::rfc::ical::record::{Attributes, format_event, format_footer, format_header};

use super::compose::{compose_header, compose_header_and_event, merge_attributes};
use crate::error::{ServiceError, ServiceResult};

/// Rendered fragments of one calendar document, joined once on completion.
pub(crate) struct Assembly<'a> {
    shared: &'a Attributes,
    fragments: Vec<String>,
}

impl<'a> Assembly<'a> {
    /// Validates the batch header and renders it as the first fragment.
    ///
    /// The header comes from `shared` alone for an empty batch, otherwise from
    /// the first event merged over `shared`.
    pub(crate) fn begin(events: &[Attributes], shared: &'a Attributes) -> ServiceResult<Self> {
        let header = match events.first() {
            None => compose_header(shared)?,
            Some(first) => compose_header_and_event(&merge_attributes(shared, first))?.header,
        };

        let mut fragments = Vec::with_capacity(events.len() + 2);
        fragments.push(format_header(&header));
        Ok(Self { shared, fragments })
    }

    pub(crate) fn push_event(&mut self, event: &Attributes) -> ServiceResult<()> {
        let validated = compose_header_and_event(&merge_attributes(self.shared, event))?;
        self.fragments.push(format_event(&validated));
        Ok(())
    }

    pub(crate) fn finish(mut self) -> String {
        self.fragments.push(format_footer());
        self.fragments.concat()
    }
}

/// Converts a caught panic payload into an error.
pub(crate) fn panicked(payload: &(dyn Any + Send)) -> ServiceError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());

    tracing::error!(%message, "Calendar assembly panicked");
    ServiceError::Panicked(message)
}

fn assemble(events: Option<&[Attributes]>, shared: Option<&Attributes>) -> ServiceResult<String> {
    let events = events.ok_or(ServiceError::MissingInput)?;
    let empty = Attributes::new();
    let shared = shared.unwrap_or(&empty);

    let mut assembly = Assembly::begin(events, shared)?;
    for (index, event) in events.iter().enumerate() {
        assembly
            .push_event(event)
            .inspect_err(|error| tracing::debug!(index, %error, "Event rejected"))?;
    }

    tracing::debug!(count = events.len(), "Assembled calendar");
    Ok(assembly.finish())
}

fn deliver<F, R>(result: ServiceResult<String>, on_done: F) -> R
where
    F: FnOnce(Option<ServiceError>, Option<String>) -> R,
{
    match result {
        Ok(text) => on_done(None, Some(text)),
        Err(error) => on_done(Some(error), None),
    }
}

/// ## Summary
/// Assembles a calendar document from `events`, with `header` attributes
/// shared by every event.
///
/// `None` for `events` is a caller error; an empty slice yields a calendar
/// with no events.
///
/// ## Errors
/// Returns `ServiceError::MissingInput` when `events` is `None`, the first
/// header or event validation error otherwise, or `ServiceError::Panicked` if
/// assembly panicked.
pub fn create_events(
    events: Option<&[Attributes]>,
    header: Option<&Attributes>,
) -> ServiceResult<String> {
    catch_unwind(AssertUnwindSafe(|| assemble(events, header)))
        .unwrap_or_else(|payload| Err(panicked(payload.as_ref())))
}

/// ## Summary
/// Assembles a calendar document holding one event.
///
/// ## Errors
/// As [`create_events`].
pub fn create_event(attributes: &Attributes) -> ServiceResult<String> {
    create_events(Some(std::slice::from_ref(attributes)), None)
}

/// ## Summary
/// Like [`create_events`], but hands the outcome to `on_done` as
/// `(error, value)` and returns whatever it returns. Exactly one of the two
/// arguments is `Some`.
pub fn create_events_with<F, R>(
    events: Option<&[Attributes]>,
    header: Option<&Attributes>,
    on_done: F,
) -> R
where
    F: FnOnce(Option<ServiceError>, Option<String>) -> R,
{
    deliver(create_events(events, header), on_done)
}

/// ## Summary
/// Like [`create_event`], but hands the outcome to `on_done`.
pub fn create_event_with<F, R>(attributes: &Attributes, on_done: F) -> R
where
    F: FnOnce(Option<ServiceError>, Option<String>) -> R,
{
    deliver(create_event(attributes), on_done)
}

/// The second argument of [`create_events_compat`]: shared header attributes
/// or a completion handler.
pub enum HeaderOrCallback<F> {
    Header(Attributes),
    Callback(F),
}

/// What [`create_events_compat`] did with the outcome.
#[derive(Debug)]
#[must_use]
pub enum Dispatch<R> {
    /// No handler was resolved; the outcome is returned.
    Returned(ServiceResult<String>),
    /// A handler received the outcome; this is its return value.
    Delivered(R),
}

/// ## Summary
/// Entry point for callers that pass header attributes and a handler in
/// loosely typed positions.
///
/// `second` supplies either header attributes or a handler. A `third` handler
/// always wins over a handler given as `second`, and a handler given as
/// `second` leaves the header empty.
pub fn create_events_compat<F, R>(
    events: Option<&[Attributes]>,
    second: Option<HeaderOrCallback<F>>,
    third: Option<F>,
) -> Dispatch<R>
where
    F: FnOnce(Option<ServiceError>, Option<String>) -> R,
{
    let (header, inferred) = match second {
        Some(HeaderOrCallback::Header(header)) => (Some(header), None),
        Some(HeaderOrCallback::Callback(on_done)) => (None, Some(on_done)),
        None => (None, None),
    };

    let result = create_events(events, header.as_ref());
    match third.or(inferred) {
        Some(on_done) => Dispatch::Delivered(deliver(result, on_done)),
        None => Dispatch::Returned(result),
    }
}
