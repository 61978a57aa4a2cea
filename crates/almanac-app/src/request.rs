use almanac_core::config::{CalendarConfig, EngineConfig};
use almanac_rfc::rfc::ical::record::Attributes;
use almanac_service::calendar::ChunkedAssembler;
use serde::Deserialize;

use crate::error::AppResult;

/// A batch as read from standard input.
///
/// `events` stays optional so that a request without it reaches the engine
/// and is reported as missing input rather than as malformed JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarRequest {
    #[serde(default)]
    pub header: Attributes,
    #[serde(default)]
    pub events: Option<Vec<Attributes>>,
}

impl CalendarRequest {
    /// ## Summary
    /// Parses a request document.
    ///
    /// ## Errors
    /// Returns `AppError::MalformedRequest` if `json` is not a request object.
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Fills header attributes the request leaves out from configuration.
    pub fn apply_defaults(&mut self, calendar: &CalendarConfig) {
        self.header
            .entry("productId")
            .or_insert_with(|| calendar.product_id.clone().into());
        self.header
            .entry("method")
            .or_insert_with(|| calendar.method.clone().into());
    }

    /// ## Summary
    /// Renders the request to an iCalendar document.
    ///
    /// ## Errors
    /// Returns an error if the engine settings are unusable or the batch
    /// fails to assemble.
    #[tracing::instrument(skip_all, fields(events = self.events.as_ref().map_or(0, Vec::len)))]
    pub async fn render(&self, engine: &EngineConfig) -> AppResult<String> {
        let assembler = ChunkedAssembler::from_config(engine)?;
        Ok(assembler
            .assemble(self.events.as_deref(), &self.header)
            .await?)
    }
}
