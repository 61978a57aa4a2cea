use config::Config;
use serde::Deserialize;

use crate::constants::{DEFAULT_METHOD, DEFAULT_PRODUCT_ID, DEFAULT_YIELD_EVERY};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub engine: EngineConfig,
    pub calendar: CalendarConfig,
    pub logging: LoggingConfig,
}

/// How the chunked assembler hands control back to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldStrategy {
    /// Reschedule the task at the back of the run queue.
    #[default]
    Immediate,
    /// Sleep on the runtime timer for `timer_delay_ms`.
    Timer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub yield_every: usize,
    pub yield_strategy: YieldStrategy,
    pub timer_delay_ms: u64,
}

impl EngineConfig {
    /// ## Summary
    /// Checks that the engine settings describe a usable cadence.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` if `yield_every` is zero.
    pub fn validate(&self) -> CoreResult<()> {
        if self.yield_every == 0 {
            return Err(CoreError::InvalidConfiguration(
                "engine.yield_every must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            yield_every: DEFAULT_YIELD_EVERY,
            yield_strategy: YieldStrategy::default(),
            timer_delay_ms: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    pub product_id: String,
    pub method: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml`.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it, or
    /// validating the engine section fails.
    pub fn load() -> CoreResult<Self> {
        let settings = Self::defaults()?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env vars, e.g. ALMANAC_ENGINE__YIELD_EVERY=500
            .add_source(
                config::Environment::with_prefix("ALMANAC")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?;

        settings.engine.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Layers a TOML document over the built-in defaults.
    ///
    /// ## Errors
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_toml(toml: &str) -> CoreResult<Self> {
        let settings = Self::defaults()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Self>()?;

        settings.engine.validate()?;
        Ok(settings)
    }

    fn defaults() -> CoreResult<config::ConfigBuilder<config::builder::DefaultState>> {
        let engine = EngineConfig::default();
        Ok(Config::builder()
            .set_default("engine.yield_every", engine.yield_every.to_string())?
            .set_default("engine.yield_strategy", "immediate")?
            .set_default("engine.timer_delay_ms", engine.timer_delay_ms)?
            .set_default("calendar.product_id", DEFAULT_PRODUCT_ID)?
            .set_default("calendar.method", DEFAULT_METHOD)?
            .set_default("logging.level", "info")?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> CoreResult<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn defaults_apply_without_sources() {
        let settings = Settings::from_toml("").expect("defaults should deserialize");

        assert_eq!(settings.engine.yield_every, DEFAULT_YIELD_EVERY);
        assert_eq!(settings.engine.yield_strategy, YieldStrategy::Immediate);
        assert_eq!(settings.calendar.product_id, DEFAULT_PRODUCT_ID);
        assert_eq!(settings.calendar.method, "PUBLISH");
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn toml_overrides_defaults() {
        let settings = Settings::from_toml(
            r#"
[engine]
yield_every = 250
yield_strategy = "timer"

[calendar]
product_id = "example/calendar"
"#,
        )
        .expect("toml should deserialize");

        assert_eq!(settings.engine.yield_every, 250);
        assert_eq!(settings.engine.yield_strategy, YieldStrategy::Timer);
        assert_eq!(settings.calendar.product_id, "example/calendar");
        assert_eq!(settings.calendar.method, "PUBLISH");
    }

    #[test]
    fn zero_cadence_is_rejected() {
        let err = Settings::from_toml("[engine]\nyield_every = 0\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfiguration(_)));
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let err = Settings::from_toml("[engine]\nyield_strategy = \"spin\"\n").unwrap_err();
        assert!(matches!(err, CoreError::ConfigError(_)));
    }
}
