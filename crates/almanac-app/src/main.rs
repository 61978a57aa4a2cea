use almanac_app::request::CalendarRequest;
use almanac_core::config::load_config;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    // stdout carries the calendar, so logs go to stderr
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let config = load_config()?;

    tracing::debug!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping info");
    }

    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;

    let mut request = CalendarRequest::from_json(&input)?;
    request.apply_defaults(&config.calendar);

    let calendar = request.render(&config.engine).await?;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(calendar.as_bytes()).await?;
    stdout.flush().await?;

    tracing::info!(bytes = calendar.len(), "Calendar written");

    Ok(())
}
