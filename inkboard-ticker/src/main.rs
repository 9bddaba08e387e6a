//! inkboard ticker daemon
//!
//! Reads configuration from the environment once, builds the screen
//! rotation, then ticks forever: render the current screen, wait the
//! refresh interval, advance. Ctrl-c exits the loop cleanly.

use inkboard_core::{SourceConfig, SourceKind, TickerConfig, TickerResult};
use inkboard_display::{select_renderer, ScreenOrchestrator};
use inkboard_sources::{CryptoSource, CurrencySource, DataSource, WeatherSource};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("inkboard=info,inkboard_ticker=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Pair each configured screen with its client. Screens whose source
/// settings are absent stay in the list disabled; the orchestrator drops
/// them when it builds the rotation.
fn build_sources(config: &TickerConfig) -> Vec<(SourceConfig, Box<dyn DataSource>)> {
    let mut sources: Vec<(SourceConfig, Box<dyn DataSource>)> = Vec::new();

    for screen in &config.screens {
        let source: Option<Box<dyn DataSource>> = match screen.kind {
            SourceKind::Weather => config
                .weather
                .clone()
                .map(|settings| Box::new(WeatherSource::new(settings)) as Box<dyn DataSource>),
            SourceKind::Currency => config
                .currency
                .clone()
                .map(|settings| Box::new(CurrencySource::new(settings)) as Box<dyn DataSource>),
            SourceKind::Crypto => {
                Some(Box::new(CryptoSource::new(config.crypto.clone())) as Box<dyn DataSource>)
            }
        };

        match source {
            Some(source) => sources.push((screen.clone(), source)),
            None => warn!(source = %screen.kind, "No client for screen, skipping"),
        }
    }

    sources
}

async fn run(config: TickerConfig) -> TickerResult<()> {
    let mut orchestrator = ScreenOrchestrator::new(build_sources(&config))?;
    let mut renderer = select_renderer(config.frame_file.clone());

    info!(
        screens = orchestrator.len(),
        refresh_secs = config.refresh_interval.as_secs(),
        "Ticker started"
    );

    loop {
        let screen = orchestrator.render_current().await;
        if let Err(err) = renderer.render(&screen) {
            error!(screen = %screen.id, error = %err, "Render failed");
        }

        tokio::select! {
            _ = tokio::time::sleep(config.refresh_interval) => {
                orchestrator.advance();
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let config = TickerConfig::from_env();
    if let Err(err) = config.validate() {
        error!(error = %err, "Invalid configuration");
        std::process::exit(1);
    }

    if let Err(err) = run(config).await {
        error!(error = %err, "Ticker stopped");
        std::process::exit(1);
    }

    info!("Ticker stopped");
}
