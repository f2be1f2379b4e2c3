//! Disaster Feed - disaster alerts for one country from several public APIs.
//!
//! Prints the current alerts as an HTML fragment on stdout. Logs go to stderr.
//!
//! # Environment
//!
//! - `DISASTER_FEED_COUNTRY` - country name (default: India)
//! - `DISASTER_FEED_RELIEFWEB_COUNTRY_ID` - ReliefWeb numeric country id (default: 119)
//! - `DISASTER_FEED_CACHE_TTL_SECS` - cache lifetime (default: 300)
//! - `DISASTER_FEED_TIMEOUT_SECS` - per-request timeout (default: 20)
//! - `DISASTER_FEED_REFRESH_SECS` - if set, refresh and re-render on this interval

use std::io::Write;

use tokio::time::{MissedTickBehavior, interval};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use disaster_feed::config::FeedConfig;
use disaster_feed::feed::{DisasterFeed, FeedSnapshot};
use disaster_feed::render::render_html;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("disaster_feed=info".parse()?))
        .init();

    let config = FeedConfig::from_env();
    info!(
        country = %config.country_name,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        timeout_secs = config.request_timeout.as_secs(),
        "Starting disaster feed"
    );

    let mut feed = DisasterFeed::from_config(&config)?;
    info!(sources = ?feed.source_names(), "Sources configured");

    let Some(every) = config.refresh_interval else {
        let snapshot = feed.snapshot().await;
        return print_snapshot(&snapshot);
    };

    info!(refresh_secs = every.as_secs(), "Periodic refresh enabled");
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let snapshot = feed.refresh().await;
        print_snapshot(&snapshot)?;
    }
}

fn print_snapshot(snapshot: &FeedSnapshot) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(render_html(snapshot).as_bytes())?;
    stdout.flush()?;
    info!(
        count = snapshot.events.len(),
        origin = ?snapshot.origin,
        "Feed rendered"
    );
    Ok(())
}
