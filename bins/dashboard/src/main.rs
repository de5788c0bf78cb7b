//! Bazaar Admin Dashboard
//!
//! Terminal front end for the admin metrics endpoint. Polls in the
//! background and redraws on every change.
//!
//! Usage: `bazaar-dashboard [START_DATE] [END_DATE]` with dates as
//! `YYYY-MM-DD`. Commands on stdin: `r` refresh, `c` clear filters,
//! `a` toggle auto-refresh, `range START [END]`, `q` quit.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bazaar_client::{DashboardClient, DashboardPoller, DashboardState, PollerOptions, Session};
use bazaar_core::dashboard::{DATE_FORMAT, DateRange, format_inr, trend_label};
use bazaar_shared::{AppConfig, DashboardConfig};

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Refresh,
    ClearFilters,
    ToggleAutoRefresh,
    Range(DateRange),
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so the rendered dashboard owns stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bazaar_dashboard=info,bazaar_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load().map_or_else(
        |e| {
            debug!(error = %e, "Using default dashboard configuration");
            DashboardConfig::default()
        },
        |c| c.dashboard,
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let range = parse_range(&args)?;

    let session = Session::from_env();
    let token = session.as_ref().map(|s| s.token.clone()).unwrap_or_default();
    let client = DashboardClient::new(&config, token).context("Failed to build HTTP client")?;
    info!(endpoint = client.endpoint(), "Connecting to dashboard API");

    let poller = match DashboardPoller::start(
        session.as_ref(),
        Arc::new(client),
        PollerOptions {
            interval: Duration::from_secs(config.poll_interval_secs),
            auto_refresh: true,
            range,
        },
    ) {
        Ok(poller) => poller,
        Err(e) => bail!("{e}. Set BAZAAR_TOKEN and BAZAAR_USER_TYPE=admin"),
    };

    let mut updates = poller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                println!("{}", render(&state));
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Ok(Some(Input::Quit)) => break,
                    Ok(Some(input)) => apply(&poller, input),
                    Ok(None) => {}
                    Err(e) => eprintln!("{e}"),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("Dashboard closed");
    Ok(())
}

fn apply(poller: &DashboardPoller, input: Input) {
    match input {
        Input::Refresh => poller.refresh(),
        Input::ClearFilters => poller.clear_filters(),
        Input::ToggleAutoRefresh => poller.set_auto_refresh(!poller.state().auto_refresh),
        Input::Range(range) => poller.set_range(range),
        Input::Quit => {}
    }
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .with_context(|| format!("'{raw}' is not a YYYY-MM-DD date"))
}

fn parse_range(args: &[String]) -> anyhow::Result<DateRange> {
    let start = args.first().map(|s| parse_date(s)).transpose()?;
    let end = args.get(1).map(|s| parse_date(s)).transpose()?;
    Ok(DateRange::new(start, end))
}

fn parse_input(line: &str) -> anyhow::Result<Option<Input>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let input = match words.as_slice() {
        [] => return Ok(None),
        ["r" | "refresh"] => Input::Refresh,
        ["c" | "clear"] => Input::ClearFilters,
        ["a" | "auto"] => Input::ToggleAutoRefresh,
        ["q" | "quit"] => Input::Quit,
        ["range", bounds @ ..] if bounds.len() <= 2 => {
            let bounds: Vec<String> = bounds.iter().map(ToString::to_string).collect();
            Input::Range(parse_range(&bounds)?)
        }
        _ => bail!("Unknown command: {line}"),
    };
    Ok(Some(input))
}

fn render(state: &DashboardState) -> String {
    let stats = &state.stats;
    let mut out = String::new();

    let range = match (state.range.start, state.range.end) {
        (None, None) => "all time".to_string(),
        (start, end) => format!(
            "{} .. {}",
            start.map_or_else(|| "*".to_string(), |d| d.to_string()),
            end.map_or_else(|| "*".to_string(), |d| d.to_string()),
        ),
    };
    let _ = writeln!(
        out,
        "== Bazaar dashboard ({range}) auto-refresh {} ==",
        if state.auto_refresh { "on" } else { "off" }
    );

    if let Some(error) = &state.error {
        let _ = writeln!(out, "!! {error}");
    }
    if state.loading {
        let _ = writeln!(out, "   loading...");
    }

    let _ = writeln!(
        out,
        "Users {:>6}   Providers {:>6}   Listings {:>6}   Bookings {:>6}",
        stats.users, stats.providers, stats.listings, stats.bookings
    );
    let _ = writeln!(
        out,
        "Pending {:>4}   Completed {:>6}   Cancelled {:>5}",
        stats.pending_bookings, stats.completed_bookings, stats.cancelled_bookings
    );
    let _ = writeln!(
        out,
        "Revenue {}   Avg booking {}",
        format_inr(stats.revenue),
        format_inr(stats.avg_booking_value)
    );
    let _ = write!(
        out,
        "Conversion {}%   User growth {}",
        stats.conversion_rate.normalize(),
        trend_label(stats.user_growth)
    );
    if let Some(at) = state.last_updated {
        let _ = write!(out, "\nUpdated {}", at.format("%H:%M:%S"));
    }
    out
}
