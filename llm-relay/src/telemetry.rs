use std::io::{self, IsTerminal};

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Crate target prefix used to filter only library-originated logs.
pub const TARGET_PREFIX: &str = "llm_relay";

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Returns `true` for events emitted by this crate.
pub fn is_relay_target(target: &str) -> bool {
    target.starts_with(TARGET_PREFIX)
}

/// Build a **library-scoped** formatting layer that renders ONLY events emitted by this crate.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with `file:line`
/// - Span close events, so `#[instrument]`ed endpoint calls report durations
/// - ANSI colors only when stdout is a terminal
///
/// Compose it in the binary together with the global subscriber.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();

    let only_this_crate = filter::filter_fn(|meta| is_relay_target(meta.target()));

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_this_crate)
}

/// Layer for everything that is **not** relay traffic: HTTP routes, config
/// store, startup. Plain format without source locations.
pub fn app_layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_target(false)
        .with_ansi(io::stdout().is_terminal())
        .with_filter(filter::filter_fn(|meta| !is_relay_target(meta.target())))
}

/// Installs the global subscriber: [`env_filter_with_level`], then
/// [`app_layer`] and the relay [`layer`] side by side, so every event is
/// printed exactly once.
///
/// # Errors
/// [`TryInitError`] if a global subscriber is already set.
pub fn try_init(default: &str, relay_level: Level) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter_with_level(default, relay_level))
        .with(app_layer())
        .with(layer())
        .try_init()
}

/// Level directive for **this** library only, e.g. `llm_relay=debug`.
pub fn level_directive(level: Level) -> Directive {
    format!("{TARGET_PREFIX}={}", level.as_str().to_lowercase())
        .parse()
        .unwrap_or_else(|_| LevelFilter::from_level(level).into())
}

/// `EnvFilter` from `RUST_LOG` (or `default`), plus a per-crate level for
/// this library.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    base.add_directive(level_directive(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_targets_this_crate() {
        assert_eq!(level_directive(Level::DEBUG).to_string(), "llm_relay=debug");
    }

    #[test]
    fn only_relay_targets_match() {
        assert!(is_relay_target("llm_relay::relay"));
        assert!(is_relay_target("llm_relay::services::ollama_service"));
        assert!(!is_relay_target("api::routes"));
        assert!(!is_relay_target("config_store::store"));
    }

    #[test]
    fn second_init_is_rejected() {
        // Whichever call wins, a second global subscriber is refused.
        let _ = try_init("info", Level::INFO);
        assert!(try_init("info", Level::DEBUG).is_err());
    }
}
