use std::env;

use netainfo_service::config::{Config, LogFormat};
use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

fn get_rust_log(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::OFF => "",
        LevelFilter::ERROR => "ERROR",
        LevelFilter::WARN => "WARN",
        LevelFilter::INFO => {
            "INFO,\
             hyper=WARN"
        }
        LevelFilter::DEBUG => {
            "INFO,\
             hyper=WARN,\
             netainfo=DEBUG,\
             netainfo_service=DEBUG"
        }
        LevelFilter::TRACE => {
            "INFO,\
             hyper=WARN,\
             netainfo=TRACE,\
             netainfo_service=TRACE"
        }
    }
}

/// Initializes logging for the dashboard backend.
///
/// This considers the `RUST_LOG` environment variable and defaults it to the level specified in the
/// configuration. Additionally, this toggles `RUST_BACKTRACE` based on the `enable_backtraces`
/// config value.
///
/// # Safety
/// This function uses [`std::env::set_var`] to modify the environment. That function is only safe
/// to call in single-threaded contexts to prevent unsynchronized concurrent access to the environment.
pub unsafe fn init_logging(config: &Config) {
    if config.logging.enable_backtraces {
        // SAFETY: As documented, this function may only be called in a single-threaded context.
        unsafe { env::set_var("RUST_BACKTRACE", "1") };
    }

    let rust_log =
        env::var("RUST_LOG").unwrap_or_else(|_| get_rust_log(config.logging.level).to_string());

    let fmt_layer = fmt_layer(
        config.logging.format,
        console::user_attended(),
        std::io::stdout,
    )
    .with_filter(EnvFilter::new(&rust_log));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(sentry::integrations::tracing::layer())
        .init();
}

/// Builds the layer that writes events to `make_writer` in the configured format.
///
/// JSON lines carry the event fields at the top level next to the span list, so that the
/// aggregation `key` of a request can be filtered on directly.
fn fmt_layer<S, W>(
    format: LogFormat,
    attended: bool,
    make_writer: W,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(make_writer)
        .with_timer(UtcTime::rfc_3339())
        .with_target(true);

    match (format, attended) {
        (LogFormat::Auto, true) | (LogFormat::Pretty, _) => layer.pretty().boxed(),
        (LogFormat::Auto, false) | (LogFormat::Simplified, _) => {
            layer.compact().with_ansi(false).boxed()
        }
        (LogFormat::Json, _) => layer
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
    }
}

/// Logs an error to the configured logger or `stderr` if not yet configured.
pub fn ensure_log_error(error: &anyhow::Error) {
    if tracing::Level::ERROR <= tracing::level_filters::STATIC_MAX_LEVEL
        && tracing::Level::ERROR <= LevelFilter::current()
    {
        tracing::error!("{:?}", error);
    } else {
        eprintln!("{error:?}");
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Collects everything written by a layer.
    #[derive(Clone, Debug, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn lines(&self) -> Vec<String> {
            let output = String::from_utf8(self.0.lock().unwrap().clone()).unwrap();
            output.lines().map(str::to_owned).collect()
        }
    }

    #[test]
    fn test_json_lines() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::registry().with(fmt_layer(
            LogFormat::Json,
            true,
            move || writer.clone(),
        ));

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("charts", route = "charts");
            let _guard = span.enter();
            tracing::info!(key = "2014/State/Winners", "computed aggregation");
        });

        let lines = captured.lines();
        assert_eq!(lines.len(), 1);
        let event: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(event["level"], "INFO");
        assert_eq!(event["message"], "computed aggregation");
        assert_eq!(event["key"], "2014/State/Winners");
        assert_eq!(event["span"]["name"], "charts");
        assert_eq!(event["spans"][0]["route"], "charts");
        assert!(event["line_number"].is_u64());
    }

    #[test]
    fn test_simplified_lines() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::registry().with(fmt_layer(
            LogFormat::Simplified,
            true,
            move || writer.clone(),
        ));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("dataset reloaded");
        });

        let lines = captured.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].ends_with("dataset reloaded"));
        // no color codes outside of a terminal
        assert!(!lines[0].contains('\u{1b}'));
    }

    #[test]
    fn test_rust_log_defaults() {
        assert_eq!(get_rust_log(LevelFilter::OFF), "");
        assert!(get_rust_log(LevelFilter::DEBUG).contains("netainfo_service=DEBUG"));
        // every default must be a valid filter directive
        for level in [LevelFilter::INFO, LevelFilter::DEBUG, LevelFilter::TRACE] {
            assert!(get_rust_log(level).parse::<EnvFilter>().is_ok());
        }
    }
}
