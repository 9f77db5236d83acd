use std::time::Duration;

use gcontacts_domain::ContactsError;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log format (`json` or `text`).
pub const LOG_FORMAT_ENV: &str = "GCONTACTS_LOG_FORMAT";

const DEFAULT_FILTER: &str = "warn,gcontacts=info";

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`, falling back to warnings plus info for our own crates.
/// Logs go to stderr so command output on stdout stays machine readable.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|value| value.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if result.is_err() {
        warn!("Tracing subscriber already installed");
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"contacts::load"`).
/// * `elapsed` - Duration the command execution took.
/// * `error` - The failure, if any.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&ContactsError>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(err) => warn!(
            command,
            duration_ms,
            error_type = error_label(err),
            error = %err,
            "command_execution_failure"
        ),
    }
}

/// Convert a `ContactsError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &ContactsError) -> &'static str {
    error.label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_error_kind() {
        assert_eq!(error_label(&ContactsError::AuthConfig("missing".into())), "auth_config");
        assert_eq!(error_label(&ContactsError::directory_status(401, "nope")), "directory_fetch");
    }

    #[test]
    fn init_tracing_can_run_twice() {
        init_tracing();
        init_tracing();
        log_command_execution("contacts::load", Duration::from_millis(5), None);
    }
}
