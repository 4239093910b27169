use std::time::Duration;

use tracing_subscriber::EnvFilter;

pub fn init() {
    // Initialize tracing subscriber once, honoring RUST_LOG if set.
    // Logs go to stderr: stdout carries protocol frames in stdio mode.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Count one tool invocation by outcome (`ok` or an error kind).
pub fn record_tool_call(tool: &'static str, outcome: &'static str, elapsed: Duration) {
    metrics::counter!("gateway_tool_calls_total", "tool" => tool, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("gateway_tool_call_duration_ms", "tool" => tool)
        .record(elapsed.as_secs_f64() * 1_000.0);
}

/// Record one upstream request against the metadata service.
pub fn record_remote_call(operation: &'static str, success: bool, elapsed: Duration) {
    if !success {
        metrics::counter!("gateway_remote_errors_total", "operation" => operation).increment(1);
    }
    metrics::histogram!("gateway_remote_latency_ms", "operation" => operation)
        .record(elapsed.as_secs_f64() * 1_000.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }

    #[test]
    fn recording_without_exporter_is_a_noop() {
        record_tool_call("list_tables", "ok", Duration::from_millis(3));
        record_remote_call("list_tables", false, Duration::from_millis(3));
    }
}
