//! Prometheus metrics collection for the directory subsystem.
//!
//! Counters only; the HTTP exposition endpoint belongs to the transport
//! layer, which gathers from [`registry`].

use crate::error::DirectoryError;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Directory operations by operation name and result code.
pub static DIRECTORY_OPS: OnceLock<IntCounterVec> = OnceLock::new();

/// Account expiry checks by outcome (expired / valid / error).
pub static EXPIRY_CHECKS: OnceLock<IntCounterVec> = OnceLock::new();

/// Registration notifications that failed, by module.
pub static POLICY_MODULE_FAILURES: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at server startup before any metrics are recorded.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(
        DIRECTORY_OPS,
        IntCounterVec::new(
            Opts::new("hearth_directory_ops_total", "Directory operations by result"),
            &["op", "result"]
        )
    );
    register!(
        EXPIRY_CHECKS,
        IntCounterVec::new(
            Opts::new("hearth_expiry_checks_total", "Account expiry checks by outcome"),
            &["outcome"]
        )
    );
    register!(
        POLICY_MODULE_FAILURES,
        IntCounterVec::new(
            Opts::new(
                "hearth_policy_module_failures_total",
                "Account validity module failures by module"
            ),
            &["module"]
        )
    );
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

/// Record the outcome of one directory operation.
#[inline]
pub fn record_directory_op<T>(op: &str, result: &Result<T, DirectoryError>) {
    if let Some(c) = DIRECTORY_OPS.get() {
        let code = match result {
            Ok(_) => "ok",
            Err(e) => e.error_code(),
        };
        c.with_label_values(&[op, code]).inc();
    }
}

/// Record the outcome of one account expiry check.
#[inline]
pub fn record_expiry_check(outcome: &str) {
    if let Some(c) = EXPIRY_CHECKS.get() {
        c.with_label_values(&[outcome]).inc();
    }
}

/// Record a failed account validity module call.
#[inline]
pub fn record_policy_module_failure(module: &str) {
    if let Some(c) = POLICY_MODULE_FAILURES.get() {
        c.with_label_values(&[module]).inc();
    }
}
