//! Tracing utilities for relation resolution and statement observability.
//!
//! Enable the `tracing` feature to emit spans and events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level tracing event with the SQL text, parameter count and
/// the time spent executing it.
///
/// `$started` is an `Instant`; callers bind it under the same feature gate.
///
/// ```ignore
/// #[cfg(feature = "tracing")]
/// let started = Instant::now();
/// relata_trace_query!(&sql, params.len(), started);
/// ```
#[macro_export]
macro_rules! relata_trace_query {
    ($sql:expr, $param_count:expr, $started:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            sql = %$sql,
            params = $param_count,
            elapsed_us = u64::try_from($started.elapsed().as_micros()).unwrap_or(u64::MAX),
            "relata.query"
        );
    };
}

/// Emit a debug-level tracing event describing how a model pair was resolved.
///
/// ```ignore
/// relata_trace_resolve!("Pages", "Tags", "transitive");
/// ```
#[macro_export]
macro_rules! relata_trace_resolve {
    ($source:expr, $target:expr, $kind:literal) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(source = %$source, target = %$target, kind = $kind, "relata.resolve");
    };
}

/// Emit a trace-level event for model accessor lookups and materialized rows.
///
/// ```ignore
/// relata_trace_materialize!(rows.len(), groups);
/// ```
#[macro_export]
macro_rules! relata_trace_materialize {
    (convention $model:expr, $path:expr) => {
        #[cfg(feature = "tracing")]
        tracing::trace!(model = %$model, path = %$path, "relata.convention");
    };
    ($rows:expr, $groups:expr) => {
        #[cfg(feature = "tracing")]
        tracing::trace!(rows = $rows, groups = $groups, "relata.materialize");
    };
}
