//! Observability setup for Parlor: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
