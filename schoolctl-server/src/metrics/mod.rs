//! Metrics for the `/metrics` endpoint
//!
//! Service counters live in `MetricsRegistry`; process gauges are sampled
//! from sysinfo at scrape time. Both render as Prometheus text.

pub mod registry;
pub mod process;
pub mod exposition;

pub use registry::{MetricsRegistry, RequestKey};
pub use process::{ProcessMetrics, ProcessSampler};
pub use exposition::{render, CONTENT_TYPE};
