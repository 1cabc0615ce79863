//! Prometheus text exposition (format 0.0.4)

use std::fmt::Write;

use super::process::ProcessMetrics;
use super::registry::MetricsRegistry;
use crate::models::RecordKind;

/// Content type of the rendered exposition.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

struct Family<'a> {
    out: &'a mut String,
    name: &'static str,
}

impl<'a> Family<'a> {
    fn new(out: &'a mut String, name: &'static str, kind: &str, help: &str) -> Self {
        let _ = writeln!(out, "# HELP {} {}", name, help);
        let _ = writeln!(out, "# TYPE {} {}", name, kind);
        Self { out, name }
    }

    fn sample(&mut self, labels: &[(&str, &str)], value: impl std::fmt::Display) -> &mut Self {
        if labels.is_empty() {
            let _ = writeln!(self.out, "{} {}", self.name, value);
        } else {
            let rendered: Vec<String> = labels
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, escape(v)))
                .collect();
            let _ = writeln!(self.out, "{}{{{}}} {}", self.name, rendered.join(","), value);
        }
        self
    }
}

fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Render service counters and process gauges.
pub fn render(registry: &MetricsRegistry, process: &ProcessMetrics) -> String {
    let mut out = String::new();

    if let Some(bytes) = process.resident_memory_bytes {
        Family::new(&mut out, "process_resident_memory_bytes", "gauge", "Resident memory size in bytes.")
            .sample(&[], bytes);
    }
    if let Some(bytes) = process.virtual_memory_bytes {
        Family::new(&mut out, "process_virtual_memory_bytes", "gauge", "Virtual memory size in bytes.")
            .sample(&[], bytes);
    }
    if let Some(cpu) = process.cpu_usage_percent {
        Family::new(&mut out, "process_cpu_usage_percent", "gauge", "Process CPU usage in percent.")
            .sample(&[], format!("{:.2}", cpu));
    }
    if let Some(start) = process.start_time_seconds {
        Family::new(
            &mut out,
            "process_start_time_seconds",
            "gauge",
            "Start time of the process since unix epoch in seconds.",
        )
        .sample(&[], start);
    }
    if let Some(threads) = process.thread_count {
        Family::new(&mut out, "process_threads", "gauge", "Number of OS threads in the process.")
            .sample(&[], threads);
    }
    Family::new(&mut out, "system_memory_total_bytes", "gauge", "Total host memory in bytes.")
        .sample(&[], process.system_total_memory_bytes);
    Family::new(&mut out, "system_memory_used_bytes", "gauge", "Used host memory in bytes.")
        .sample(&[], process.system_used_memory_bytes);
    Family::new(&mut out, "schoolctl_uptime_seconds", "gauge", "Seconds since the server started.")
        .sample(&[], format!("{:.3}", registry.uptime_seconds()));

    let mut created = Family::new(
        &mut out,
        "schoolctl_records_created_total",
        "counter",
        "Records inserted, by kind.",
    );
    for kind in RecordKind::ALL {
        created.sample(&[("kind", kind.as_str())], registry.records_created(kind));
    }

    let mut deleted = Family::new(
        &mut out,
        "schoolctl_records_deleted_total",
        "counter",
        "Rows removed by delete requests, by kind.",
    );
    for kind in RecordKind::ALL {
        deleted.sample(&[("kind", kind.as_str())], registry.records_deleted(kind));
    }

    let mut updates = Family::new(
        &mut out,
        "schoolctl_compaction_updates_total",
        "counter",
        "Id updates issued by compaction, including no-op moves.",
    );
    for kind in RecordKind::ALL {
        updates.sample(&[("kind", kind.as_str())], registry.compaction_updates(kind));
    }

    let mut moves = Family::new(
        &mut out,
        "schoolctl_compaction_moves_total",
        "counter",
        "Rows whose id changed during compaction.",
    );
    for kind in RecordKind::ALL {
        moves.sample(&[("kind", kind.as_str())], registry.compaction_moves(kind));
    }

    let mut errors = Family::new(
        &mut out,
        "schoolctl_store_errors_total",
        "counter",
        "Store failures, by error kind.",
    );
    for (label, count) in registry.store_errors() {
        errors.sample(&[("kind", label)], count);
    }

    let requests = registry.requests();
    let mut http = Family::new(
        &mut out,
        "schoolctl_http_requests_total",
        "counter",
        "HTTP requests handled, by method, route and status.",
    );
    for (key, count) in &requests {
        let status = key.status.to_string();
        http.sample(
            &[
                ("method", key.method.as_str()),
                ("route", key.route.as_str()),
                ("status", status.as_str()),
            ],
            count,
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_help_type_and_samples() {
        let registry = MetricsRegistry::new();
        registry.record_created(RecordKind::Student);
        registry.record_request("DELETE", "/api/student/{id}", 200);

        let text = render(&registry, &ProcessMetrics::default());

        assert!(text.contains("# TYPE schoolctl_records_created_total counter"));
        assert!(text.contains("schoolctl_records_created_total{kind=\"student\"} 1"));
        assert!(text.contains("schoolctl_records_created_total{kind=\"teacher\"} 0"));
        assert!(text.contains(
            "schoolctl_http_requests_total{method=\"DELETE\",route=\"/api/student/{id}\",status=\"200\"} 1"
        ));
        assert!(!text.contains("process_resident_memory_bytes"));
    }

    #[test]
    fn label_values_are_escaped() {
        assert_eq!(escape("a\"b\\c"), "a\\\"b\\\\c");
    }

    #[test]
    fn every_sample_line_is_well_formed() {
        let registry = MetricsRegistry::new();
        let text = render(&registry, &ProcessMetrics::default());

        for line in text.lines().filter(|l| !l.starts_with('#')) {
            let (_, value) = line.rsplit_once(' ').expect("sample has a value");
            assert!(value.parse::<f64>().is_ok(), "bad value in {line:?}");
        }
    }
}
