use std::sync::{Mutex, PoisonError};

use sysinfo::{Pid, ProcessesToUpdate, System};

/// Snapshot of process and host metrics gathered from sysinfo.
#[derive(Debug, Clone, Default)]
pub struct ProcessMetrics {
    pub resident_memory_bytes: Option<u64>,
    pub virtual_memory_bytes: Option<u64>,
    pub cpu_usage_percent: Option<f32>,
    pub start_time_seconds: Option<u64>,
    pub thread_count: Option<usize>,
    pub system_total_memory_bytes: u64,
    pub system_used_memory_bytes: u64,
}

/// Samples the current process between scrapes.
///
/// CPU usage is the delta since the previous refresh, so one `System` is
/// kept for the life of the server.
pub struct ProcessSampler {
    system: Mutex<System>,
    pid: Option<Pid>,
}

impl ProcessSampler {
    pub fn new() -> Self {
        let pid = sysinfo::get_current_pid().ok();
        let mut system = System::new();
        if let Some(pid) = pid {
            system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        }

        Self {
            system: Mutex::new(system),
            pid,
        }
    }

    /// Refresh memory and this process only, then read the gauges.
    pub fn sample(&self) -> ProcessMetrics {
        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_memory();

        let mut metrics = ProcessMetrics {
            system_total_memory_bytes: system.total_memory(),
            system_used_memory_bytes: system.used_memory(),
            ..Default::default()
        };

        let Some(pid) = self.pid else {
            return metrics;
        };
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        if let Some(process) = system.process(pid) {
            metrics.resident_memory_bytes = Some(process.memory());
            metrics.virtual_memory_bytes = Some(process.virtual_memory());
            metrics.cpu_usage_percent = Some(process.cpu_usage());
            metrics.start_time_seconds = Some(process.start_time());
            #[cfg(unix)]
            {
                if let Ok(entries) = std::fs::read_dir("/proc/self/task") {
                    metrics.thread_count = Some(entries.count());
                }
            }
        }

        metrics
    }
}

impl Default for ProcessSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_samples_see_this_process() {
        let sampler = ProcessSampler::new();
        sampler.sample();
        let metrics = sampler.sample();

        assert!(metrics.system_total_memory_bytes > 0);
        assert!(metrics.resident_memory_bytes.unwrap_or(0) > 0);
        assert!(metrics.cpu_usage_percent.is_some());
    }
}
