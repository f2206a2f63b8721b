//! Process-level runtime stats appended to the scrape body.
//!
//! Resident/virtual memory and cumulative CPU time for the exporter's own
//! pid, refreshed on each scrape rather than on the tick path.

use std::fmt::Write;
use std::sync::Mutex;

use sysinfo::{get_current_pid, Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::warn;

pub struct ProcStats {
    pid: Pid,
    system: Mutex<System>,
}

impl ProcStats {
    /// Returns `None` when the current pid cannot be resolved (logged once).
    pub fn new() -> Option<Self> {
        match get_current_pid() {
            Ok(pid) => Some(Self {
                pid,
                system: Mutex::new(System::new()),
            }),
            Err(e) => {
                warn!(error = %e, "process stats unavailable");
                None
            }
        }
    }

    /// Append `process_*` lines in Prometheus text exposition format.
    pub fn render(&self, out: &mut String) {
        let Ok(mut system) = self.system.lock() else {
            return;
        };
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );
        let Some(proc_) = system.process(self.pid) else {
            return;
        };

        let _ = writeln!(out, "# TYPE process_resident_memory_bytes gauge");
        let _ = writeln!(out, "process_resident_memory_bytes {}", proc_.memory());
        let _ = writeln!(out, "# TYPE process_virtual_memory_bytes gauge");
        let _ = writeln!(out, "process_virtual_memory_bytes {}", proc_.virtual_memory());
        let _ = writeln!(out, "# TYPE process_cpu_seconds_total counter");
        let _ = writeln!(
            out,
            "process_cpu_seconds_total {:.3}",
            proc_.accumulated_cpu_time() as f64 / 1000.0
        );
    }
}
