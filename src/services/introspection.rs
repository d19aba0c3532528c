/// Introspection Service
/// CPU, memory and process table sampling backed by `sysinfo`

use crate::models::{ProcessSnapshot, SystemSummary};
use parking_lot::Mutex;
use sysinfo::System;

/// Source of system metrics. Implementations omit processes they cannot read.
pub trait IntrospectionProvider: Send + Sync {
    fn sample_system(&self) -> SystemSummary;
    fn sample_processes(&self) -> Vec<ProcessSnapshot>;
}

/// Provider reading the host OS through `sysinfo`
///
/// The `System` handle is kept between calls; CPU usage is computed from the
/// difference between two refreshes, so the first process sample may report 0%.
pub struct SysinfoProvider {
    system: Mutex<System>,
}

impl SysinfoProvider {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu();
        Self {
            system: Mutex::new(system),
        }
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IntrospectionProvider for SysinfoProvider {
    fn sample_system(&self) -> SystemSummary {
        let mut system = self.system.lock();

        system.refresh_cpu();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        system.refresh_cpu();
        system.refresh_memory();

        let memory_total = system.total_memory();
        let memory_used = system.used_memory();
        let swap_total = system.total_swap();

        SystemSummary {
            cpu_percent: f64::from(system.global_cpu_info().cpu_usage()),
            per_core_cpu_percent: system
                .cpus()
                .iter()
                .map(|cpu| f64::from(cpu.cpu_usage()))
                .collect(),
            memory_total,
            memory_available: system.available_memory(),
            memory_used,
            memory_used_percent: percent(memory_used, memory_total),
            swap_total,
            swap_used_percent: percent(system.used_swap(), swap_total),
        }
    }

    fn sample_processes(&self) -> Vec<ProcessSnapshot> {
        let mut system = self.system.lock();

        system.refresh_memory();
        system.refresh_processes();

        let memory_total = system.total_memory();
        system
            .processes()
            .iter()
            .map(|(pid, process)| {
                let name = process.name();
                ProcessSnapshot {
                    pid: pid.as_u32(),
                    name: (!name.is_empty()).then(|| name.to_string()),
                    cpu_percent: f64::from(process.cpu_usage()),
                    memory_percent: percent(process.memory(), memory_total),
                }
            })
            .collect()
    }
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
