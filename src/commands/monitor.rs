/// Monitor commands
/// System summary and top-process listing for the front-end sidebar

use crate::models::{ProcessSnapshot, SortKey, SystemSummary};
use crate::services::builtins;
use crate::services::IntrospectionProvider;

/// Current CPU, per-core, memory and swap figures
pub fn system_summary(provider: &dyn IntrospectionProvider) -> SystemSummary {
    provider.sample_system()
}

/// Top `n` processes sorted by `sort_by` ("cpu" or "mem")
pub fn top_processes(
    provider: &dyn IntrospectionProvider,
    n: usize,
    sort_by: &str,
) -> Result<Vec<ProcessSnapshot>, String> {
    let key = SortKey::parse(sort_by).ok_or_else(|| format!("Unknown sort key: {}", sort_by))?;
    Ok(builtins::top_processes(provider, n, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TwoProcesses;

    impl IntrospectionProvider for TwoProcesses {
        fn sample_system(&self) -> SystemSummary {
            SystemSummary {
                cpu_percent: 40.0,
                per_core_cpu_percent: vec![30.0, 50.0],
                ..SystemSummary::default()
            }
        }

        fn sample_processes(&self) -> Vec<ProcessSnapshot> {
            vec![
                ProcessSnapshot {
                    pid: 10,
                    name: Some("light".into()),
                    cpu_percent: 1.0,
                    memory_percent: 40.0,
                },
                ProcessSnapshot {
                    pid: 20,
                    name: Some("busy".into()),
                    cpu_percent: 90.0,
                    memory_percent: 2.0,
                },
            ]
        }
    }

    #[test]
    fn top_processes_honours_sort_key() {
        let by_cpu = top_processes(&TwoProcesses, 8, "cpu").unwrap();
        assert_eq!(by_cpu[0].pid, 20);
        let by_mem = top_processes(&TwoProcesses, 1, "mem").unwrap();
        assert_eq!(by_mem.len(), 1);
        assert_eq!(by_mem[0].pid, 10);
        assert!(top_processes(&TwoProcesses, 8, "io").is_err());
    }

    #[test]
    fn summary_passes_through() {
        let summary = system_summary(&TwoProcesses);
        assert_eq!(summary.per_core_cpu_percent.len(), 2);
        assert_eq!(summary.cpu_percent, 40.0);
    }
}
