/// Monitoring builtins
/// ps, cpu and mem over the introspection provider

use super::{DispatchContext, Outcome};
use crate::error::{Result, TermError};
use crate::models::{ProcessSnapshot, SortKey};
use crate::services::introspection::IntrospectionProvider;

const DEFAULT_PROCESS_COUNT: usize = 10;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Up to `n` processes, highest `key` first. Equal values keep sampling order.
pub fn top_processes(
    provider: &dyn IntrospectionProvider,
    n: usize,
    key: SortKey,
) -> Vec<ProcessSnapshot> {
    let mut processes = provider.sample_processes();
    processes.sort_by(|a, b| key.value(b).total_cmp(&key.value(a)));
    processes.truncate(n);
    processes
}

pub fn ps(args: &[String], ctx: &mut DispatchContext<'_>) -> Result<Outcome> {
    let mut count = DEFAULT_PROCESS_COUNT;
    let mut key = SortKey::default();

    for arg in args {
        if let Some(value) = arg.strip_prefix("--sort=") {
            key = SortKey::parse(value).ok_or_else(|| {
                TermError::InvalidArgument(format!(
                    "Unknown sort key: {} (expected cpu or mem)",
                    value
                ))
            })?;
        } else if !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit()) {
            count = arg.parse().unwrap_or(DEFAULT_PROCESS_COUNT);
        }
    }

    let lines: Vec<String> = top_processes(ctx.introspection, count, key)
        .iter()
        .map(|p| {
            format!(
                "{}\t{}\tCPU:{:.1}\tMEM:{:.1}",
                p.pid,
                p.display_name(),
                p.cpu_percent,
                p.memory_percent
            )
        })
        .collect();

    Ok(Outcome::text(lines.join("\n")))
}

pub fn cpu(ctx: &DispatchContext<'_>) -> Outcome {
    let summary = ctx.introspection.sample_system();
    Outcome::text(format!("CPU Usage: {:.1}%", summary.cpu_percent))
}

pub fn mem(ctx: &DispatchContext<'_>) -> Outcome {
    let summary = ctx.introspection.sample_system();
    Outcome::text(format!(
        "Memory Usage: {:.1}% ({:.2}GiB used / {:.2}GiB total)",
        summary.memory_used_percent,
        summary.memory_used as f64 / GIB,
        summary.memory_total as f64 / GIB
    ))
}
