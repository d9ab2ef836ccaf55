use poolsweep_sweeper::{PreCheck, RegisteredSweeper, SweepReport};

/// One summary line per report, followed by the deleted pools.
pub fn render_report(report: &SweepReport) -> String {
    let mut out = report.summary();
    out.push('\n');
    for pool in &report.deleted {
        out.push_str(&format!("  - {}\n", pool));
    }
    out
}

/// Sweepers in run order with their dependencies.
pub fn render_sweepers(sweepers: &[&RegisteredSweeper]) -> String {
    if sweepers.is_empty() {
        return "No sweepers registered.\n".to_string();
    }
    let mut out = String::new();
    for s in sweepers {
        if s.dependencies.is_empty() {
            out.push_str(&format!("{}\n", s.name));
        } else {
            let deps: Vec<&str> = s.dependencies.iter().map(|d| d.as_str()).collect();
            out.push_str(&format!("{} (after {})\n", s.name, deps.join(", ")));
        }
    }
    out
}

pub fn render_precheck(region: &str, result: &PreCheck) -> String {
    match result {
        PreCheck::Ready => format!("{}: ready", region),
        PreCheck::Skip(reason) => format!("{}: skip ({})", region, reason),
    }
}
