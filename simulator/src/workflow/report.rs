use anyhow::Context;
use fiscore::tracks::ThreatReport;
use std::fs;
use std::path::Path;

/// Renders the report in the legacy results format: one indexed score per
/// line plus the trailing batch average.
pub fn render_report(report: &ThreatReport) -> String {
    let mut out = String::from("Threat result: \n");
    for score in &report.scores {
        out.push_str(&format!("{}. {:.6}\n", score.record_index, score.score));
    }
    out.push_str(&format!("average: {:.6}\n", report.average));
    out
}

pub fn write_report<P: AsRef<Path>>(path: P, report: &ThreatReport) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    if let Some(parent) = path_ref.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
    }
    fs::write(path_ref, render_report(report))
        .with_context(|| format!("writing threat report {}", path_ref.display()))
}
