use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use hostdiff_core::diff::{diff_snapshots, DiffReport, ServiceRef};
use hostdiff_core::model::{Scalar, Snapshot};
use serde::Serialize;

use crate::commands::open_store;

/// How a diff is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Render a diff in the requested format. `payload` is what the structured
/// formats serialize; text output is built from `report` alone.
pub fn render_output<T: Serialize>(
    format: OutputFormat,
    title: &str,
    report: &DiffReport,
    payload: &T,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_report_text(title, report)),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(payload)?)),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(payload)?),
    }
}

fn show(value: &Option<Scalar>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "(none)".to_string(),
    }
}

fn push_section(out: &mut String, label: &str, marker: char, services: &[ServiceRef]) {
    out.push_str(&format!("{label} ({}):\n", services.len()));
    if services.is_empty() {
        out.push_str("  (none)\n");
    }
    for svc in services {
        out.push_str(&format!("  {marker} {}/{}\n", svc.port, svc.protocol));
    }
}

/// Human-readable rendering of a diff report.
pub fn render_report_text(title: &str, report: &DiffReport) -> String {
    let mut out = format!("{title}\n");

    push_section(&mut out, "Added", '+', &report.services_added);
    push_section(&mut out, "Removed", '-', &report.services_removed);

    out.push_str(&format!("Modified ({}):\n", report.services_modified.len()));
    if report.services_modified.is_empty() {
        out.push_str("  (none)\n");
    }
    for svc in &report.services_modified {
        out.push_str(&format!("  ~ {}/{}\n", svc.port, svc.protocol));
        for (path, change) in svc.changes.fields() {
            out.push_str(&format!(
                "      {path}: {} -> {}\n",
                show(&change.from),
                show(&change.to)
            ));
        }
        let added = svc.changes.vulnerabilities_added();
        if !added.is_empty() {
            out.push_str(&format!("      vulnerabilities added: {}\n", added.join(", ")));
        }
        let removed = svc.changes.vulnerabilities_removed();
        if !removed.is_empty() {
            out.push_str(&format!("      vulnerabilities removed: {}\n", removed.join(", ")));
        }
    }

    out
}

/// Diff two stored snapshots of one host.
pub fn diff_command(
    root: &str,
    ip: &str,
    from: &str,
    to: &str,
    format: OutputFormat,
) -> Result<()> {
    let store = open_store(root)?;
    tracing::debug!(%ip, %from, %to, "diffing stored snapshots");
    let result = store.diff(ip, from, to)?;

    let title = format!("Diff for {ip}: {from} -> {to}");
    print!("{}", render_output(format, &title, &result.diff, &result)?);
    Ok(())
}

fn read_snapshot_file(path: &Path) -> Result<Snapshot> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file {}", path.display()))?;
    Snapshot::from_json_str(&body)
        .with_context(|| format!("Failed to parse snapshot JSON in {}", path.display()))
}

/// Diff two snapshot documents on disk, without a store.
pub fn diff_files_command(old: &str, new: &str, format: OutputFormat) -> Result<()> {
    let old_snapshot = read_snapshot_file(Path::new(old))?;
    let new_snapshot = read_snapshot_file(Path::new(new))?;
    let report = diff_snapshots(&old_snapshot, &new_snapshot);

    let title = format!("Diff: {old} -> {new}");
    print!("{}", render_output(format, &title, &report, &report)?);
    Ok(())
}
