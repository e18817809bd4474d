//! Rendering of scan and validation results.
//!
//! Text reports are built section by section in the same shape for both
//! commands: a heading, an aligned count block, then item sections that
//! only appear when non-empty. JSON reports are a single document per
//! invocation.

use crate::graph::UnresolvedImport;
use crate::rules::{Severity, Violation};
use crate::scanner::ScanOutcome;
use crate::ui::{colors, format, severity_icon};
use anyhow::Result;
use serde_json::json;
use std::collections::BTreeSet;

/// Distinct external package specifiers seen during the scan.
pub fn external_specifiers(outcome: &ScanOutcome) -> Vec<String> {
    let set: BTreeSet<&str> = outcome
        .records
        .iter()
        .filter(|r| !r.is_internal())
        .map(|r| r.raw.as_str())
        .collect();
    set.into_iter().map(|s| s.to_string()).collect()
}

/// Format a scan outcome as multi-section text output. Warnings are
/// counted here but printed to stderr by the caller.
pub fn render_scan_text(outcome: &ScanOutcome, unresolved: &[UnresolvedImport]) -> String {
    let externals = external_specifiers(outcome);
    let mut output = vec![
        colors::heading("Import Scan").to_string(),
        "===========".to_string(),
        String::new(),
        format::count_line("Modules", outcome.modules.len()),
        format::count_line("Imports", outcome.records.len()),
        format::count_line("External", externals.len()),
        format::count_line("Unresolved", unresolved.len()),
        format::count_line("Warnings", outcome.warnings.len()),
        String::new(),
    ];

    let heading = format!("Modules ({})", outcome.modules.len());
    output.push(colors::heading(&heading).to_string());
    output.push(format::separator(heading.chars().count()));
    if outcome.modules.is_empty() {
        output.push(colors::secondary("  (no modules found)").to_string());
    } else {
        for module in &outcome.modules {
            output.push(format!(
                "  {}  {}",
                colors::identifier(module.id.as_str()),
                colors::secondary(&module.path)
            ));
        }
    }

    if !externals.is_empty() {
        output.push(String::new());
        let heading = format!("External Packages ({})", externals.len());
        output.push(colors::heading(&heading).to_string());
        output.push(format::separator(heading.chars().count()));
        for specifier in &externals {
            output.push(format!("  {}", specifier));
        }
    }

    if !unresolved.is_empty() {
        output.push(String::new());
        let heading = format!("Unresolved Imports ({})", unresolved.len());
        output.push(colors::heading(&heading).to_string());
        output.push(format::separator(heading.chars().count()));
        for failure in unresolved {
            output.push(format!("  {} {}", colors::error("✗"), failure));
        }
    }

    output.join("\n")
}

pub fn render_scan_json(outcome: &ScanOutcome, unresolved: &[UnresolvedImport]) -> Result<String> {
    let unresolved: Vec<serde_json::Value> = unresolved
        .iter()
        .map(|u| {
            json!({
                "module": u.record.module,
                "line": u.record.line,
                "import": u.record.raw,
                "error": u.error.to_string(),
            })
        })
        .collect();
    let warnings: Vec<String> = outcome.warnings.iter().map(|w| w.to_string()).collect();

    let doc = json!({
        "modules": outcome.modules,
        "externals": external_specifiers(outcome),
        "unresolved": unresolved,
        "warnings": warnings,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Format violations as text, one line per violation plus a closing
/// count summary.
pub fn render_validate_text(violations: &[Violation]) -> String {
    let mut output = vec![
        colors::heading("Import Validation").to_string(),
        "=================".to_string(),
        String::new(),
    ];

    if violations.is_empty() {
        output.push(format!("{} no violations found", colors::success("✓")));
        return output.join("\n");
    }

    for violation in violations {
        output.push(format!(
            "  {} {} [{}]: {}",
            severity_icon(violation.severity),
            colors::identifier(violation.module.as_str()),
            violation.rule,
            violation.message
        ));
    }

    let (errors, warnings) = severity_counts(violations);
    output.push(String::new());
    output.push(format!(
        "{}, {}",
        count_label(errors, "error"),
        count_label(warnings, "warning")
    ));
    output.join("\n")
}

pub fn render_validate_json(violations: &[Violation]) -> Result<String> {
    let (errors, warnings) = severity_counts(violations);
    let doc = json!({
        "violations": violations,
        "counts": {
            "errors": errors,
            "warnings": warnings,
        },
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

fn severity_counts(violations: &[Violation]) -> (usize, usize) {
    let errors = violations
        .iter()
        .filter(|v| v.severity == Severity::Error)
        .count();
    (errors, violations.len() - errors)
}

fn count_label(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
