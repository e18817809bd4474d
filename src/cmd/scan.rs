//! Handler for `symphony dependencies import-paths scan`.

use anyhow::Result;
use std::path::Path;

use crate::cmd::{scan_options, OutputFormat};
use symphony::cancel::{install_signal_handler, CancelToken};
use symphony::extract::EcmaScript;
use symphony::ui::colors;
use symphony::{graph, report, scanner};

/// Scan the project tree and print the module report. Exits 2 when any
/// scan warnings were recorded; fatal errors bubble up as exit 1.
pub fn cmd_scan(
    root: &Path,
    include: Vec<String>,
    exclude: Vec<String>,
    jobs: usize,
    format: OutputFormat,
) -> Result<()> {
    let cancel = CancelToken::default();
    install_signal_handler(&cancel);

    let options = scan_options(include, exclude, jobs);
    let outcome = scanner::scan(root, &options, &EcmaScript, &cancel)?;
    let (_, unresolved) = graph::build(outcome.modules.clone(), &outcome.records);

    for warning in &outcome.warnings {
        eprintln!("{} {}", colors::warning("⚠"), warning);
    }

    match format {
        OutputFormat::Text => println!("{}", report::render_scan_text(&outcome, &unresolved)),
        OutputFormat::Json => println!("{}", report::render_scan_json(&outcome, &unresolved)?),
    }

    if outcome.has_warnings() {
        std::process::exit(2);
    }
    Ok(())
}
