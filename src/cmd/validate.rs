//! Handler for `symphony dependencies import-paths validate`.

use anyhow::Result;
use std::path::Path;

use crate::cmd::{scan_options, OutputFormat};
use symphony::cancel::{install_signal_handler, CancelToken};
use symphony::extract::EcmaScript;
use symphony::ui::colors;
use symphony::{config, graph, report, rules, scanner};

/// Run the full pipeline and print violations. Exits 3 when any
/// error-severity violation exists; fatal errors (missing root, bad
/// rules file) bubble up as exit 1.
pub fn cmd_validate(
    root: &Path,
    rules_path: Option<&Path>,
    include: Vec<String>,
    exclude: Vec<String>,
    jobs: usize,
    format: OutputFormat,
) -> Result<()> {
    // Rule-file problems are fatal before any scanning starts.
    let rule_set = match rules_path {
        Some(path) => config::load_rules(path)?,
        None => config::default_rules(),
    };

    let cancel = CancelToken::default();
    install_signal_handler(&cancel);

    let options = scan_options(include, exclude, jobs);
    let outcome = scanner::scan(root, &options, &EcmaScript, &cancel)?;
    let (dependency_graph, unresolved) = graph::build(outcome.modules, &outcome.records);

    for warning in &outcome.warnings {
        eprintln!("{} {}", colors::warning("⚠"), warning);
    }

    let mut violations = rules::unresolved_violations(&unresolved);
    violations.extend(rules::validate(&dependency_graph, &rule_set));

    match format {
        OutputFormat::Text => println!("{}", report::render_validate_text(&violations)),
        OutputFormat::Json => println!("{}", report::render_validate_json(&violations)?),
    }

    if rules::has_errors(&violations) {
        std::process::exit(3);
    }
    Ok(())
}
