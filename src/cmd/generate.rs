//! Handler for `symphony dependencies import-paths generate`.

use anyhow::Result;
use std::path::Path;

use crate::cmd::{scan_options, StyleArg};
use symphony::cancel::{install_signal_handler, CancelToken};
use symphony::extract::EcmaScript;
use symphony::model::ModuleId;
use symphony::ui::colors;
use symphony::{generate, graph, scanner};

/// Print the sorted import block for one module. An unknown module or
/// an unresolved dependency is fatal (exit 1), never a partial block.
pub fn cmd_generate(
    module: &str,
    root: &Path,
    style: StyleArg,
    include: Vec<String>,
    exclude: Vec<String>,
) -> Result<()> {
    let cancel = CancelToken::default();
    install_signal_handler(&cancel);

    let options = scan_options(include, exclude, 1);
    let outcome = scanner::scan(root, &options, &EcmaScript, &cancel)?;
    let (dependency_graph, unresolved) = graph::build(outcome.modules, &outcome.records);

    for warning in &outcome.warnings {
        eprintln!("{} {}", colors::warning("⚠"), warning);
    }

    let target = ModuleId::new(module);
    let lines = generate::generate(
        &target,
        &dependency_graph,
        &outcome.records,
        &unresolved,
        style.into(),
    )?;

    for line in lines {
        println!("{}", line);
    }
    Ok(())
}
