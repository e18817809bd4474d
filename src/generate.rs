//! Import block generation for a single module.
//!
//! The generated block is a deterministic function of the graph:
//! external imports first, sorted by specifier, then internal imports
//! sorted by target module id. Internal specifiers are relative,
//! extension-free, and round-trip through the resolver back to the same
//! module id.

use crate::graph::UnresolvedImport;
use crate::model::{DependencyGraph, ImportRecord, ModuleId};
use std::collections::BTreeSet;
use std::fmt;

/// Syntax family for generated import lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStyle {
    EsModule,
    CommonJs,
}

/// Why an import block could not be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    UnknownModule {
        id: ModuleId,
    },
    UnresolvedDependency {
        module: ModuleId,
        raw: String,
        line: usize,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::UnknownModule { id } => {
                write!(f, "module '{}' is not part of the scanned project", id)
            }
            GenerationError::UnresolvedDependency { module, raw, line } => {
                write!(
                    f,
                    "cannot generate imports for '{}': unresolved import '{}' at line {}",
                    module, raw, line
                )
            }
        }
    }
}

impl std::error::Error for GenerationError {}

/// Generate the sorted import block for `target`.
///
/// `records` is the full scan record list; external dependencies are
/// read from it since they never become graph edges. Fails if `target`
/// is not a scanned module or if any of its imports did not resolve.
pub fn generate(
    target: &ModuleId,
    graph: &DependencyGraph,
    records: &[ImportRecord],
    unresolved: &[UnresolvedImport],
    style: ImportStyle,
) -> Result<Vec<String>, GenerationError> {
    if !graph.contains(target) {
        return Err(GenerationError::UnknownModule { id: target.clone() });
    }

    if let Some(failure) = unresolved.iter().find(|u| u.record.module == *target) {
        return Err(GenerationError::UnresolvedDependency {
            module: target.clone(),
            raw: failure.record.raw.clone(),
            line: failure.record.line,
        });
    }

    let externals: BTreeSet<&str> = records
        .iter()
        .filter(|r| r.module == *target && !r.is_internal())
        .map(|r| r.raw.as_str())
        .collect();

    let internals: BTreeSet<&ModuleId> = graph.edges_from(target).map(|e| &e.to).collect();

    let mut lines = Vec::with_capacity(externals.len() + internals.len());
    for specifier in externals {
        lines.push(render_external(specifier, style));
    }
    for dependency in internals {
        lines.push(render_internal(target, dependency, graph, style));
    }
    Ok(lines)
}

fn render_external(specifier: &str, style: ImportStyle) -> String {
    match style {
        ImportStyle::EsModule => format!("import '{}';", specifier),
        ImportStyle::CommonJs => {
            format!(
                "const {} = require('{}');",
                binding_name(final_segment(specifier)),
                specifier
            )
        }
    }
}

fn render_internal(
    target: &ModuleId,
    dependency: &ModuleId,
    graph: &DependencyGraph,
    style: ImportStyle,
) -> String {
    let specifier = relative_specifier(target, dependency, graph);
    match style {
        ImportStyle::CommonJs => format!(
            "const {} = require('{}');",
            binding_name(final_segment(dependency.as_str())),
            specifier
        ),
        ImportStyle::EsModule => {
            let exports = graph
                .module(dependency)
                .map(|m| m.exports.as_slice())
                .unwrap_or(&[]);
            let named: Vec<&str> = exports
                .iter()
                .map(|e| e.as_str())
                .filter(|e| *e != "default")
                .collect();
            let has_default = exports.iter().any(|e| e == "default");

            match (has_default, named.is_empty()) {
                (true, true) => format!(
                    "import {} from '{}';",
                    binding_name(final_segment(dependency.as_str())),
                    specifier
                ),
                (true, false) => format!(
                    "import {}, {{ {} }} from '{}';",
                    binding_name(final_segment(dependency.as_str())),
                    named.join(", "),
                    specifier
                ),
                (false, false) => format!("import {{ {} }} from '{}';", named.join(", "), specifier),
                (false, true) => format!("import '{}';", specifier),
            }
        }
    }
}

/// Relative specifier from `from` to `to`, extension-free. A trailing
/// `/index` collapses to its directory when the directory path is not
/// itself a module id. At least one path segment always remains after
/// the `./` or `../` prefix so the resolver's normalizer accepts the
/// result.
fn relative_specifier(from: &ModuleId, to: &ModuleId, graph: &DependencyGraph) -> String {
    let to_path = collapse_index(to, graph);
    let parent = from.parent();
    let from_dir: Vec<&str> = if parent.is_empty() {
        Vec::new()
    } else {
        parent.split('/').collect()
    };
    let to_segs: Vec<&str> = to_path.split('/').collect();

    let common = from_dir
        .iter()
        .zip(to_segs.iter())
        .take_while(|(a, b)| a == b)
        .count()
        .min(to_segs.len().saturating_sub(1));
    let ups = from_dir.len() - common;

    let mut parts: Vec<&str> = Vec::new();
    if ups == 0 {
        parts.push(".");
    } else {
        parts.extend(std::iter::repeat("..").take(ups));
    }
    parts.extend(&to_segs[common..]);
    parts.join("/")
}

fn collapse_index(to: &ModuleId, graph: &DependencyGraph) -> String {
    if let Some(dir) = to.as_str().strip_suffix("/index") {
        if !dir.is_empty() && !graph.contains(&ModuleId::new(dir)) {
            return dir.to_string();
        }
    }
    to.as_str().to_string()
}

fn final_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Turn a path segment into a plausible identifier: non-alphanumeric
/// characters become underscores and a leading digit gets a prefix.
fn binding_name(segment: &str) -> String {
    let mut name: String = segment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if name.is_empty() {
        name.push('_');
    }
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}
