//! Import-syntax extraction from source files.
//!
//! The scanner is polymorphic over [`ImportSyntax`] so projects in other
//! languages can plug in their own extractor. The built-in [`EcmaScript`]
//! extractor covers ES-module and CommonJS forms with line-oriented
//! regexes; re-exports (`export ... from`) count as imports and
//! contribute no export names.

use crate::model::{ImportKind, ImportRecord, ModuleId};
use regex::Regex;
use std::sync::LazyLock;

/// Everything pulled out of one file: its import declarations and the
/// names it exports.
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<ImportRecord>,
    /// Sorted, deduplicated export names; `default` for default exports.
    pub exports: Vec<String>,
}

/// Language-specific import extraction. Implementations must be pure:
/// same content in, same extraction out.
pub trait ImportSyntax {
    fn extract(&self, module: &ModuleId, content: &str) -> Extraction;
}

/// Classify a specifier: `./`, `../`, and `/` prefixes address project
/// modules, everything else (packages, `@scope/pkg`, `node:` builtins)
/// is external.
pub fn classify(raw: &str) -> ImportKind {
    if raw.starts_with("./") || raw.starts_with("../") || raw.starts_with('/') {
        ImportKind::Internal
    } else {
        ImportKind::External
    }
}

static ES_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"import\s+(?:[^'"]+\s+from\s+)?['"]([^'"]+)['"]"#).unwrap());

static ES_EXPORT_FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"export\s+(?:\*|\{[^}]*\})\s+from\s+['"]([^'"]+)['"]"#).unwrap());

static CJS_REQUIRE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

static ES_EXPORT_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+(?:async\s+)?(?:const|let|var|function\*?|class)\s+([A-Za-z_$][A-Za-z0-9_$]*)")
        .unwrap()
});

static ES_EXPORT_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"export\s+\{([^}]*)\}(\s+from\b)?").unwrap());

static ES_EXPORT_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"export\s+default\b").unwrap());

/// ES-module / CommonJS extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcmaScript;

impl ImportSyntax for EcmaScript {
    fn extract(&self, module: &ModuleId, content: &str) -> Extraction {
        let mut records = Vec::new();
        let mut exports = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;

            for caps in ES_IMPORT.captures_iter(line) {
                push_record(&mut records, module, &caps[1], line_no);
            }
            for caps in ES_EXPORT_FROM.captures_iter(line) {
                push_record(&mut records, module, &caps[1], line_no);
            }
            for caps in CJS_REQUIRE.captures_iter(line) {
                push_record(&mut records, module, &caps[1], line_no);
            }

            for caps in ES_EXPORT_DECL.captures_iter(line) {
                exports.push(caps[1].to_string());
            }
            for caps in ES_EXPORT_LIST.captures_iter(line) {
                // A trailing `from` marks a re-export; those names belong
                // to the source module.
                if caps.get(2).is_none() {
                    collect_export_list(&caps[1], &mut exports);
                }
            }
            if ES_EXPORT_DEFAULT.is_match(line) {
                exports.push("default".to_string());
            }
        }

        exports.sort();
        exports.dedup();

        Extraction { records, exports }
    }
}

fn push_record(records: &mut Vec<ImportRecord>, module: &ModuleId, raw: &str, line: usize) {
    records.push(ImportRecord {
        module: module.clone(),
        raw: raw.to_string(),
        line,
        kind: classify(raw),
    });
}

/// Names from an `export { a, b as c }` list; renames export the alias.
fn collect_export_list(list: &str, exports: &mut Vec<String>) {
    for item in list.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let name = match item.rsplit_once(" as ") {
            Some((_, alias)) => alias.trim(),
            None => item,
        };
        exports.push(name.to_string());
    }
}
