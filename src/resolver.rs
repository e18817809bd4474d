//! Path resolution: raw import specifiers to canonical module ids.
//!
//! Resolution is a pure lookup against the scanned module set. It never
//! touches the filesystem, so the same specifier from the same module
//! always resolves the same way.
//!
//! Matching policy, in order:
//! 1. The normalized path matches a module id exactly.
//! 2. Otherwise, candidates are collected under ASCII case-insensitive
//!    comparison plus the directory form (`p` matching `p/index`).
//!    Exactly one candidate resolves; several are an explicit
//!    [`ResolutionError::Ambiguous`], never a silent pick; none is
//!    [`ResolutionError::NotFound`].

use crate::model::{strip_source_extension, Module, ModuleId};
use std::collections::BTreeMap;
use std::fmt;

/// Why a specifier could not be resolved to a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    NotFound { raw: String, normalized: String },
    Ambiguous { raw: String, candidates: Vec<ModuleId> },
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::NotFound { raw, normalized } => {
                write!(
                    f,
                    "import '{}' does not match any project module (looked for '{}')",
                    raw, normalized
                )
            }
            ResolutionError::Ambiguous { raw, candidates } => {
                let names: Vec<&str> = candidates.iter().map(|c| c.as_str()).collect();
                write!(
                    f,
                    "import '{}' matches more than one module: {}",
                    raw,
                    names.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for ResolutionError {}

/// Lookup structure over the scanned module set, built once per run.
#[derive(Debug, Default)]
pub struct ModuleIndex {
    ids: Vec<ModuleId>,
    by_lower: BTreeMap<String, Vec<ModuleId>>,
}

impl ModuleIndex {
    pub fn new(modules: &[Module]) -> Self {
        let mut ids: Vec<ModuleId> = modules.iter().map(|m| m.id.clone()).collect();
        ids.sort();
        ids.dedup();

        let mut by_lower: BTreeMap<String, Vec<ModuleId>> = BTreeMap::new();
        for id in &ids {
            by_lower
                .entry(id.as_str().to_ascii_lowercase())
                .or_default()
                .push(id.clone());
        }

        ModuleIndex { ids, by_lower }
    }

    fn contains(&self, id: &str) -> bool {
        self.ids.binary_search_by(|m| m.as_str().cmp(id)).is_ok()
    }

    fn lower_matches(&self, id: &str) -> &[ModuleId] {
        self.by_lower
            .get(&id.to_ascii_lowercase())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

/// Resolve a raw import specifier written in `from` to a module id.
///
/// Handles relative (`./`, `../`) and absolute-within-project (`/`)
/// forms. Bare specifiers name external packages and are `NotFound`
/// here; callers classify them out before resolving. Paths escaping the
/// project root are `NotFound`.
pub fn resolve(
    raw: &str,
    from: &ModuleId,
    index: &ModuleIndex,
) -> Result<ModuleId, ResolutionError> {
    let normalized = match normalize(raw, from) {
        Some(n) => n,
        None => {
            return Err(ResolutionError::NotFound {
                raw: raw.to_string(),
                normalized: raw.to_string(),
            })
        }
    };

    if index.contains(&normalized) {
        return Ok(ModuleId::new(normalized));
    }

    let mut candidates: Vec<ModuleId> = index.lower_matches(&normalized).to_vec();
    candidates.extend_from_slice(index.lower_matches(&format!("{}/index", normalized)));
    candidates.sort();
    candidates.dedup();

    match candidates.len() {
        0 => Err(ResolutionError::NotFound {
            raw: raw.to_string(),
            normalized,
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(ResolutionError::Ambiguous {
            raw: raw.to_string(),
            candidates,
        }),
    }
}

/// Fold a specifier against the importing module's directory into a
/// canonical project-relative path. `None` when the path escapes the
/// project root or is a bare specifier.
fn normalize(raw: &str, from: &ModuleId) -> Option<String> {
    let (base, rest) = if let Some(stripped) = raw.strip_prefix('/') {
        ("", stripped)
    } else if raw.starts_with("./") || raw.starts_with("../") {
        (from.parent(), raw)
    } else {
        return None;
    };

    let mut segments: Vec<&str> = if base.is_empty() {
        Vec::new()
    } else {
        base.split('/').collect()
    };

    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return None;
                }
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return None;
    }

    Some(strip_source_extension(&segments.join("/")).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_index(ids: &[&str]) -> ModuleIndex {
        let modules: Vec<Module> = ids
            .iter()
            .map(|id| Module {
                id: ModuleId::new(*id),
                path: format!("{}.js", id),
                exports: Vec::new(),
            })
            .collect();
        ModuleIndex::new(&modules)
    }

    #[test]
    fn test_resolves_sibling() {
        let index = make_index(&["src/app", "src/util"]);
        let from = ModuleId::new("src/app");
        let id = resolve("./util", &from, &index).unwrap();
        assert_eq!(id.as_str(), "src/util");
    }

    #[test]
    fn test_resolves_parent_traversal() {
        let index = make_index(&["src/components/button", "src/util"]);
        let from = ModuleId::new("src/components/button");
        let id = resolve("../util", &from, &index).unwrap();
        assert_eq!(id.as_str(), "src/util");
    }

    #[test]
    fn test_resolves_absolute_within_project() {
        let index = make_index(&["src/app", "src/util"]);
        let from = ModuleId::new("src/app");
        let id = resolve("/src/util", &from, &index).unwrap();
        assert_eq!(id.as_str(), "src/util");
    }

    #[test]
    fn test_strips_extension_once() {
        let index = make_index(&["src/app", "src/util"]);
        let from = ModuleId::new("src/app");
        let id = resolve("./util.js", &from, &index).unwrap();
        assert_eq!(id.as_str(), "src/util");
    }

    #[test]
    fn test_folds_dot_segments() {
        let index = make_index(&["src/app", "src/a/b"]);
        let from = ModuleId::new("src/app");
        let id = resolve("././a/./b", &from, &index).unwrap();
        assert_eq!(id.as_str(), "src/a/b");
    }

    #[test]
    fn test_resolves_directory_to_index() {
        let index = make_index(&["app", "components/index"]);
        let from = ModuleId::new("app");
        let id = resolve("./components", &from, &index).unwrap();
        assert_eq!(id.as_str(), "components/index");
    }

    #[test]
    fn test_case_insensitive_single_match() {
        let index = make_index(&["src/app", "src/Util"]);
        let from = ModuleId::new("src/app");
        let id = resolve("./util", &from, &index).unwrap();
        assert_eq!(id.as_str(), "src/Util");
    }

    #[test]
    fn test_exact_match_beats_case_variants() {
        let index = make_index(&["src/app", "src/util", "src/Util"]);
        let from = ModuleId::new("src/app");
        let id = resolve("./util", &from, &index).unwrap();
        assert_eq!(id.as_str(), "src/util");
    }

    #[test]
    fn test_ambiguous_case_variants() {
        let index = make_index(&["src/app", "src/UTIL", "src/Util"]);
        let from = ModuleId::new("src/app");
        let err = resolve("./util", &from, &index).unwrap_err();
        match &err {
            ResolutionError::Ambiguous { candidates, .. } => {
                let names: Vec<&str> = candidates.iter().map(|c| c.as_str()).collect();
                assert_eq!(names, vec!["src/UTIL", "src/Util"]);
            }
            other => panic!("expected Ambiguous, got {:?}", other),
        }
        assert!(err.to_string().contains("matches more than one module"));
    }

    #[test]
    fn test_ambiguous_file_versus_index() {
        let index = make_index(&["app", "Pages", "pages/index"]);
        let from = ModuleId::new("app");
        let err = resolve("./pages", &from, &index).unwrap_err();
        assert!(matches!(err, ResolutionError::Ambiguous { .. }));
    }

    #[test]
    fn test_not_found() {
        let index = make_index(&["src/app"]);
        let from = ModuleId::new("src/app");
        let err = resolve("./missing", &from, &index).unwrap_err();
        assert!(err.to_string().contains("does not match any project module"));
        assert!(err.to_string().contains("src/missing"));
    }

    #[test]
    fn test_escape_above_root_is_not_found() {
        let index = make_index(&["app", "util"]);
        let from = ModuleId::new("app");
        let err = resolve("../util", &from, &index).unwrap_err();
        assert!(matches!(err, ResolutionError::NotFound { .. }));
    }

    #[test]
    fn test_bare_specifier_is_not_found() {
        let index = make_index(&["lodash"]);
        let from = ModuleId::new("app");
        let err = resolve("lodash", &from, &index).unwrap_err();
        assert!(matches!(err, ResolutionError::NotFound { .. }));
    }

    #[test]
    fn test_deterministic() {
        let index = make_index(&["src/app", "src/util"]);
        let from = ModuleId::new("src/app");
        let first = resolve("./util", &from, &index);
        let second = resolve("./util", &from, &index);
        assert_eq!(first, second);
    }
}
