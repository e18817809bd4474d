//! Core data model: modules, import records, resolved edges, and the
//! dependency graph they form.

use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use std::path::Path;

/// Source extensions recognized when deriving module identifiers.
/// Stripped at most once; `foo.test.js` becomes `foo.test`.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx"];

/// Canonical identifier for a module: the project-relative path with
/// forward-slash separators and one known source extension stripped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        ModuleId(id.into())
    }

    /// Derive a module id from a project-relative file path.
    ///
    /// Components are joined with `/` regardless of platform separator.
    /// Returns `None` for paths with no usable components (e.g. empty).
    pub fn from_relative_path(path: &Path) -> Option<Self> {
        let joined = path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        if joined.is_empty() {
            return None;
        }
        Some(ModuleId(strip_source_extension(&joined).to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The directory portion of the id, empty for top-level modules.
    pub fn parent(&self) -> &str {
        match self.0.rfind('/') {
            Some(pos) => &self.0[..pos],
            None => "",
        }
    }

    /// The final path segment of the id.
    pub fn file_stem(&self) -> &str {
        match self.0.rfind('/') {
            Some(pos) => &self.0[pos + 1..],
            None => &self.0,
        }
    }
}

impl Display for ModuleId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strip one trailing source extension, if present.
pub fn strip_source_extension(path: &str) -> &str {
    if let Some(dot) = path.rfind('.') {
        let ext = &path[dot + 1..];
        if SOURCE_EXTENSIONS.contains(&ext) {
            return &path[..dot];
        }
    }
    path
}

/// A unit of source code discovered during a scan. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub id: ModuleId,
    /// Project-relative path on disk, forward-slash separated, extension kept.
    pub path: String,
    /// Names the module exports, empty when the extractor found none.
    pub exports: Vec<String>,
}

/// Whether an import names a project module or a third-party package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    /// Relative (`./`, `../`) or absolute-within-project (`/`) specifier.
    Internal,
    /// Bare specifier: npm package, scoped package, or runtime builtin.
    External,
}

/// One import declaration as written in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRecord {
    /// Id of the module the declaration appears in.
    pub module: ModuleId,
    /// The specifier text exactly as written.
    pub raw: String,
    /// 1-based source line.
    pub line: usize,
    pub kind: ImportKind,
}

impl ImportRecord {
    pub fn is_internal(&self) -> bool {
        self.kind == ImportKind::Internal
    }
}

/// A directed dependency: `from` imports `to`. Carries the originating
/// record so diagnostics can point at the declaration site.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedEdge {
    pub from: ModuleId,
    pub to: ModuleId,
    pub record: ImportRecord,
}

/// The module set plus every resolved edge between members of that set.
///
/// Invariants: module ids are unique and sorted; edges are sorted by
/// (from, to, line) and only reference modules present in the set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    modules: Vec<Module>,
    edges: Vec<ResolvedEdge>,
}

impl DependencyGraph {
    pub fn new(mut modules: Vec<Module>, mut edges: Vec<ResolvedEdge>) -> Self {
        modules.sort_by(|a, b| a.id.cmp(&b.id));
        modules.dedup_by(|a, b| a.id == b.id);
        edges.sort_by(|a, b| {
            (&a.from, &a.to, a.record.line).cmp(&(&b.from, &b.to, b.record.line))
        });
        DependencyGraph { modules, edges }
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn edges(&self) -> &[ResolvedEdge] {
        &self.edges
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.module(id).is_some()
    }

    pub fn module(&self, id: &ModuleId) -> Option<&Module> {
        self.modules
            .binary_search_by(|m| m.id.cmp(id))
            .ok()
            .map(|idx| &self.modules[idx])
    }

    /// Outgoing edges of one module, in stored (sorted) order. The
    /// returned iterator borrows the graph, never `id`.
    pub fn edges_from<'a>(&'a self, id: &ModuleId) -> impl Iterator<Item = &'a ResolvedEdge> + 'a {
        let id = id.clone();
        self.edges.iter().filter(move |e| e.from == id)
    }
}
