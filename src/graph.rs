//! Dependency graph construction.
//!
//! Every internal import record is resolved through the path resolver;
//! failures are aggregated instead of aborting the build, and the caller
//! decides how strict to be with them (fatal for generation, advisory
//! for validation).

use crate::model::{DependencyGraph, ImportRecord, Module, ResolvedEdge};
use crate::resolver::{self, ModuleIndex, ResolutionError};
use std::fmt;

/// A resolution failure tied to the declaration that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedImport {
    pub record: ImportRecord,
    pub error: ResolutionError,
}

impl fmt::Display for UnresolvedImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.record.module, self.record.line, self.error
        )
    }
}

/// Resolve all internal records against the module set and assemble the
/// graph. External records never produce edges or failures.
pub fn build(
    modules: Vec<Module>,
    records: &[ImportRecord],
) -> (DependencyGraph, Vec<UnresolvedImport>) {
    let index = ModuleIndex::new(&modules);
    let mut edges = Vec::new();
    let mut failures = Vec::new();

    for record in records {
        if !record.is_internal() {
            continue;
        }
        match resolver::resolve(&record.raw, &record.module, &index) {
            Ok(target) => edges.push(ResolvedEdge {
                from: record.module.clone(),
                to: target,
                record: record.clone(),
            }),
            Err(error) => failures.push(UnresolvedImport {
                record: record.clone(),
                error,
            }),
        }
    }

    failures.sort_by(|a, b| {
        (&a.record.module, a.record.line, &a.record.raw)
            .cmp(&(&b.record.module, b.record.line, &b.record.raw))
    });

    (DependencyGraph::new(modules, edges), failures)
}
