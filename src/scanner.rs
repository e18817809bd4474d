//! Project-tree scanning: file discovery, per-file import extraction,
//! and partial-failure warning collection.
//!
//! A scan never fails wholesale because one file is bad; unreadable or
//! undecodable files become [`ScanWarning`]s and the walk continues.
//! Re-scanning an unchanged tree yields the identical outcome, and the
//! parallel path re-sorts after collection so `jobs` never changes the
//! result.

use crate::cancel::CancelToken;
use crate::extract::ImportSyntax;
use crate::model::{ImportRecord, Module, ModuleId};
use anyhow::{bail, Context, Result};
use glob::Pattern;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

/// Include patterns used when the caller supplies none.
pub const DEFAULT_INCLUDE: &[&str] = &[
    "**/*.js",
    "**/*.jsx",
    "**/*.mjs",
    "**/*.cjs",
    "**/*.ts",
    "**/*.tsx",
];

/// Exclude patterns used when the caller supplies none. Dot-directories
/// cover `.git`, `.next`, and friends.
pub const DEFAULT_EXCLUDE: &[&str] = &[
    "node_modules/**",
    "**/node_modules/**",
    "dist/**",
    "build/**",
    ".*/**",
    "**/.*/**",
];

/// A recoverable per-file problem recorded during scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWarning {
    Unreadable { path: String, reason: String },
    Undecodable { path: String },
    DuplicateModule { id: ModuleId, kept: String, skipped: String },
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanWarning::Unreadable { path, reason } => {
                write!(f, "cannot read {}: {}", path, reason)
            }
            ScanWarning::Undecodable { path } => {
                write!(f, "{} is not valid UTF-8, skipped", path)
            }
            ScanWarning::DuplicateModule { id, kept, skipped } => {
                write!(
                    f,
                    "{} collides with {} (module id '{}'), skipped",
                    skipped, kept, id
                )
            }
        }
    }
}

/// Scan configuration. `jobs` above 1 enables the worker pool.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub jobs: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            include: DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect(),
            exclude: DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
            jobs: 1,
        }
    }
}

/// Everything a scan produced: modules sorted by id, records grouped by
/// module in source order, and the warnings collected along the way.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub modules: Vec<Module>,
    pub records: Vec<ImportRecord>,
    pub warnings: Vec<ScanWarning>,
}

impl ScanOutcome {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Result of scanning one file.
enum FileOutcome {
    Scanned {
        module: Module,
        records: Vec<ImportRecord>,
    },
    Warning(ScanWarning),
}

/// Walk `root`, extract imports from every matching file, and aggregate
/// the outcome. The cancellation token is checked between files; a
/// cancelled scan returns an error, never a partial outcome.
pub fn scan<E: ImportSyntax + Sync>(
    root: &Path,
    options: &ScanOptions,
    extractor: &E,
    cancel: &CancelToken,
) -> Result<ScanOutcome> {
    if !root.is_dir() {
        bail!("project root '{}' is not a directory", root.display());
    }
    let root = root
        .canonicalize()
        .with_context(|| format!("failed to resolve project root '{}'", root.display()))?;

    let mut warnings = Vec::new();
    let files = discover_files(&root, options, &mut warnings)?;

    let outcomes = if options.jobs > 1 && files.len() > 1 {
        scan_files_parallel(&files, extractor, cancel, options.jobs)?
    } else {
        scan_files_sequential(&files, extractor, cancel)?
    };

    let mut scanned: Vec<(Module, Vec<ImportRecord>)> = Vec::new();
    for outcome in outcomes {
        match outcome {
            FileOutcome::Scanned { module, records } => scanned.push((module, records)),
            FileOutcome::Warning(warning) => warnings.push(warning),
        }
    }

    // Aggregation re-sorts so parallel completion order cannot leak into
    // the outcome. On id collision the lexicographically first path wins.
    scanned.sort_by(|a, b| (&a.0.id, &a.0.path).cmp(&(&b.0.id, &b.0.path)));

    let mut modules: Vec<Module> = Vec::new();
    let mut records: Vec<ImportRecord> = Vec::new();
    for (module, file_records) in scanned {
        if let Some(kept) = modules.last() {
            if kept.id == module.id {
                warnings.push(ScanWarning::DuplicateModule {
                    id: module.id.clone(),
                    kept: kept.path.clone(),
                    skipped: module.path.clone(),
                });
                continue;
            }
        }
        modules.push(module);
        records.extend(file_records);
    }

    warnings.sort_by_key(|w| w.to_string());

    Ok(ScanOutcome {
        modules,
        records,
        warnings,
    })
}

/// Collect (relative path, absolute path) pairs matching the include
/// patterns minus the excludes, sorted and deduplicated. Directories the
/// walk cannot read become warnings, not errors.
fn discover_files(
    root: &Path,
    options: &ScanOptions,
    warnings: &mut Vec<ScanWarning>,
) -> Result<Vec<(String, PathBuf)>> {
    let excludes: Vec<Pattern> = options
        .exclude
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("invalid exclude pattern '{}'", p)))
        .collect::<Result<_>>()?;

    let mut files: Vec<(String, PathBuf)> = Vec::new();
    // The canonical root is matched literally, not as a pattern.
    let root_prefix = Pattern::escape(&root.display().to_string());
    for pattern in &options.include {
        let full = format!("{}/{}", root_prefix, pattern);
        let entries =
            glob::glob(&full).with_context(|| format!("invalid include pattern '{}'", pattern))?;
        for entry in entries {
            match entry {
                Ok(path) => {
                    if !path.is_file() {
                        continue;
                    }
                    let rel = match path.strip_prefix(root) {
                        Ok(rel) => rel,
                        Err(_) => continue,
                    };
                    let rel_str = rel
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .collect::<Vec<_>>()
                        .join("/");
                    if excludes.iter().any(|p| p.matches(&rel_str)) {
                        continue;
                    }
                    files.push((rel_str, path));
                }
                Err(e) => warnings.push(ScanWarning::Unreadable {
                    path: e.path().display().to_string(),
                    reason: e.error().to_string(),
                }),
            }
        }
    }

    files.sort();
    files.dedup_by(|a, b| a.0 == b.0);
    Ok(files)
}

fn scan_files_sequential<E: ImportSyntax>(
    files: &[(String, PathBuf)],
    extractor: &E,
    cancel: &CancelToken,
) -> Result<Vec<FileOutcome>> {
    let mut outcomes = Vec::with_capacity(files.len());
    for (rel, path) in files {
        if cancel.is_cancelled() {
            bail!("scan cancelled");
        }
        outcomes.push(scan_file(rel, path, extractor));
    }
    Ok(outcomes)
}

/// Worker-pool variant: the file list is split into one chunk per
/// worker, outcomes flow back over a channel, and the coordinating
/// thread collects them. Workers stop between files once the token is
/// cancelled.
fn scan_files_parallel<E: ImportSyntax + Sync>(
    files: &[(String, PathBuf)],
    extractor: &E,
    cancel: &CancelToken,
    jobs: usize,
) -> Result<Vec<FileOutcome>> {
    let chunk_size = files.len().div_ceil(jobs.max(1));
    let (tx, rx) = mpsc::channel::<FileOutcome>();

    let outcomes = thread::scope(|scope| -> Result<Vec<FileOutcome>> {
        let mut handles = Vec::new();
        for chunk in files.chunks(chunk_size) {
            let tx = tx.clone();
            handles.push(scope.spawn(move || {
                for (rel, path) in chunk {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let _ = tx.send(scan_file(rel, path, extractor));
                }
            }));
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(files.len());
        while let Ok(outcome) = rx.recv() {
            outcomes.push(outcome);
        }
        for handle in handles {
            if handle.join().is_err() {
                bail!("scan worker thread panicked");
            }
        }
        Ok(outcomes)
    })?;

    if cancel.is_cancelled() {
        bail!("scan cancelled");
    }
    Ok(outcomes)
}

fn scan_file<E: ImportSyntax>(rel: &str, path: &Path, extractor: &E) -> FileOutcome {
    let id = match ModuleId::from_relative_path(Path::new(rel)) {
        Some(id) => id,
        None => {
            return FileOutcome::Warning(ScanWarning::Unreadable {
                path: rel.to_string(),
                reason: "cannot derive a module id".to_string(),
            })
        }
    };

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            return FileOutcome::Warning(ScanWarning::Unreadable {
                path: rel.to_string(),
                reason: e.to_string(),
            })
        }
    };
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(_) => {
            return FileOutcome::Warning(ScanWarning::Undecodable {
                path: rel.to_string(),
            })
        }
    };

    let extraction = extractor.extract(&id, &content);
    FileOutcome::Scanned {
        module: Module {
            id,
            path: rel.to_string(),
            exports: extraction.exports,
        },
        records: extraction.records,
    }
}
