//! # Symphony - Import Dependency Analysis
//!
//! Symphony scans JavaScript and TypeScript project trees, builds a
//! dependency graph from their import declarations, and checks that
//! graph against configurable rules.
//!
//! ## Overview
//!
//! The pipeline has three stages sharing one path resolver: the scanner
//! walks the tree and extracts raw import records, the graph builder
//! resolves internal records into edges, and the validator or generator
//! consumes the resulting graph. Every stage is deterministic: the same
//! tree produces the same modules, edges, and violations in the same
//! order, regardless of filesystem enumeration order or worker count.
//!
//! ## Core Concepts
//!
//! - **Module id**: project-relative, forward-slash, extension-free
//!   path identifying one source file
//! - **Import record**: one import declaration as written, classified
//!   internal or external
//! - **Dependency graph**: resolved module-to-module edges, sorted
//!
//! ## Modules
//!
//! - [`model`] - Module ids, import records, and the dependency graph
//! - [`extract`] - Regex-based import/export extraction from source text
//! - [`resolver`] - Raw specifier to module id resolution
//! - [`scanner`] - Project tree walking and per-file extraction
//! - [`graph`] - Graph construction from scanned records
//! - [`rules`] - Validation rules (cycles, layering) over the graph
//! - [`generate`] - Deterministic import block generation
//! - [`config`] - Rule-file loading
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use symphony::cancel::CancelToken;
//! use symphony::extract::EcmaScript;
//! use symphony::scanner::{scan, ScanOptions};
//! use symphony::{config, graph, rules};
//!
//! let cancel = CancelToken::default();
//! let outcome = scan(Path::new("."), &ScanOptions::default(), &EcmaScript, &cancel)
//!     .expect("scan failed");
//!
//! let (dependency_graph, unresolved) = graph::build(outcome.modules, &outcome.records);
//! let mut violations = rules::unresolved_violations(&unresolved);
//! violations.extend(rules::validate(&dependency_graph, &config::default_rules()));
//! ```

pub mod cancel;
pub mod config;
pub mod extract;
pub mod generate;
pub mod graph;
pub mod model;
pub mod report;
pub mod resolver;
pub mod rules;
pub mod scanner;
pub mod ui;
