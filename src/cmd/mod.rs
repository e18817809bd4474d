//! Command handlers for the symphony CLI.

pub mod generate;
pub mod scan;
pub mod validate;

use clap::ValueEnum;
use symphony::generate::ImportStyle;
use symphony::scanner::ScanOptions;

/// Report format selection for scan and validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Import syntax selection for generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    EsModule,
    CommonJs,
}

impl From<StyleArg> for ImportStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::EsModule => ImportStyle::EsModule,
            StyleArg::CommonJs => ImportStyle::CommonJs,
        }
    }
}

/// Build scan options from CLI flags. Explicit include/exclude lists
/// replace the built-in defaults rather than extending them.
pub fn scan_options(include: Vec<String>, exclude: Vec<String>, jobs: usize) -> ScanOptions {
    let defaults = ScanOptions::default();
    ScanOptions {
        include: if include.is_empty() {
            defaults.include
        } else {
            include
        },
        exclude: if exclude.is_empty() {
            defaults.exclude
        } else {
            exclude
        },
        jobs,
    }
}
