//! CLI entry point and command dispatch for symphony.

mod cmd;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;

use cmd::{OutputFormat, StyleArg};
use symphony::ui;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "symphony")]
#[command(version)]
#[command(about = "Import dependency analysis for JavaScript and TypeScript projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dependency analysis commands
    Dependencies {
        #[command(subcommand)]
        command: DependencyCommands,
    },
    /// Generate shell completion script
    Completion {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Show version, git commit, and build date
    Version,
}

#[derive(Subcommand)]
enum DependencyCommands {
    /// Import-path scanning, validation, and generation
    ImportPaths {
        #[command(subcommand)]
        command: ImportPathCommands,
    },
}

#[derive(Subcommand)]
enum ImportPathCommands {
    /// Scan the project tree and report its module graph
    Scan {
        /// Project root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Include glob, relative to the root (replaces the default set;
        /// can be specified multiple times)
        #[arg(long, value_name = "GLOB")]
        include: Vec<String>,
        /// Exclude glob (replaces the default set; can be specified
        /// multiple times)
        #[arg(long, value_name = "GLOB")]
        exclude: Vec<String>,
        /// Number of scan worker threads
        #[arg(long, default_value_t = 1)]
        jobs: usize,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Check the dependency graph against the configured rules
    Validate {
        /// Project root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Rules file (YAML); defaults to the built-in no-cycles rule
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,
        /// Include glob, relative to the root (replaces the default set;
        /// can be specified multiple times)
        #[arg(long, value_name = "GLOB")]
        include: Vec<String>,
        /// Exclude glob (replaces the default set; can be specified
        /// multiple times)
        #[arg(long, value_name = "GLOB")]
        exclude: Vec<String>,
        /// Number of scan worker threads
        #[arg(long, default_value_t = 1)]
        jobs: usize,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the sorted import block for one module
    Generate {
        /// Module id to generate imports for
        #[arg(long, value_name = "MODULE")]
        module: String,
        /// Project root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Import syntax to emit
        #[arg(long, value_enum, default_value = "es-module")]
        style: StyleArg,
        /// Include glob, relative to the root (replaces the default set;
        /// can be specified multiple times)
        #[arg(long, value_name = "GLOB")]
        include: Vec<String>,
        /// Exclude glob (replaces the default set; can be specified
        /// multiple times)
        #[arg(long, value_name = "GLOB")]
        exclude: Vec<String>,
    },
}

fn main() {
    // Cycle detection recurses module by module, so deep dependency
    // chains need more stack than the Windows 1MB default in debug
    // builds. 8MB matches the Linux default.
    const STACK_SIZE: usize = 8 * 1024 * 1024;

    let thread = std::thread::Builder::new()
        .stack_size(STACK_SIZE)
        .spawn(run)
        .expect("failed to spawn main thread");

    let result = match thread.join() {
        Ok(result) => result,
        Err(payload) => std::panic::resume_unwind(payload),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", ui::colors::error("error:"), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    if !ui::use_color() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Dependencies { command } => match command {
            DependencyCommands::ImportPaths { command } => match command {
                ImportPathCommands::Scan {
                    root,
                    include,
                    exclude,
                    jobs,
                    format,
                } => cmd::scan::cmd_scan(&root, include, exclude, jobs, format),
                ImportPathCommands::Validate {
                    root,
                    rules,
                    include,
                    exclude,
                    jobs,
                    format,
                } => cmd::validate::cmd_validate(
                    &root,
                    rules.as_deref(),
                    include,
                    exclude,
                    jobs,
                    format,
                ),
                ImportPathCommands::Generate {
                    module,
                    root,
                    style,
                    include,
                    exclude,
                } => cmd::generate::cmd_generate(&module, &root, style, include, exclude),
            },
        },
        Commands::Completion { shell } => cmd_completion(shell),
        Commands::Version => cmd_version(),
    }
}

/// Generate shell completion script
fn cmd_completion(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    generate(shell, &mut command, "symphony", &mut std::io::stdout());
    Ok(())
}

fn cmd_version() -> Result<()> {
    const GIT_SHA: &str = env!("GIT_SHA");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    println!("symphony {}", VERSION);
    println!("commit: {}", GIT_SHA);
    println!("built: {}", BUILD_DATE);
    Ok(())
}
