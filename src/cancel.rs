//! Cooperative cancellation for long-running scans.
//!
//! The scanner checks the token between files; nothing is interrupted
//! mid-file, so a cancelled run never leaves partial output behind.

use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Install a SIGINT handler that flips the token. A second interrupt
/// force-exits with the conventional 130.
pub fn install_signal_handler(token: &CancelToken) {
    let token = token.clone();
    let _ = ctrlc::set_handler(move || {
        if token.is_cancelled() {
            eprintln!("\n{} Force exit", "✗".red());
            std::process::exit(130);
        }
        eprintln!(
            "\n{} Interrupt received - stopping after the current file...",
            "→".yellow()
        );
        eprintln!("  {} Press Ctrl+C again to force exit", "→".dimmed());
        token.cancel();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_starts_clear() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_is_visible_through_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
