//! Centralized color and formatting helpers for terminal output.

use colored::{ColoredString, Colorize};

use crate::rules::Severity;

/// True when stdout should carry ANSI colors. Checked once at startup;
/// `NO_COLOR` wins over TTY detection.
pub fn use_color() -> bool {
    atty::is(atty::Stream::Stdout) && std::env::var("NO_COLOR").is_err()
}

/// Colored icon for a violation severity.
///
/// Icons:
/// - Warning: ⚠ (yellow)
/// - Error: ✗ (red)
pub fn severity_icon(severity: Severity) -> ColoredString {
    match severity {
        Severity::Warning => "⚠".yellow(),
        Severity::Error => "✗".red(),
    }
}

/// Color scheme for report text
pub mod colors {
    use colored::{ColoredString, Colorize};

    /// Green for success
    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    /// Yellow for warnings
    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    /// Red for errors
    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    /// Cyan for identifiers (module ids, etc.)
    pub fn identifier(text: &str) -> ColoredString {
        text.cyan()
    }

    /// Dimmed for secondary text
    pub fn secondary(text: &str) -> ColoredString {
        text.dimmed()
    }

    /// Bold for headings
    pub fn heading(text: &str) -> ColoredString {
        text.bold()
    }
}

/// Common text formatting patterns
pub mod format {
    /// Format a separator line for sections
    pub fn separator(width: usize) -> String {
        "─".repeat(width)
    }

    /// Format an aligned label/count pair for summary blocks
    pub fn count_line(label: &str, value: usize) -> String {
        format!("  {:<12} {}", format!("{}:", label), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_icon_all_severities() {
        severity_icon(Severity::Warning);
        severity_icon(Severity::Error);
    }

    #[test]
    fn test_separator() {
        assert_eq!(format::separator(5), "─────");
        assert_eq!(format::separator(10), "──────────");
    }

    #[test]
    fn test_count_line_alignment() {
        assert_eq!(format::count_line("Modules", 12), "  Modules:     12");
        assert_eq!(format::count_line("Unresolved", 0), "  Unresolved:  0");
    }
}
