// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Diagnostics sink with a settable current-line context.
//!
//! The driver sets the current line on entry to a line and clears it when a
//! pass finishes; every message recorded in between is tagged with it.
//! Status messages print immediately (unless silenced), warnings and errors
//! accumulate and are rendered with source context at the end of the run.

use std::fmt;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Status,
    Warning,
    Error,
}

impl Severity {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Severity::Status => "STATUS",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

/// A diagnostic message with location context.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub line: Option<u32>,
    pub column: Option<usize>,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(line: Option<u32>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            severity,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_column(mut self, column: Option<usize>) -> Self {
        self.column = column;
        self
    }

    pub fn format(&self) -> String {
        match self.line {
            Some(line) => format!("{}: {} - {}", line, self.severity.label(), self.message),
            None => format!("{} - {}", self.severity.label(), self.message),
        }
    }

    pub fn format_with_context(&self, lines: Option<&[String]>, use_color: bool) -> String {
        let sev = self.severity.label();
        let mut out = String::new();
        if let Some(line) = self.line {
            out.push_str(&format!("{line}: {sev}\n"));
            for ctx in build_context_lines(line, self.column, lines, use_color) {
                out.push_str(&ctx);
                out.push('\n');
            }
        }
        out.push_str(&format!("{sev}: {}", self.message));
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// The process-wide diagnostics sink for one assembly run.
#[derive(Debug, Default)]
pub struct Reporter {
    current_line: Option<u32>,
    quiet: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Reporter {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            current_line: None,
            quiet,
            diagnostics: Vec::new(),
        }
    }

    pub fn set_line(&mut self, line: u32) {
        self.current_line = Some(line);
    }

    pub fn clear_line(&mut self) {
        self.current_line = None;
    }

    #[must_use]
    pub fn current_line(&self) -> Option<u32> {
        self.current_line
    }

    /// Informational message; printed immediately unless silenced.
    pub fn status(&self, message: &str) {
        if self.quiet {
            return;
        }
        let diag = Diagnostic::new(self.current_line, Severity::Status, message);
        eprintln!("{}", diag.format());
    }

    /// Record a non-fatal warning at the current line.
    pub fn warning(&mut self, message: &str) {
        self.warning_at(message, None);
    }

    pub fn warning_at(&mut self, message: &str, column: Option<usize>) {
        self.diagnostics.push(
            Diagnostic::new(self.current_line, Severity::Warning, message).with_column(column),
        );
    }

    /// Record a fatal error at the current line. The caller is expected to
    /// abort the unit after this.
    pub fn error_at(&mut self, message: &str, column: Option<usize>) {
        self.diagnostics
            .push(Diagnostic::new(self.current_line, Severity::Error, message).with_column(column));
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }
}

/// Build source context lines for diagnostic display.
pub fn build_context_lines(
    line_num: u32,
    column: Option<usize>,
    lines: Option<&[String]>,
    use_color: bool,
) -> Vec<String> {
    let mut out = Vec::new();
    let line_idx = line_num.saturating_sub(1) as usize;

    let line = match lines {
        Some(lines) if line_idx < lines.len() => &lines[line_idx],
        _ => {
            out.push(format!("{:>5} | <source unavailable>", line_num));
            return out;
        }
    };

    out.push(format!(
        "{:>5} | {}",
        line_num,
        highlight_line(line, column, use_color)
    ));
    out
}

/// Highlight the character at `column` (1-based) in red, or append a caret
/// when the column is past the end of the line.
pub fn highlight_line(line: &str, column: Option<usize>, use_color: bool) -> String {
    match column {
        Some(col) if col > 0 => {
            let idx = col - 1;
            if idx >= line.len() {
                if use_color {
                    return format!("{line}\x1b[31m^\x1b[0m");
                }
                return format!("{line}^");
            }
            let (head, tail) = line.split_at(idx);
            let ch = tail.chars().next().unwrap_or(' ');
            let rest = &tail[ch.len_utf8()..];
            if use_color {
                format!("{head}\x1b[31m{ch}\x1b[0m{rest}")
            } else {
                format!("{head}{ch}{rest}")
            }
        }
        _ => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{highlight_line, Diagnostic, Reporter, Severity};

    #[test]
    fn diagnostic_format_includes_line_and_severity() {
        let diag = Diagnostic::new(Some(12), Severity::Error, "Bad thing");
        assert_eq!(diag.format(), "12: ERROR - Bad thing");
        let diag = Diagnostic::new(None, Severity::Warning, "Loose thing");
        assert_eq!(diag.format(), "WARNING - Loose thing");
    }

    #[test]
    fn reporter_tags_current_line() {
        let mut reporter = Reporter::new(true);
        reporter.set_line(3);
        reporter.warning("odd");
        reporter.clear_line();
        reporter.warning("loose");
        let diags = reporter.diagnostics();
        assert_eq!(diags[0].line, Some(3));
        assert_eq!(diags[1].line, None);
        assert_eq!(reporter.warning_count(), 2);
    }

    #[test]
    fn highlight_without_color_keeps_text() {
        assert_eq!(highlight_line("ld a, 5", Some(4), false), "ld a, 5");
        assert_eq!(highlight_line("ld", Some(9), false), "ld^");
    }

    #[test]
    fn format_with_context_shows_source() {
        let lines = vec!["nop".to_string(), "bogus".to_string()];
        let diag = Diagnostic::new(Some(2), Severity::Error, "Unknown opcode");
        let text = diag.format_with_context(Some(&lines), false);
        assert!(text.contains("bogus"));
        assert!(text.contains("ERROR: Unknown opcode"));
    }
}
