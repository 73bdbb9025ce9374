//! Diagnostic rendering backends.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[S101]: unsupported circuit topology
///   --> gate 7
///    = note: feedback circuits are not supported
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        let label = format!("{}[{}]", diag.severity, diag.code);
        if !self.color {
            return label;
        }
        let ansi = match diag.severity {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Note => "36",
        };
        format!("\x1b[1;{ansi}m{label}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        out.push_str(&format!("{}: {}\n", self.header(diag), diag.message));

        if let Some(subject) = &diag.subject {
            out.push_str(&format!("  --> {subject}\n"));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    #[test]
    fn render_error_with_subject() {
        let code = DiagnosticCode::new(Category::Search, 101);
        let diag = Diagnostic::error(code, "unsupported circuit topology").with_subject("gate 7");

        let output = TerminalRenderer::new(false).render(&diag);

        assert!(output.contains("error[S101]: unsupported circuit topology"));
        assert!(output.contains("--> gate 7"));
    }

    #[test]
    fn render_warning_with_notes() {
        let code = DiagnosticCode::new(Category::Library, 201);
        let diag = Diagnostic::warning(code, "model has no response function")
            .with_note("part 'P1_PhlF' is skipped")
            .with_help("add a response_function entry to the model");

        let output = TerminalRenderer::new(false).render(&diag);

        assert!(output.contains("warning[L201]: model has no response function"));
        assert!(output.contains("= note: part 'P1_PhlF' is skipped"));
        assert!(output.contains("= help: add a response_function entry to the model"));
    }

    #[test]
    fn render_without_subject() {
        let code = DiagnosticCode::new(Category::Error, 999);
        let diag = Diagnostic::error(code, "general error");
        let output = TerminalRenderer::new(false).render(&diag);
        assert!(output.contains("error[E999]: general error"));
        assert!(!output.contains("-->"));
    }

    #[test]
    fn render_colored_header() {
        let code = DiagnosticCode::new(Category::Error, 1);
        let diag = Diagnostic::error(code, "boom");
        let output = TerminalRenderer::new(true).render(&diag);
        assert!(output.starts_with("\x1b[1;31merror[E001]\x1b[0m"));
    }
}
