//! Diagnostic infrastructure.
//!
//! Every rule and the scan-issue adapter emit into the same record type.
//! Diagnostics are immutable once emitted; the fix applier consumes them and
//! a fresh analysis pass produces new ones. Two renderings are provided:
//! terminal output with source context (codespan-reporting) and a JSON
//! mirror for editor integration.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, Severity as CsSeverity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use serde::{Deserialize, Serialize};
use strigil_syntax::{LineIndex, Span};

/// Diagnostic severity. `off` exists only in configuration, never on an
/// emitted diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// One text replacement, relative to the pass's original text.
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub span: Span,
    pub replacement: String,
}

/// A fix: ordered, non-overlapping edits that together resolve one
/// diagnostic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fix {
    pub edits: Vec<Edit>,
}

impl Fix {
    /// Replace a span with new text.
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Fix {
            edits: vec![Edit {
                span,
                replacement: replacement.into(),
            }],
        }
    }

    /// Delete a span.
    pub fn delete(span: Span) -> Self {
        Self::replace(span, "")
    }

    /// Add another edit; edits must stay ordered and non-overlapping.
    pub fn and_replace(mut self, span: Span, replacement: impl Into<String>) -> Self {
        debug_assert!(self
            .edits
            .last()
            .map_or(true, |e| e.span.end <= span.start));
        self.edits.push(Edit {
            span,
            replacement: replacement.into(),
        });
        self
    }

    /// Byte offset of the first edit.
    pub fn start(&self) -> usize {
        self.edits.first().map_or(0, |e| e.span.start)
    }

    /// Byte offset past the last edit.
    pub fn end(&self) -> usize {
        self.edits.last().map_or(0, |e| e.span.end)
    }
}

/// A single finding in one file.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Stable namespaced rule id, e.g. `strigil/no-debugger`.
    pub rule_id: &'static str,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub fix: Option<Fix>,
    pub help: Option<String>,
    pub doc_url: Option<String>,
}

impl Diagnostic {
    pub fn new(
        rule_id: &'static str,
        severity: Severity,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Diagnostic {
            rule_id,
            severity,
            message: message.into(),
            span,
            fix: None,
            help: None,
            doc_url: None,
        }
    }

    pub fn error(rule_id: &'static str, message: impl Into<String>, span: Span) -> Self {
        Self::new(rule_id, Severity::Error, message, span)
    }

    pub fn warning(rule_id: &'static str, message: impl Into<String>, span: Span) -> Self {
        Self::new(rule_id, Severity::Warning, message, span)
    }

    /// Attach a fix.
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Attach help text shown under the finding.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Attach a documentation link.
    pub fn with_doc_url(mut self, url: impl Into<String>) -> Self {
        self.doc_url = Some(url.into());
        self
    }

    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }

    fn to_codespan(&self, file_id: usize) -> CsDiagnostic<usize> {
        let severity = match self.severity {
            Severity::Error => CsSeverity::Error,
            Severity::Warning => CsSeverity::Warning,
        };
        let mut diag = CsDiagnostic::new(severity)
            .with_message(&self.message)
            .with_code(self.rule_id)
            .with_labels(vec![Label::primary(
                file_id,
                self.span.start..self.span.end,
            )]);
        if let Some(help) = &self.help {
            diag.notes.push(format!("help: {help}"));
        }
        if let Some(url) = &self.doc_url {
            diag.notes.push(format!("see: {url}"));
        }
        diag
    }

    /// Render the diagnostic to stderr with source context and colors.
    pub fn emit(
        &self,
        files: &SimpleFiles<String, String>,
        file_id: usize,
    ) -> Result<(), codespan_reporting::files::Error> {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = term::Config::default();
        let mut lock = writer.lock();
        term::emit(
            &mut lock,
            &config,
            files,
            &self.to_codespan(file_id),
        )
    }
}

/// Build a codespan file database for one source file.
pub fn create_files(name: impl Into<String>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(name.into(), source.into());
    files
}

/// JSON mirror of a diagnostic for the editor-integration layer. Positions
/// are 1-based; columns count code points.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub rule: String,
    pub severity: String,
    pub message: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub fixable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_url: Option<String>,
}

impl JsonDiagnostic {
    /// Convert a diagnostic, resolving the span end through the line index.
    pub fn from_diagnostic(diag: &Diagnostic, source: &str, index: &LineIndex) -> Self {
        let end = index.position(source, diag.span.end);
        JsonDiagnostic {
            rule: diag.rule_id.to_string(),
            severity: diag.severity.as_str().to_string(),
            message: diag.message.clone(),
            start_line: diag.span.line,
            start_column: diag.span.column,
            end_line: end.line,
            end_column: end.column,
            fixable: diag.is_fixable(),
            help: diag.help.clone(),
            doc_url: diag.doc_url.clone(),
        }
    }
}

/// Serialize a file's diagnostics for IDE consumption.
pub fn to_json(diagnostics: &[Diagnostic], source: &str) -> Result<String, serde_json::Error> {
    let index = LineIndex::new(source);
    let json: Vec<JsonDiagnostic> = diagnostics
        .iter()
        .map(|d| JsonDiagnostic::from_diagnostic(d, source, &index))
        .collect();
    serde_json::to_string_pretty(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> Span {
        Span::new(start, end, 1, start as u32 + 1)
    }

    #[test]
    fn test_builder() {
        let diag = Diagnostic::error("strigil/no-debugger", "Unexpected 'debugger'", span(0, 8))
            .with_help("remove it");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.rule_id, "strigil/no-debugger");
        assert!(!diag.is_fixable());
        assert_eq!(diag.help.as_deref(), Some("remove it"));
    }

    #[test]
    fn test_fix_bounds() {
        let fix = Fix::replace(span(4, 7), "const").and_replace(span(10, 12), "");
        assert_eq!(fix.start(), 4);
        assert_eq!(fix.end(), 12);
    }

    #[test]
    fn test_json_output() {
        let source = "debugger;\n";
        let diag = Diagnostic::error("strigil/no-debugger", "Unexpected 'debugger'", span(0, 8));
        let json = to_json(&[diag], source).unwrap();
        assert!(json.contains("\"strigil/no-debugger\""));
        assert!(json.contains("\"error\""));
        assert!(json.contains("\"start_line\": 1"));
        assert!(json.contains("\"fixable\": false"));
    }

    #[test]
    fn test_json_end_column_counts_code_points() {
        // 2 code points, 8 bytes of emoji: end column must be code-point based.
        let source = "\u{1F980}\u{1F980} = 1;\n";
        let diag = Diagnostic::warning("strigil/test", "m", Span::new(0, 8, 1, 1));
        let index = LineIndex::new(source);
        let json = JsonDiagnostic::from_diagnostic(&diag, source, &index);
        assert_eq!(json.end_column, 3);
    }
}
