//! Rendering a batch of diagnostics to terminal text or JSON (§10).

use ta_ir::{Name, Span, StringInterner};

use crate::{Diagnostic, Severity};
use crate::span_utils::LineOffsetTable;

/// Renders diagnostics against one source file. Holds the line table and
/// interner needed to turn spans and [`Name`]s back into human text.
pub struct Emitter<'a> {
    source_name: &'a str,
    lines: LineOffsetTable,
    interner: &'a StringInterner,
}

impl<'a> Emitter<'a> {
    #[must_use]
    pub fn new(source_name: &'a str, source: &str, interner: &'a StringInterner) -> Self {
        Emitter { source_name, lines: LineOffsetTable::build(source), interner }
    }

    fn resolve(&self, name: Name) -> String {
        self.interner.resolve(name).to_string()
    }

    fn position(&self, span: Span) -> (u32, u32) {
        self.lines.span_start(span)
    }

    /// One `path:line:col: severity[code]: message` line per diagnostic,
    /// sorted by position, matching the compact one-liner style the
    /// teacher's own CLI prints for each compiler error.
    #[must_use]
    pub fn render_terminal(&self, diagnostics: &[Diagnostic]) -> String {
        let mut sorted: Vec<&Diagnostic> = diagnostics.iter().collect();
        sorted.sort_by_key(|d| (d.span.start, d.span.end));
        let mut out = String::new();
        for diag in sorted {
            let (line, col) = self.position(diag.span);
            let message = diag.message(|name| self.resolve(name));
            out.push_str(&format!(
                "{}:{line}:{col}: {}[{}]: {message}\n",
                self.source_name,
                diag.severity(),
                diag.code(),
            ));
        }
        out
    }

    /// A JSON array of objects, one per diagnostic, for machine consumers
    /// (editor integrations, CI annotations). Hand-assembled rather than
    /// pulled in through `serde_json` to keep this crate's dependency
    /// surface matched to what it actually needs.
    #[must_use]
    pub fn render_json(&self, diagnostics: &[Diagnostic]) -> String {
        let mut sorted: Vec<&Diagnostic> = diagnostics.iter().collect();
        sorted.sort_by_key(|d| (d.span.start, d.span.end));
        let mut entries = Vec::with_capacity(sorted.len());
        for diag in sorted {
            let (line, col) = self.position(diag.span);
            let message = diag.message(|name| self.resolve(name));
            entries.push(format!(
                "{{\"file\":{},\"line\":{line},\"column\":{col},\"severity\":{},\"code\":{},\"message\":{}}}",
                json_string(self.source_name),
                json_string(&diag.severity().to_string()),
                json_string(diag.code()),
                json_string(&message),
            ));
        }
        format!("[{}]", entries.join(","))
    }

    /// `true` if any diagnostic in the batch is `Severity::Error`, i.e.
    /// the compile attempt failed (§4.4: "a non-empty list is a compile
    /// failure" — every taxonomy member is `Error` today, but this stays
    /// future-proof against an eventual `Warning`-only batch).
    #[must_use]
    pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
        diagnostics.iter().any(|d| d.severity() == Severity::Error)
    }
}

fn json_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ta_ir::StringInterner;

    #[test]
    fn renders_one_line_per_diagnostic_sorted_by_position() {
        let mut interner = StringInterner::new();
        let n = interner.intern("n");
        let diagnostics = vec![
            Diagnostic::new(crate::DiagnosticKind::UnexpectedBreak, Span::new(10, 15)),
            Diagnostic::new(crate::DiagnosticKind::VariableNotDeclared { name: n }, Span::new(0, 1)),
        ];
        let emitter = Emitter::new("iface.ta", "line one\nline two", &interner);
        let rendered = emitter.render_terminal(&diagnostics);
        let mut lines = rendered.lines();
        assert!(lines.next().unwrap().starts_with("iface.ta:1:1: error[TA001]"));
        assert!(lines.next().unwrap().starts_with("iface.ta:2:2: error[TA005]"));
    }

    #[test]
    fn json_escapes_quotes_in_messages() {
        let interner = StringInterner::new();
        let diagnostics = vec![Diagnostic::new(crate::DiagnosticKind::SwitchLabelNotLiteral, Span::new(0, 1))];
        let emitter = Emitter::new("i.ta", "x", &interner);
        let rendered = emitter.render_json(&diagnostics);
        assert!(rendered.starts_with('['));
        assert!(rendered.contains("\"code\":\"TA008\""));
    }
}
