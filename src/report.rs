//! Output formatting for diagnostics.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};

use crate::engine::Diagnostic;
use crate::rules::{Classification, Severity};
use crate::syntax::{SyntaxTree, TextSpan};

/// Top-level JSON document.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub diagnostics: Vec<JsonDiagnostic>,
}

#[derive(Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub rule: String,
    pub severity: String,
    pub title: String,
    /// 1-based line of the primary span start.
    pub line: usize,
    /// 1-based column, in characters.
    pub column: usize,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fade: Vec<JsonSpan>,
}

#[derive(Serialize, Deserialize)]
pub struct JsonSpan {
    pub start: usize,
    pub end: usize,
}

/// Maps byte offsets to line/column positions.
struct LineIndex {
    text: String,
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: String) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&s| s <= offset).max(1);
        let start = self.line_starts[line - 1];
        let end = offset.min(self.text.len());
        let column = self
            .text
            .get(start..end)
            .map(|s| s.chars().count())
            .unwrap_or(end - start);
        (line, column + 1)
    }
}

/// Render diagnostics as a pretty-printed JSON report.
pub fn to_json(diagnostics: &[Diagnostic], tree: &SyntaxTree) -> anyhow::Result<String> {
    let index = LineIndex::new(tree.render());
    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        diagnostics: diagnostics.iter().map(|d| diagnostic_to_json(d, &index)).collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write diagnostics in JSON format to stdout.
pub fn write_json(diagnostics: &[Diagnostic], tree: &SyntaxTree) -> anyhow::Result<()> {
    let json = to_json(diagnostics, tree)?;
    println!("{}", json);
    Ok(())
}

fn diagnostic_to_json(d: &Diagnostic, index: &LineIndex) -> JsonDiagnostic {
    let (line, column) = index.position(d.span.start);
    JsonDiagnostic {
        rule: d.rule.as_str().to_string(),
        severity: d.severity.to_string(),
        title: d.title.clone(),
        line,
        column,
        start: d.span.start,
        end: d.span.end,
        fade: fade_spans(d)
            .map(|s| JsonSpan {
                start: s.start,
                end: s.end,
            })
            .collect(),
    }
}

fn fade_spans(d: &Diagnostic) -> impl Iterator<Item = TextSpan> + '_ {
    d.highlights
        .iter()
        .filter(|h| h.classification == Classification::FadeOut)
        .map(|h| h.span)
}

/// Render diagnostics for a terminal, one line per diagnostic.
pub fn format_pretty(diagnostics: &[Diagnostic], tree: &SyntaxTree, path: &str) -> String {
    let index = LineIndex::new(tree.render());
    let mut out = String::new();

    if diagnostics.is_empty() {
        out.push_str(&format!("  {} {}\n", "✓".green(), "no findings".dimmed()));
        return out;
    }

    out.push_str(&format!("  {} ({}):\n", "Findings".bold(), diagnostics.len()));
    for d in diagnostics {
        let (line, column) = index.position(d.span.start);
        out.push_str(&format!(
            "    {} {:<32}{}{} {}\n",
            severity_tag(d.severity),
            d.rule.as_str().dimmed(),
            path.blue(),
            format!(":{}:{}", line, column).dimmed(),
            d.title,
        ));
    }
    out
}

pub fn write_pretty(diagnostics: &[Diagnostic], tree: &SyntaxTree, path: &str) {
    println!();
    println!("  {} v{}", "shapefix".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!();
    print!("{}", format_pretty(diagnostics, tree, path));
}

fn severity_tag(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "ERROR".red(),
        Severity::Warning => "WARN ".yellow(),
        Severity::Info => "INFO ".blue(),
        Severity::Hidden => "HIDE ".dimmed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Highlight, RuleId};
    use crate::syntax::factory as f;

    fn tree() -> SyntaxTree {
        SyntaxTree::new(f::compilation_unit(vec![
            f::expression_statement(f::invocation(f::identifier_name("A"), Vec::new()))
                .with_trailing_trivia(vec![f::eol()]),
            f::expression_statement(f::invocation(f::identifier_name("B"), Vec::new()))
                .with_leading_trivia(vec![f::whitespace("\t")]),
        ]))
    }

    fn diagnostic() -> Diagnostic {
        Diagnostic {
            rule: RuleId::UseSpacesInsteadOfTab,
            severity: Severity::Warning,
            title: "Use spaces instead of tab".to_string(),
            span: TextSpan::new(5, 6),
            highlights: vec![
                Highlight {
                    span: TextSpan::new(5, 6),
                    classification: Classification::Primary,
                },
                Highlight::fade(TextSpan::new(5, 6)),
            ],
        }
    }

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("ab\ncd\n".to_string());
        assert_eq!(index.position(0), (1, 1));
        assert_eq!(index.position(2), (1, 3));
        assert_eq!(index.position(3), (2, 1));
        assert_eq!(index.position(6), (3, 1));
    }

    #[test]
    fn test_json_report() {
        let tree = tree();
        assert_eq!(tree.render(), "A();\n\tB();");
        let json = to_json(&[diagnostic()], &tree).unwrap();
        let report: JsonReport = serde_json::from_str(&json).unwrap();

        assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(report.diagnostics.len(), 1);
        let d = &report.diagnostics[0];
        assert_eq!(d.rule, "use_spaces_instead_of_tab");
        assert_eq!(d.severity, "warning");
        assert_eq!((d.line, d.column), (2, 1));
        assert_eq!((d.start, d.end), (5, 6));
        assert_eq!(d.fade.len(), 1);
    }

    #[test]
    fn test_pretty_output() {
        colored::control::set_override(false);
        let tree = tree();
        let out = format_pretty(&[diagnostic()], &tree, "src/Program.cs");
        assert!(out.contains("Findings (1)"));
        assert!(out.contains("WARN"));
        assert!(out.contains("src/Program.cs:2:1"));
        assert!(out.contains("Use spaces instead of tab"));

        let empty = format_pretty(&[], &tree, "src/Program.cs");
        assert!(empty.contains("no findings"));
    }
}
