use colored::{Color, Colorize};
use rustc_hash::FxHashMap;
use std::fmt::Write as _;

use jsm_common::diagnostics::{Diagnostic, DiagnosticCategory};
use jsm_common::position::LineMap;

/// Source text per file name, read from disk on first use unless registered
/// up front.
#[derive(Default)]
struct SourceCache {
    files: FxHashMap<String, Option<(String, LineMap)>>,
}

impl SourceCache {
    fn insert(&mut self, file: String, text: String) {
        let map = LineMap::build(&text);
        self.files.insert(file, Some((text, map)));
    }

    fn get(&mut self, file: &str) -> Option<&(String, LineMap)> {
        if file.is_empty() {
            return None;
        }
        self.files
            .entry(file.to_string())
            .or_insert_with(|| {
                let text = std::fs::read_to_string(file).ok()?;
                let map = LineMap::build(&text);
                Some((text, map))
            })
            .as_ref()
    }

    /// One-based line and column of `offset`, plus the text of that line.
    fn locate(&mut self, file: &str, offset: u32) -> Option<(u32, u32, &str)> {
        let (text, map) = self.get(file)?;
        let position = map.offset_to_position(offset, text);
        let line_text = map.line_text(position.line, text).unwrap_or("");
        Some((position.line + 1, position.character + 1, line_text))
    }
}

/// Renders diagnostics for a terminal:
///
/// ```text
/// js.legacy.d.ts:13:5 - error JSM5040: 'length' of 'Array' denotes ...
///  13 |     length: number;
///     |     ~~~~~~
/// ```
pub struct Reporter {
    color: bool,
    sources: SourceCache,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color, sources: SourceCache::default() }
    }

    /// Make `text` available under `file`; embedded sets have no file on disk.
    pub fn add_source(&mut self, file: impl Into<String>, text: impl Into<String>) {
        self.sources.insert(file.into(), text.into());
    }

    pub fn render(&mut self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|diagnostic| self.format_diagnostic(diagnostic))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_diagnostic(&mut self, diagnostic: &Diagnostic) -> String {
        let mut out = self.location(&diagnostic.file, diagnostic.start);
        let (label, color) = category_style(diagnostic.category);
        let _ = write!(out, " - {}", self.paint(label, color, true));
        if diagnostic.code != 0 {
            let _ = write!(out, " {}", self.paint(&format!("JSM{}", diagnostic.code), Color::BrightBlue, false));
        }
        let _ = write!(out, ": {}", diagnostic.message_text);
        self.push_excerpt(&mut out, &diagnostic.file, diagnostic.start, diagnostic.length);

        for related in &diagnostic.related_information {
            let location = self.location(&related.file, related.start);
            let _ = write!(out, "\n  {}: {location} - {}", self.dim("Related"), related.message_text);
            self.push_excerpt(&mut out, &related.file, related.start, related.length);
        }
        out
    }

    /// `file:line:col` when the source is known, the bare file name when it
    /// is not, `jsm` for diagnostics that belong to no file.
    fn location(&mut self, file: &str, offset: u32) -> String {
        match self.sources.locate(file, offset) {
            Some((line, column, _)) => format!("{file}:{line}:{column}"),
            None if file.is_empty() => "jsm".to_string(),
            None => file.to_string(),
        }
    }

    /// Source line under a numbered gutter, span marked with `~`. Spans that
    /// run past the end of the line are cut there.
    fn push_excerpt(&mut self, out: &mut String, file: &str, start: u32, length: u32) {
        if length == 0 {
            return;
        }
        let Some((line, column, text)) = self.sources.locate(file, start) else {
            return;
        };

        let mut shown = String::new();
        let mut marks = String::new();
        let first = (column - 1) as usize;
        let last = first + length as usize;
        for (i, ch) in text.chars().enumerate() {
            let width = if ch == '\t' { 4 } else { 1 };
            if ch == '\t' {
                shown.push_str("    ");
            } else {
                shown.push(ch);
            }
            if i < first {
                marks.extend(std::iter::repeat_n(' ', width));
            } else if i < last {
                marks.extend(std::iter::repeat_n('~', width));
            }
        }
        if !marks.contains('~') {
            marks.push('~');
        }

        let number = line.to_string();
        let gutter = " ".repeat(number.len());
        let marks = self.paint(&marks, Color::Red, false);
        let _ = write!(out, "\n {number} | {shown}\n {gutter} | {marks}");
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        match (self.color, bold) {
            (false, _) => text.to_string(),
            (true, false) => text.color(color).to_string(),
            (true, true) => text.color(color).bold().to_string(),
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color { text.dimmed().to_string() } else { text.to_string() }
    }
}

fn category_style(category: DiagnosticCategory) -> (&'static str, Color) {
    match category {
        DiagnosticCategory::Error => ("error", Color::Red),
        DiagnosticCategory::Warning => ("warning", Color::Yellow),
        DiagnosticCategory::Suggestion => ("suggestion", Color::Blue),
        DiagnosticCategory::Message => ("message", Color::Cyan),
    }
}
