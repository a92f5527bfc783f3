//! Tokenizer for declaration files.
//!
//! The scanner produces one token at a time on demand. Keywords are not
//! separate token kinds: declaration syntax uses them contextually
//! (`readonly`, `type`, `is`, ...), so the parser compares identifier text.
//! Triple-slash directive lines are surfaced as a single token so the parser
//! can read the `<set ... />` header without a second pass.

use jsm_common::Span;
use jsm_common::diagnostics::{Diagnostic, diagnostic_codes};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    EndOfFile,
    Identifier,
    StringLiteral,
    NumericLiteral,
    /// A whole `/// ...` line; the token value holds the text after `///`.
    TripleSlashDirective,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    LessThan,
    GreaterThan,
    Comma,
    Semicolon,
    Colon,
    Question,
    Dot,
    DotDotDot,
    Equals,
    EqualsGreaterThan,
    Bar,
    Ampersand,
    Minus,
    Unknown,
}

impl SyntaxKind {
    /// Source text of punctuation tokens, used in "'x' expected" messages.
    pub fn text(self) -> &'static str {
        match self {
            SyntaxKind::EndOfFile => "end of file",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::StringLiteral => "string literal",
            SyntaxKind::NumericLiteral => "numeric literal",
            SyntaxKind::TripleSlashDirective => "///",
            SyntaxKind::OpenBrace => "{",
            SyntaxKind::CloseBrace => "}",
            SyntaxKind::OpenParen => "(",
            SyntaxKind::CloseParen => ")",
            SyntaxKind::OpenBracket => "[",
            SyntaxKind::CloseBracket => "]",
            SyntaxKind::LessThan => "<",
            SyntaxKind::GreaterThan => ">",
            SyntaxKind::Comma => ",",
            SyntaxKind::Semicolon => ";",
            SyntaxKind::Colon => ":",
            SyntaxKind::Question => "?",
            SyntaxKind::Dot => ".",
            SyntaxKind::DotDotDot => "...",
            SyntaxKind::Equals => "=",
            SyntaxKind::EqualsGreaterThan => "=>",
            SyntaxKind::Bar => "|",
            SyntaxKind::Ampersand => "&",
            SyntaxKind::Minus => "-",
            SyntaxKind::Unknown => "unknown",
        }
    }
}

/// Everything needed to rewind the scanner for speculative parsing.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    preceding_line_break: bool,
    diagnostic_count: usize,
}

pub struct ScannerState<'a> {
    file_name: String,
    source: &'a str,
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    preceding_line_break: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ScannerState<'a> {
    pub fn new(file_name: impl Into<String>, source: &'a str) -> Self {
        ScannerState {
            file_name: file_name.into(),
            source,
            pos: 0,
            token: SyntaxKind::Unknown,
            token_start: 0,
            token_value: String::new(),
            preceding_line_break: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Identifier name, unquoted string contents, numeric text or directive body.
    pub fn get_token_value_ref(&self) -> &str {
        &self.token_value
    }

    pub fn token_pos(&self) -> u32 {
        self.token_start as u32
    }

    pub fn token_end(&self) -> u32 {
        self.pos as u32
    }

    pub fn token_span(&self) -> Span {
        Span::new(self.token_start as u32, self.pos as u32)
    }

    /// Whether a line break separates the current token from the previous one.
    pub fn has_preceding_line_break(&self) -> bool {
        self.preceding_line_break
    }

    /// True when the current token is the identifier `text`.
    pub fn is_identifier_text(&self, text: &str) -> bool {
        self.token == SyntaxKind::Identifier && self.token_value == text
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_value: self.token_value.clone(),
            preceding_line_break: self.preceding_line_break,
            diagnostic_count: self.diagnostics.len(),
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.token_value = snapshot.token_value;
        self.preceding_line_break = snapshot.preceding_line_break;
        self.diagnostics.truncate(snapshot.diagnostic_count);
    }

    fn error(&mut self, start: usize, length: usize, code: u32) {
        self.diagnostics.push(Diagnostic::from_code(
            self.file_name.clone(),
            start as u32,
            length as u32,
            code,
            &[],
        ));
    }

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + offset).copied()
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    pub fn scan(&mut self) -> SyntaxKind {
        self.preceding_line_break = false;
        self.token_value.clear();
        self.skip_trivia();
        self.token_start = self.pos;

        let Some(ch) = self.source[self.pos..].chars().next() else {
            self.token = SyntaxKind::EndOfFile;
            return self.token;
        };

        self.token = match ch {
            '/' if self.source[self.pos..].starts_with("///") => self.scan_directive(),
            '"' | '\'' => self.scan_string(ch),
            '0'..='9' => self.scan_number(),
            '.' if self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()) => self.scan_number(),
            '.' if self.source[self.pos..].starts_with("...") => {
                self.pos += 3;
                SyntaxKind::DotDotDot
            }
            '=' if self.peek_byte(1) == Some(b'>') => {
                self.pos += 2;
                SyntaxKind::EqualsGreaterThan
            }
            c if is_identifier_start(c) => self.scan_identifier(),
            c => {
                self.pos += c.len_utf8();
                match c {
                    '{' => SyntaxKind::OpenBrace,
                    '}' => SyntaxKind::CloseBrace,
                    '(' => SyntaxKind::OpenParen,
                    ')' => SyntaxKind::CloseParen,
                    '[' => SyntaxKind::OpenBracket,
                    ']' => SyntaxKind::CloseBracket,
                    '<' => SyntaxKind::LessThan,
                    '>' => SyntaxKind::GreaterThan,
                    ',' => SyntaxKind::Comma,
                    ';' => SyntaxKind::Semicolon,
                    ':' => SyntaxKind::Colon,
                    '?' => SyntaxKind::Question,
                    '.' => SyntaxKind::Dot,
                    '=' => SyntaxKind::Equals,
                    '|' => SyntaxKind::Bar,
                    '&' => SyntaxKind::Ampersand,
                    '-' => SyntaxKind::Minus,
                    _ => {
                        self.error(self.token_start, c.len_utf8(), diagnostic_codes::INVALID_CHARACTER);
                        SyntaxKind::Unknown
                    }
                }
            }
        };
        self.token
    }

    fn skip_trivia(&mut self) {
        let bytes = self.source.as_bytes();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\n' | b'\r' => {
                    self.preceding_line_break = true;
                    self.pos += 1;
                }
                b' ' | b'\t' | 0x0B | 0x0C => self.pos += 1,
                // BOM
                0xEF if self.source[self.pos..].starts_with('\u{FEFF}') => self.pos += 3,
                b'/' if bytes.get(self.pos + 1) == Some(&b'/') => {
                    if bytes.get(self.pos + 2) == Some(&b'/') {
                        return;
                    }
                    while self.pos < bytes.len() && bytes[self.pos] != b'\n' && bytes[self.pos] != b'\r' {
                        self.pos += 1;
                    }
                }
                b'/' if bytes.get(self.pos + 1) == Some(&b'*') => {
                    let start = self.pos;
                    match self.source[self.pos + 2..].find("*/") {
                        Some(end) => {
                            let comment = &self.source[self.pos..self.pos + 2 + end + 2];
                            if comment.contains(['\n', '\r']) {
                                self.preceding_line_break = true;
                            }
                            self.pos += 2 + end + 2;
                        }
                        None => {
                            self.pos = bytes.len();
                            self.error(start, 2, diagnostic_codes::UNTERMINATED_COMMENT);
                        }
                    }
                }
                _ => return,
            }
        }
    }

    fn scan_directive(&mut self) -> SyntaxKind {
        let rest = &self.source[self.pos + 3..];
        let line_len = rest.find(['\n', '\r']).unwrap_or(rest.len());
        self.token_value.push_str(rest[..line_len].trim());
        self.pos += 3 + line_len;
        SyntaxKind::TripleSlashDirective
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        self.pos += 1;
        let mut chars = self.source[self.pos..].char_indices();
        let mut value = String::new();
        while let Some((offset, c)) = chars.next() {
            match c {
                _ if c == quote => {
                    self.pos += offset + 1;
                    self.token_value = value;
                    return SyntaxKind::StringLiteral;
                }
                '\n' | '\r' => {
                    self.pos += offset;
                    self.token_value = value;
                    self.error(
                        self.token_start,
                        self.pos - self.token_start,
                        diagnostic_codes::UNTERMINATED_STRING_LITERAL,
                    );
                    return SyntaxKind::StringLiteral;
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, '0')) => value.push('\0'),
                    Some((_, escaped)) => value.push(escaped),
                    None => break,
                },
                _ => value.push(c),
            }
        }
        self.pos = self.source.len();
        self.token_value = value;
        self.error(self.token_start, self.pos - self.token_start, diagnostic_codes::UNTERMINATED_STRING_LITERAL);
        SyntaxKind::StringLiteral
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let bytes = self.source.as_bytes();
        let start = self.pos;
        if bytes[self.pos] == b'0' && matches!(bytes.get(self.pos + 1), Some(b'x' | b'X' | b'b' | b'B' | b'o' | b'O')) {
            self.pos += 2;
            while self.pos < bytes.len() && (bytes[self.pos].is_ascii_hexdigit() || bytes[self.pos] == b'_') {
                self.pos += 1;
            }
        } else {
            while self.pos < bytes.len() && (bytes[self.pos].is_ascii_digit() || bytes[self.pos] == b'_') {
                self.pos += 1;
            }
            if bytes.get(self.pos) == Some(&b'.') {
                self.pos += 1;
                while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                    self.pos += 1;
                }
            }
            if matches!(bytes.get(self.pos), Some(b'e' | b'E')) {
                let mut lookahead = self.pos + 1;
                if matches!(bytes.get(lookahead), Some(b'+' | b'-')) {
                    lookahead += 1;
                }
                if bytes.get(lookahead).is_some_and(u8::is_ascii_digit) {
                    self.pos = lookahead;
                    while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                        self.pos += 1;
                    }
                }
            }
        }
        self.token_value.push_str(&self.source[start..self.pos]);
        SyntaxKind::NumericLiteral
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        let end = self.source[start..]
            .char_indices()
            .find(|&(_, c)| !is_identifier_part(c))
            .map_or(self.source.len(), |(offset, _)| start + offset);
        self.pos = end;
        self.token_value.push_str(&self.source[start..end]);
        SyntaxKind::Identifier
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

fn is_identifier_part(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphanumeric()
}
