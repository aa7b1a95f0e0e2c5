//! Literal- and comment-aware scanning of DDL text.
//!
//! The scanner walks the text once, left to right, and splits it into
//! segments tagged with the mode they were read in. Only [`ScanMode::Code`]
//! segments are ever rewritten; string literals and comments pass through
//! verbatim.

use std::sync::LazyLock;

use regex::Regex;

/// Identifiers that must stay quoted because they are reserved words.
pub const RESERVED_IDENTIFIERS: &[&str] = &["CASE"];

/// A bare `CASE` used as an identifier: `(CASE)`, `CASE,`.
static BARE_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(^|[^"\w$#])CASE(\s*[,)])"#).expect("Invalid bare CASE regex")
});

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Plain SQL text.
    Code,
    /// Inside `'...'`.
    StringLiteral,
    /// From `--` up to the end of the line.
    LineComment,
    /// Between `/*` and `*/`.
    BlockComment,
}

/// A run of text read in a single mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Mode the text was read in.
    pub mode: ScanMode,
    /// The text, delimiters included.
    pub text: &'a str,
}

/// Splits DDL into mode-tagged segments.
///
/// A doubled `''` inside a literal closes and immediately reopens it, which
/// leaves both halves tagged as literal.
#[must_use]
pub fn segments(ddl: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut mode = ScanMode::Code;
    let mut start = 0;
    let mut prev: Option<char> = None;

    for (i, c) in ddl.char_indices() {
        let transition = match (mode, c) {
            (ScanMode::Code, '-') if prev == Some('-') => Some((ScanMode::LineComment, i - 1)),
            (ScanMode::Code, '*') if prev == Some('/') => Some((ScanMode::BlockComment, i - 1)),
            (ScanMode::Code, '\'') => Some((ScanMode::StringLiteral, i)),
            (ScanMode::StringLiteral, '\'') => Some((ScanMode::Code, i + 1)),
            (ScanMode::LineComment, '\n') => Some((ScanMode::Code, i)),
            (ScanMode::BlockComment, '/') if prev == Some('*') => Some((ScanMode::Code, i + 1)),
            _ => None,
        };

        match transition {
            Some((next, boundary)) => {
                push_segment(&mut segments, mode, &ddl[start..boundary]);
                mode = next;
                start = boundary;
                // A delimiter never doubles as the first half of the next one.
                prev = None;
            }
            None => prev = Some(c),
        }
    }
    push_segment(&mut segments, mode, &ddl[start..]);
    segments
}

fn push_segment<'a>(segments: &mut Vec<Segment<'a>>, mode: ScanMode, text: &'a str) {
    if !text.is_empty() {
        segments.push(Segment { mode, text });
    }
}

/// Removes `"` identifier delimiters outside literals and comments.
///
/// Quotes are kept where dropping them would change meaning: identifiers
/// that are not plain uppercase names and reserved words. A bare `CASE`
/// identifier is quoted again.
#[must_use]
pub fn strip_identifier_quotes(ddl: &str) -> String {
    let mut result = String::with_capacity(ddl.len());
    for segment in segments(ddl) {
        match segment.mode {
            ScanMode::Code => result.push_str(&unquote_code(segment.text)),
            _ => result.push_str(segment.text),
        }
    }
    result
}

fn unquote_code(code: &str) -> String {
    let mut result = String::with_capacity(code.len());
    let mut rest = code;
    while let Some(open) = rest.find('"') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('"') {
            Some(close) => {
                let identifier = &after[..close];
                if needs_quotes(identifier) {
                    result.push('"');
                    result.push_str(identifier);
                    result.push('"');
                } else {
                    result.push_str(identifier);
                }
                rest = &after[close + 1..];
            }
            // Unbalanced quote: drop it.
            None => rest = after,
        }
    }
    result.push_str(rest);
    BARE_CASE.replace_all(&result, r#"${1}"CASE"${2}"#).into_owned()
}

fn needs_quotes(identifier: &str) -> bool {
    if RESERVED_IDENTIFIERS.contains(&identifier) {
        return true;
    }
    let mut chars = identifier.chars();
    let plain = chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || "_$#".contains(c));
    !plain
}

/// Splits text into statements at `;` terminators found in code.
///
/// Each returned statement is trimmed and keeps its terminator. Trailing text
/// without a terminator is returned as a last statement.
#[must_use]
pub fn split_statements(ddl: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    for segment in segments(ddl) {
        if segment.mode != ScanMode::Code {
            current.push_str(segment.text);
            continue;
        }
        let mut pieces = segment.text.split(';').peekable();
        while let Some(piece) = pieces.next() {
            current.push_str(piece);
            if pieces.peek().is_some() {
                current.push(';');
                push_statement(&mut statements, &mut current);
            }
        }
    }
    push_statement(&mut statements, &mut current);
    statements
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let statement = current.trim();
    if !statement.is_empty() {
        statements.push(statement.to_string());
    }
    current.clear();
}
