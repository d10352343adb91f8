//! Low-level helpers for scanning LESS source text
//!
//! Just enough lexing to find directives and function calls reliably:
//! comments are blanked out, quoted strings and unquoted `url(...)` bodies
//! are skipped as opaque. Every structural character we look for is ASCII,
//! so byte offsets are always valid `str` boundaries.

/// Characters that may appear inside a LESS identifier
pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// 1-based line number of a byte offset
pub(crate) fn line_of(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset.min(text.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Index just past the string literal whose opening quote is at `start`.
///
/// An unterminated string runs to the end of the text.
pub(crate) fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// If an unquoted `url(` body starts at `open + 1`, return the index just
/// past its closing parenthesis.
fn skip_unquoted_url(bytes: &[u8], open: usize) -> Option<usize> {
    let mut i = open + 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
        return None;
    }
    while i < bytes.len() && bytes[i] != b')' {
        i += 1;
    }
    Some((i + 1).min(bytes.len()))
}

/// True if `url(` starts at `i` on a token boundary
fn is_url_open(bytes: &[u8], i: usize) -> bool {
    bytes.len() >= i + 4
        && bytes[i..i + 4].eq_ignore_ascii_case(b"url(")
        && (i == 0 || !is_ident_byte(bytes[i - 1]))
}

/// Replace `//` and `/* */` comments with spaces, keeping newlines so line
/// numbers stay stable.
pub(crate) fn strip_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = bytes.to_vec();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => i = skip_string(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = text[i + 2..]
                    .find("*/")
                    .map(|p| i + 2 + p + 2)
                    .unwrap_or(bytes.len());
                blank(&mut out[i..end]);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = text[i..].find('\n').map(|p| i + p).unwrap_or(bytes.len());
                blank(&mut out[i..end]);
                i = end;
            }
            _ if is_url_open(bytes, i) => {
                i = skip_unquoted_url(bytes, i + 3).unwrap_or(i + 4);
            }
            _ => i += 1,
        }
    }

    // Only ASCII bytes were overwritten with ASCII, and never in the middle
    // of a multi-byte sequence.
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn blank(region: &mut [u8]) {
    for b in region {
        if *b != b'\n' {
            *b = b' ';
        }
    }
}

/// Offsets of `keyword` occurrences outside string literals and unquoted
/// url bodies, where `boundary` accepts the byte preceding the match.
///
/// Expects comment-free text (see [`strip_comments`]).
pub(crate) fn find_keyword(text: &str, keyword: &str, boundary: fn(u8) -> bool) -> Vec<usize> {
    let bytes = text.as_bytes();
    let key = keyword.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => i = skip_string(bytes, i),
            _ if bytes.len() >= i + key.len()
                && bytes[i..i + key.len()].eq_ignore_ascii_case(key)
                && (i == 0 || boundary(bytes[i - 1])) =>
            {
                found.push(i);
                i += key.len();
            }
            _ if is_url_open(bytes, i) => {
                i = skip_unquoted_url(bytes, i + 3).unwrap_or(i + 4);
            }
            _ => i += 1,
        }
    }
    found
}

/// Top-level arguments of a call whose `(` is at `open`.
///
/// Returns the raw (untrimmed) argument slices and the index just past the
/// closing `)`, or `None` if the parenthesis is never closed.
pub(crate) fn split_arguments(text: &str, open: usize) -> Option<(Vec<&str>, usize)> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut start = open + 1;
    let mut args = Vec::new();
    let mut i = open + 1;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'(' => depth += 1,
            b')' if depth == 0 => {
                args.push(&text[start..i]);
                return Some((args, i + 1));
            }
            b')' => depth -= 1,
            b',' if depth == 0 => {
                args.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Static shape of one call argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Argument {
    /// Quoted string without interpolation, quotes removed
    Literal(String),
    /// Unquoted token such as `image/png` or `logo.png`
    Bare(String),
    /// `@var`, `@@var` or `$prop`
    Variable(String),
    /// Quoted string containing `@{...}`
    Interpolated(String),
    /// Anything else: operations, nested calls
    Expression(String),
    /// Nothing between the separators
    Empty,
}

impl Argument {
    /// Classify a raw argument slice
    pub(crate) fn classify(raw: &str) -> Self {
        let arg = raw.trim();
        if arg.is_empty() {
            return Argument::Empty;
        }

        let unescaped = arg.strip_prefix('~').unwrap_or(arg);
        let bytes = unescaped.as_bytes();
        if let Some(&quote) = bytes.first() {
            if (quote == b'"' || quote == b'\'')
                && skip_string(bytes, 0) == bytes.len()
                && bytes.len() >= 2
                && bytes[bytes.len() - 1] == quote
            {
                let inner = &unescaped[1..unescaped.len() - 1];
                return if inner.contains("@{") {
                    Argument::Interpolated(inner.to_string())
                } else {
                    Argument::Literal(inner.to_string())
                };
            }
        }

        if (arg.starts_with('@') || arg.starts_with('$'))
            && arg
                .trim_start_matches(['@', '$'])
                .bytes()
                .all(is_ident_byte)
        {
            return Argument::Variable(arg.to_string());
        }

        let plain = arg
            .bytes()
            .all(|b| is_ident_byte(b) || matches!(b, b'.' | b'/' | b'+'));
        if plain && !arg.starts_with('+') {
            Argument::Bare(arg.to_string())
        } else {
            Argument::Expression(arg.to_string())
        }
    }
}
