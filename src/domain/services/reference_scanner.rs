//! Embedded-resource reference scanner
//!
//! Finds `data-uri(...)` calls, the LESS function that inlines a file into
//! the generated CSS. Accepted shapes:
//!
//! ```text
//! data-uri("path")
//! data-uri("mime/type", "path")
//! ```
//!
//! Only a literal path is a static dependency. A variable or an
//! interpolated string depends on evaluation and is reported as dynamic so
//! the caller can skip it.

use std::fmt;

use super::source_text::{
    find_keyword, is_ident_byte, line_of, split_arguments, strip_comments, Argument,
};

const FUNCTION: &str = "data-uri";

/// Path argument of a reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferencePath {
    /// Statically known path
    Literal(String),
    /// Variable or interpolated expression; not resolvable without evaluation
    Dynamic(String),
}

/// One `data-uri` call found in a source unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedReference {
    pub path: ReferencePath,
    pub mime_type: Option<String>,
    /// 1-based line of the call
    pub line: usize,
}

/// A call with the wrong argument shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedCall {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for MalformedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on line {}", self.message, self.line)
    }
}

fn call_boundary(b: u8) -> bool {
    // `.data-uri(` or `#ns > .data-uri(` are mixin calls, `@data-uri` a variable
    !is_ident_byte(b) && !matches!(b, b'.' | b'#' | b'@' | b'$')
}

/// Scan a source unit for embedded-resource calls, in source order.
///
/// Fails on the first call with a malformed argument list.
pub fn scan_references(source: &str) -> Result<Vec<EmbeddedReference>, MalformedCall> {
    let text = strip_comments(source);
    let pattern = format!("{}(", FUNCTION);
    let mut references = Vec::new();

    for offset in find_keyword(&text, &pattern, call_boundary) {
        let line = line_of(&text, offset);
        let open = offset + FUNCTION.len();
        let (raw_args, _) = split_arguments(&text, open).ok_or_else(|| MalformedCall {
            line,
            message: format!("unterminated {}() call", FUNCTION),
        })?;

        let args: Vec<Argument> = match raw_args.as_slice() {
            [only] if only.trim().is_empty() => Vec::new(),
            _ => raw_args.iter().map(|a| Argument::classify(a)).collect(),
        };
        let (mime_arg, path_arg) = match args.as_slice() {
            [path] => (None, path),
            [mime, path] => (Some(mime), path),
            _ => {
                return Err(MalformedCall {
                    line,
                    message: format!(
                        "{}() expects 1 or 2 arguments, got {}",
                        FUNCTION,
                        args.len()
                    ),
                })
            }
        };

        let mime_type = match mime_arg {
            None => None,
            Some(Argument::Literal(m)) | Some(Argument::Bare(m)) => Some(m.clone()),
            Some(Argument::Variable(m))
            | Some(Argument::Interpolated(m))
            | Some(Argument::Expression(m)) => Some(m.clone()),
            Some(Argument::Empty) => {
                return Err(MalformedCall {
                    line,
                    message: format!("{}() has an empty mime type argument", FUNCTION),
                })
            }
        };

        let path = match path_arg {
            Argument::Literal(p) | Argument::Bare(p) => ReferencePath::Literal(p.clone()),
            Argument::Variable(p) | Argument::Interpolated(p) | Argument::Expression(p) => {
                ReferencePath::Dynamic(p.clone())
            }
            Argument::Empty => {
                return Err(MalformedCall {
                    line,
                    message: format!("{}() has an empty path argument", FUNCTION),
                })
            }
        };

        references.push(EmbeddedReference {
            path,
            mime_type,
            line,
        });
    }

    Ok(references)
}
