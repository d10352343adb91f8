//! LESS import processor
//!
//! Default `StylesheetProcessor`. It follows `@import` directives the way
//! the LESS compiler does (import options, `.less` defaulting, search paths,
//! `@{var}` interpolation) but never evaluates rules or produces CSS.

use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::entities::ImportRecord;
use crate::domain::ports::{
    FileSystem, FsError, PathResolver, ProcessedStylesheet, ProcessorError, RenderOptions,
    ResolveError, SourceUnit, StylesheetProcessor,
};
use crate::domain::services::source_text::{
    find_keyword, is_ident_byte, line_of, skip_string, strip_comments,
};

const MAX_INTERPOLATION_DEPTH: usize = 16;

/// Options in `@import (a, b) "file";`
///
/// `reference`, `once` and `multiple` change what the compiler emits, not
/// which files are read, so they are accepted and otherwise ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ImportOptions {
    inline: bool,
    less: bool,
    css: bool,
    optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ImportDirective {
    target: String,
    options: ImportOptions,
    line: usize,
}

pub struct LessImportProcessor {
    fs: Arc<dyn FileSystem>,
    resolver: Arc<dyn PathResolver>,
}

struct Walk {
    imports: Vec<ImportRecord>,
    sources: Vec<SourceUnit>,
    visited: HashSet<PathBuf>,
}

impl LessImportProcessor {
    pub fn new(fs: Arc<dyn FileSystem>, resolver: Arc<dyn PathResolver>) -> Self {
        Self { fs, resolver }
    }

    fn walk(
        &self,
        text: String,
        path: &Path,
        options: &RenderOptions,
        walk: &mut Walk,
    ) -> Result<(), ProcessorError> {
        let stripped = strip_comments(&text);
        let directives = parse_imports(&stripped, path)?;
        let variables = parse_variables(&stripped);
        walk.sources.push(SourceUnit {
            path: path.to_path_buf(),
            text,
        });

        let current_dir = path.parent().unwrap_or(Path::new(""));
        for directive in directives {
            let target = interpolate(
                &directive.target,
                &variables,
                options,
                path,
                directive.line,
                0,
            )?;
            if is_remote(&target) || is_plain_css(&target, directive.options) {
                continue;
            }

            let candidate = if Path::new(&target).extension().is_none() {
                format!("{}.less", target)
            } else {
                target.clone()
            };

            let plugged = options
                .plugins
                .iter()
                .find_map(|plugin| plugin.resolve_import(&candidate, current_dir));
            let resolved = match plugged {
                Some(found) => found,
                None => match self.resolver.resolve(current_dir, &candidate, &options.paths) {
                    Ok(found) => found,
                    Err(ResolveError::NotFound { .. }) if directive.options.optional => continue,
                    Err(source @ ResolveError::NotFound { .. }) => {
                        return Err(ProcessorError::ImportNotFound {
                            import: target,
                            from: path.to_path_buf(),
                            source,
                        })
                    }
                    Err(other) => return Err(other.into()),
                },
            };

            if !walk.visited.insert(resolved.clone()) {
                continue;
            }
            walk.imports.push(ImportRecord::new(resolved.clone()));
            if directive.options.inline {
                continue;
            }

            let bytes = self
                .fs
                .read(&resolved)
                .map_err(|source| ProcessorError::Read {
                    path: resolved.clone(),
                    source,
                })?;
            let child = String::from_utf8(bytes).map_err(|e| ProcessorError::Read {
                path: resolved.clone(),
                source: FsError::at(&resolved, io::Error::new(io::ErrorKind::InvalidData, e)),
            })?;
            self.walk(child, &resolved, options, walk)?;
        }
        Ok(())
    }
}

impl StylesheetProcessor for LessImportProcessor {
    fn render(
        &self,
        text: &str,
        path: &Path,
        options: &RenderOptions,
    ) -> Result<ProcessedStylesheet, ProcessorError> {
        let mut walk = Walk {
            imports: Vec::new(),
            sources: Vec::new(),
            visited: HashSet::from([path.to_path_buf()]),
        };
        self.walk(text.to_string(), path, options, &mut walk)?;
        Ok(ProcessedStylesheet {
            imports: walk.imports,
            sources: walk.sources,
        })
    }
}

fn is_remote(target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    target.starts_with("//") || lower.starts_with("http:") || lower.starts_with("https:")
}

/// A `.css` import (or one marked `css`) stays a plain CSS `@import`.
fn is_plain_css(target: &str, options: ImportOptions) -> bool {
    if options.less || options.inline {
        return false;
    }
    let without_query = target.split(['?', '#']).next().unwrap_or(target);
    options.css || without_query.to_ascii_lowercase().ends_with(".css")
}

fn syntax(file: &Path, line: usize, message: impl Into<String>) -> ProcessorError {
    ProcessorError::Syntax {
        file: file.to_path_buf(),
        line,
        message: message.into(),
    }
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Parse every `@import` directive of comment-free text.
fn parse_imports(text: &str, file: &Path) -> Result<Vec<ImportDirective>, ProcessorError> {
    let bytes = text.as_bytes();
    let mut directives = Vec::new();

    for offset in find_keyword(text, "@import", |b| !is_ident_byte(b) && b != b'@') {
        let mut i = offset + "@import".len();
        if i < bytes.len() && is_ident_byte(bytes[i]) {
            // `@import-path: ...` is a variable, not a directive
            continue;
        }
        let line = line_of(text, offset);

        i = skip_whitespace(bytes, i);
        let mut options = ImportOptions::default();
        if bytes.get(i) == Some(&b'(') {
            let close = text[i..]
                .find(')')
                .map(|p| i + p)
                .ok_or_else(|| syntax(file, line, "unterminated @import options"))?;
            for option in text[i + 1..close].split(',').map(str::trim) {
                match option {
                    "inline" => options.inline = true,
                    "less" => options.less = true,
                    "css" => options.css = true,
                    "optional" => options.optional = true,
                    "reference" | "once" | "multiple" | "" => {}
                    other => {
                        return Err(syntax(
                            file,
                            line,
                            format!("unrecognised @import option '{}'", other),
                        ))
                    }
                }
            }
            i = skip_whitespace(bytes, close + 1);
        }

        let target =
            parse_target(text, i).ok_or_else(|| syntax(file, line, "malformed @import"))?;
        directives.push(ImportDirective {
            target,
            options,
            line,
        });
    }
    Ok(directives)
}

/// Read the import target starting at `i`: a quoted string or `url(...)`.
fn parse_target(text: &str, i: usize) -> Option<String> {
    let bytes = text.as_bytes();
    match *bytes.get(i)? {
        b'"' | b'\'' => quoted(text, i),
        _ if bytes.len() >= i + 4 && bytes[i..i + 4].eq_ignore_ascii_case(b"url(") => {
            let start = skip_whitespace(bytes, i + 4);
            match *bytes.get(start)? {
                b'"' | b'\'' => quoted(text, start),
                _ => {
                    let close = text[start..].find(')')? + start;
                    let raw = text[start..close].trim();
                    (!raw.is_empty()).then(|| raw.to_string())
                }
            }
        }
        _ => None,
    }
}

fn quoted(text: &str, start: usize) -> Option<String> {
    let bytes = text.as_bytes();
    let end = skip_string(bytes, start);
    if end - start < 2 || bytes[end - 1] != bytes[start] {
        return None;
    }
    Some(text[start + 1..end - 1].to_string())
}

/// Collect top-level `@name: value;` declarations (last one wins).
fn parse_variables(text: &str) -> BTreeMap<String, String> {
    let bytes = text.as_bytes();
    let mut variables = BTreeMap::new();
    let mut depth = 0usize;
    let mut statement_start = true;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                statement_start = false;
                continue;
            }
            b'{' => {
                depth += 1;
                statement_start = true;
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                statement_start = true;
            }
            b';' => statement_start = true,
            b'@' if depth == 0 && statement_start => {
                let name_start = i + 1;
                let mut j = name_start;
                while j < bytes.len() && is_ident_byte(bytes[j]) {
                    j += 1;
                }
                let colon = skip_whitespace(bytes, j);
                if j > name_start && bytes.get(colon) == Some(&b':') {
                    let value_end = statement_end(bytes, colon + 1);
                    let value = unquote(text[colon + 1..value_end].trim());
                    variables.insert(text[name_start..j].to_string(), value.to_string());
                    i = value_end;
                    continue;
                }
                statement_start = false;
            }
            b if b.is_ascii_whitespace() => {}
            _ => statement_start = false,
        }
        i += 1;
    }
    variables
}

/// Index of the `;` (or `}` / end of text) that ends a declaration value.
fn statement_end(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b';' | b'}' => return i,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn unquote(value: &str) -> &str {
    let value = value.strip_prefix('~').unwrap_or(value);
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Look a variable up: modify vars, then file declarations, then global vars.
fn lookup<'a>(
    name: &str,
    variables: &'a BTreeMap<String, String>,
    options: &'a RenderOptions,
) -> Option<&'a str> {
    options
        .modify_vars
        .get(name)
        .or_else(|| variables.get(name))
        .or_else(|| options.global_vars.get(name))
        .map(String::as_str)
}

/// Expand `@{name}` occurrences in an import target.
fn interpolate(
    target: &str,
    variables: &BTreeMap<String, String>,
    options: &RenderOptions,
    file: &Path,
    line: usize,
    depth: usize,
) -> Result<String, ProcessorError> {
    if !target.contains("@{") {
        return Ok(target.to_string());
    }
    if depth >= MAX_INTERPOLATION_DEPTH {
        return Err(syntax(
            file,
            line,
            format!("recursive variable definition in '{}'", target),
        ));
    }

    let mut out = String::with_capacity(target.len());
    let mut rest = target;
    while let Some(start) = rest.find("@{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let name = &after[..close];
        let value = resolve_variable(name, variables, options, file, line, depth)?;
        out.push_str(&value);
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn resolve_variable(
    name: &str,
    variables: &BTreeMap<String, String>,
    options: &RenderOptions,
    file: &Path,
    line: usize,
    depth: usize,
) -> Result<String, ProcessorError> {
    let raw = lookup(name, variables, options).ok_or_else(|| ProcessorError::UndefinedVariable {
        name: name.to_string(),
        file: file.to_path_buf(),
    })?;
    let raw = unquote(raw.trim());

    // `@a: @b;` - follow the reference
    if let Some(other) = raw.strip_prefix('@') {
        if !other.is_empty() && other.bytes().all(is_ident_byte) {
            if depth >= MAX_INTERPOLATION_DEPTH {
                return Err(syntax(
                    file,
                    line,
                    format!("recursive variable definition of @{}", name),
                ));
            }
            return resolve_variable(other, variables, options, file, line, depth + 1);
        }
    }
    interpolate(raw, variables, options, file, line, depth + 1)
}
