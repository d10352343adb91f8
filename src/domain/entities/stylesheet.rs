//! Stylesheet entity - a file entering the pipeline
//!
//! Contents may arrive as one buffer or as a byte stream. Either way they are
//! reassembled into a single byte vector before decoding, so a multi-byte
//! character split across chunks decodes the same as in a buffer.

use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// File contents as handed over by the pipeline
pub enum Contents {
    /// Whole file in memory
    Buffer(Vec<u8>),
    /// Readable byte sequence, drained on first use
    Stream(Box<dyn Read + Send>),
}

impl fmt::Debug for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contents::Buffer(bytes) => f.debug_tuple("Buffer").field(&bytes.len()).finish(),
            Contents::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl Contents {
    /// Drain into one contiguous buffer.
    pub fn into_bytes(self) -> io::Result<Vec<u8>> {
        match self {
            Contents::Buffer(bytes) => Ok(bytes),
            Contents::Stream(mut reader) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }

    /// Drain and decode as UTF-8.
    pub fn into_string(self) -> io::Result<String> {
        let bytes = self.into_bytes()?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// A stylesheet as seen by the import resolver
///
/// Both halves are optional: the pipeline may hand over placeholder
/// entries (directories, null files) that carry neither.
#[derive(Debug, Default)]
pub struct StylesheetFile {
    path: Option<PathBuf>,
    contents: Option<Contents>,
}

impl StylesheetFile {
    /// File with in-memory contents
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: Some(path.into()),
            contents: Some(Contents::Buffer(contents.into())),
        }
    }

    /// File whose contents are read from a stream
    pub fn streamed(path: impl Into<PathBuf>, reader: impl Read + Send + 'static) -> Self {
        Self {
            path: Some(path.into()),
            contents: Some(Contents::Stream(Box::new(reader))),
        }
    }

    /// Placeholder with neither path nor contents
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn has_contents(&self) -> bool {
        self.contents.is_some()
    }

    /// Split into parts, consuming the file
    pub fn into_parts(self) -> (Option<PathBuf>, Option<Contents>) {
        (self.path, self.contents)
    }
}
