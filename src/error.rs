use std::{collections::BTreeMap, fmt, io, sync::Arc};

use crate::texture::TgaError;

pub const KEY_FILE_OPEN: &str = "file-open";
pub const KEY_TRUNCATED_READ: &str = "truncated-read";
pub const KEY_MALFORMED_RECORD: &str = "malformed-record";
pub const KEY_MISSING_COMPANION: &str = "missing-companion";
pub const KEY_UNSUPPORTED_FORMAT: &str = "unsupported-format";
pub const KEY_BAD_HIERARCHY: &str = "bad-hierarchy";
pub const KEY_MISSING_ROOT: &str = "missing-root";
pub const KEY_TEXTURE_LOAD: &str = "texture-load";
pub const KEY_IO_ERROR: &str = "io-error";

/// Coarse classification of a [`ModelError`] key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    TruncatedRead,
    MalformedRecord,
    MissingCompanionFile,
    UnsupportedFormatVariant,
    BadHierarchy,
    MissingRoot,
    TextureLoad,
    Io,
    Other,
}

#[derive(Debug, Clone)]
pub struct ModelError {
    pub key: &'static str,
    pub args: BTreeMap<&'static str, String>,
    pub causes: Vec<Arc<dyn std::error::Error + Send + Sync>>,
}

impl ModelError {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            args: BTreeMap::new(),
            causes: Vec::new(),
        }
    }

    pub fn with_arg(mut self, k: &'static str, v: impl ToString) -> Self {
        self.args.insert(k, v.to_string());
        self
    }

    pub fn push_std(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.causes.push(Arc::new(cause));
        self
    }

    pub fn arg(&self, k: &str) -> Option<&str> {
        self.args.get(k).map(String::as_str)
    }

    pub fn kind(&self) -> ErrorKind {
        match self.key {
            KEY_FILE_OPEN => ErrorKind::FileNotFound,
            KEY_TRUNCATED_READ => ErrorKind::TruncatedRead,
            KEY_MALFORMED_RECORD => ErrorKind::MalformedRecord,
            KEY_MISSING_COMPANION => ErrorKind::MissingCompanionFile,
            KEY_UNSUPPORTED_FORMAT => ErrorKind::UnsupportedFormatVariant,
            KEY_BAD_HIERARCHY => ErrorKind::BadHierarchy,
            KEY_MISSING_ROOT => ErrorKind::MissingRoot,
            KEY_TEXTURE_LOAD => ErrorKind::TextureLoad,
            KEY_IO_ERROR => ErrorKind::Io,
            _ => ErrorKind::Other,
        }
    }

    /// Wraps an open failure, keeping the offending path.
    pub fn file_open(path: impl fmt::Display, err: io::Error) -> Self {
        ModelError::new(KEY_FILE_OPEN)
            .with_arg("path", path)
            .push_std(err)
    }

    /// Attaches the section being read to a lower-level error.
    pub fn in_section(self, section: &'static str) -> Self {
        self.with_arg("section", section)
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.key)?;
        let mut first = true;
        for (k, v) in &self.args {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{k}={v}")?;
        }
        write!(f, ")")
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes
            .first()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<io::Error> for ModelError {
    fn from(err: io::Error) -> Self {
        let key = match err.kind() {
            io::ErrorKind::UnexpectedEof => KEY_TRUNCATED_READ,
            _ => KEY_IO_ERROR,
        };
        ModelError::new(key).push_std(err)
    }
}

impl From<TgaError> for ModelError {
    fn from(err: TgaError) -> Self {
        let key = match err {
            TgaError::UnsupportedImageType { .. } | TgaError::UnsupportedPixelDepth { .. } => {
                KEY_UNSUPPORTED_FORMAT
            }
            _ => KEY_TEXTURE_LOAD,
        };
        ModelError::new(key).push_std(err)
    }
}
