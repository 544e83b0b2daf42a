//! Result adapters that attach catalog context to foreign errors

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Attach the failed action and its path to an `io::Result`.
pub trait IoResultExt<T> {
    /// ```ignore
    /// fs.read_to_string(&path).at("read catalog", &path)?;
    /// ```
    fn at(self, action: &'static str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, action: &'static str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Io {
            action,
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Name what was being written when TOML serialization fails.
pub trait TomlResultExt<T> {
    fn serializing(self, what: &'static str) -> ApplicationResult<T>;
}

impl<T> TomlResultExt<T> for Result<T, toml::ser::Error> {
    fn serializing(self, what: &'static str) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Serialize { what, source })
    }
}
