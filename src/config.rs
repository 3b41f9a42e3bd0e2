use crate::error::PdxError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where game files are read from and where rewritten files go.
///
/// The output tree mirrors the source tree: a file at
/// `<source_root>/a/b.txt` is written to `<output_root>/a/b.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
}

impl Config {
    pub fn new(source_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Config {
            source_root: source_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Reads a JSON config file such as
    /// `{ "source_root": "/games/victoria3/game", "output_root": "./mod" }`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PdxError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PdxError::io(path, source))?;
        serde_json::from_str(&text).map_err(|source| PdxError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Swaps the source root prefix of `source` for the output root.
    pub fn output_path_for(&self, source: &Path) -> Result<PathBuf, PdxError> {
        source
            .strip_prefix(&self.source_root)
            .map(|relative| self.output_root.join(relative))
            .map_err(|_| PdxError::OutsideSourceRoot {
                path: source.to_path_buf(),
                root: self.source_root.clone(),
            })
    }
}
