use miette::SourceSpan;
use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// A `file:line:column` coordinate.
///
/// Every token and expression owns its own copy. Lines and columns are
/// 1-based when produced by [`Position::new`]; the lexer only ever moves a
/// position forward while scanning.
///
/// `offset` is the byte offset into the scanned text, used to label
/// diagnostics. It follows from the line and column, so comparisons ignore it.
#[derive(Debug, Clone)]
pub struct Position {
    pub filepath: PathBuf,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub const FIRST_LINE: usize = 1;
    pub const FIRST_COLUMN: usize = 1;

    /// The start of `filepath`.
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self::at(filepath, Self::FIRST_LINE, Self::FIRST_COLUMN)
    }

    pub fn at(filepath: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Position {
            filepath: filepath.into(),
            line,
            column,
            offset: 0,
        }
    }

    /// Same coordinate, with the byte offset set.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    pub(crate) fn next_line(&mut self) {
        self.line += 1;
        self.column = Self::FIRST_COLUMN;
    }

    /// Moves past `scanned`, one column per character.
    pub(crate) fn advance(&mut self, scanned: &[char]) {
        self.column += scanned.len();
        self.offset += scanned.iter().map(|c| c.len_utf8()).sum::<usize>();
    }

    fn key(&self) -> (&Path, usize, usize) {
        (&self.filepath, self.line, self.column)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl From<Position> for SourceSpan {
    fn from(position: Position) -> Self {
        SourceSpan::from((position.offset, 0))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.filepath.display(),
            self.line,
            self.column
        )
    }
}
