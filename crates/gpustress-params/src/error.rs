use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors from loading a run configuration.
///
/// Malformed numeric lines are not errors; they read as 0.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamsError {
    /// The params file could not be opened or read.
    Read {
        path: PathBuf,
        kind: io::ErrorKind,
        message: String,
    },

    /// A scene name given on the command line matches no scene.
    UnknownScene { name: String },
}

impl ParamsError {
    pub(crate) fn read(path: impl Into<PathBuf>, err: &io::Error) -> Self {
        Self::Read {
            path: path.into(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// True when the file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Read { kind: io::ErrorKind::NotFound, .. })
    }
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message, .. } => {
                write!(f, "cannot read params file {}: {}", path.display(), message)
            }
            Self::UnknownScene { name } => write!(
                f,
                "unknown scene {name:?} (expected one of: dial, single-draw, multi-draw, \
                 batch-draw, texture, long-shader)"
            ),
        }
    }
}

impl std::error::Error for ParamsError {}
