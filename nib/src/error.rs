use std::path::PathBuf;

use nib_format::NibError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot open archive `{}`", .path.display())]
    OpenArchive {
        path: PathBuf,
        #[source]
        source: NibError,
    },

    #[error("Cannot read file `{}`", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot re-encode archive `{}`", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: NibError,
    },

    #[error("Re-encoded archive `{}` differs from the original at offset {offset:#x}", .path.display())]
    Mismatch { path: PathBuf, offset: usize },

    #[error("`{}` is a directory (use -r/--recursive to search it)", .path.display())]
    IsDirectory { path: PathBuf },

    #[error("Cannot search directory `{}`: {message}", .path.display())]
    WalkDirectory { path: PathBuf, message: String },

    #[error("Cannot render archive as JSON")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("No archives found to validate")]
    NothingToValidate,

    #[error("{failed} of {total} archives failed validation")]
    ValidationFailed { failed: usize, total: usize },
}
