/// Metadata-specific errors
use thiserror::Error;
use turntable_core::MetadataReadError;

/// Result type alias using `MetadataError`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// File has no content
    #[error("File is empty")]
    EmptyFile,

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}

impl MetadataError {
    /// Attach the file name for reporting to the widget
    pub fn for_file(self, file: &str) -> MetadataReadError {
        MetadataReadError {
            file: file.to_string(),
            reason: self.to_string(),
        }
    }
}
