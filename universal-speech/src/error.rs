use std::path::PathBuf;

use crate::params::Capability;

/// Error types for UniversalSpeech operations
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("UniversalSpeech library folder not found: {}", .0.display())]
    LibraryFolderMissing(PathBuf),
    #[error("Missing dll files in {}: {}", .dir.display(), .files.join(", "))]
    MissingFiles { dir: PathBuf, files: Vec<String> },
    #[error("Failed to load {}: {reason}", .path.display())]
    LoadFailed { path: PathBuf, reason: String },
    #[error("UniversalSpeech does not export {0}")]
    MissingSymbol(&'static str),
    #[error("UniversalSpeech is not available on this platform")]
    UnsupportedPlatform,
    #[error("{0} is not supported with the current engine")]
    Unsupported(Capability),
    #[error("String parameter {0:#x} is not available with the current engine")]
    UnsupportedString(i32),
}

impl SpeechError {
    /// The native library (or one of its companion dlls) could not be found or loaded.
    /// Constructing again only helps once the deployment is fixed.
    pub fn is_missing_dependency(&self) -> bool {
        matches!(
            self,
            SpeechError::LibraryFolderMissing(_)
                | SpeechError::MissingFiles { .. }
                | SpeechError::LoadFailed { .. }
                | SpeechError::MissingSymbol(_)
                | SpeechError::UnsupportedPlatform
        )
    }

    /// The active engine lacks the requested feature.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            SpeechError::Unsupported(_) | SpeechError::UnsupportedString(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SpeechError>;
