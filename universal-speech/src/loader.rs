//! Locating and loading UniversalSpeech.dll
//!
//! The library ships as a set of dlls (UniversalSpeech itself plus the client
//! libraries of the screen readers it drives) in a `lib` folder for 32-bit
//! hosts and a `lib64` folder for 64-bit hosts.

use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, SpeechError};

/// Environment variable overriding the folder that holds `lib`/`lib64`
pub const LIB_DIR_ENV: &str = "UNIVERSAL_SPEECH_DIR";

pub const LIBRARY_NAME: &str = "UniversalSpeech.dll";

/// Files that must sit together in the architecture folder
pub const REQUIRED_FILES: [&str; 6] = [
    "dolapi.dll",
    "jfwapi.dll",
    "nvdaControllerClient.dll",
    "SAAPI32.dll",
    LIBRARY_NAME,
    "UniversalSpeech.tlb",
];

/// Architecture folder matching the pointer width of this process
pub fn arch_folder() -> &'static str {
    if cfg!(target_pointer_width = "64") {
        "lib64"
    } else {
        "lib"
    }
}

#[derive(Debug, Clone)]
pub struct Loader {
    base_dir: PathBuf,
}

impl Loader {
    /// Loader rooted at `UNIVERSAL_SPEECH_DIR` if set, else next to the running executable
    pub fn new() -> Self {
        Self::from_env().unwrap_or_else(|| Self::with_dir(exe_dir()))
    }

    /// Loader rooted at `UNIVERSAL_SPEECH_DIR`, if the variable is set
    pub fn from_env() -> Option<Self> {
        env::var_os(LIB_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(|dir| Self::with_dir(PathBuf::from(dir)))
    }

    /// Loader rooted at `dir`, which must contain the `lib`/`lib64` folders
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Folder the dlls are expected in for this architecture
    pub fn lib_dir(&self) -> PathBuf {
        self.base_dir.join(arch_folder())
    }

    /// Required files absent from the architecture folder
    pub fn missing_files(&self) -> Result<Vec<&'static str>> {
        let lib_dir = self.lib_dir();
        if !lib_dir.is_dir() {
            return Err(SpeechError::LibraryFolderMissing(lib_dir));
        }

        Ok(REQUIRED_FILES
            .iter()
            .copied()
            .filter(|file| !lib_dir.join(file).is_file())
            .collect())
    }

    /// Check that every required file is present.
    /// Returns the path of UniversalSpeech.dll.
    pub fn check(&self) -> Result<PathBuf> {
        let lib_dir = self.lib_dir();
        debug!("checking UniversalSpeech files in {}", lib_dir.display());

        let missing = self.missing_files().inspect_err(|e| warn!("{e}"))?;
        if !missing.is_empty() {
            let err = SpeechError::MissingFiles {
                dir: lib_dir,
                files: missing.into_iter().map(String::from).collect(),
            };
            warn!("{err}");
            return Err(err);
        }

        Ok(lib_dir.join(LIBRARY_NAME))
    }

    /// Check the files, then load UniversalSpeech.dll and bind its entry points
    #[cfg(windows)]
    pub fn load(&self) -> Result<crate::dll::UniversalSpeechDll> {
        let path = self.check()?;
        crate::dll::UniversalSpeechDll::open(&path)
    }

    /// UniversalSpeech only exists as a Windows dll
    #[cfg(not(windows))]
    pub fn load(&self) -> Result<std::convert::Infallible> {
        self.check()?;
        Err(SpeechError::UnsupportedPlatform)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn exe_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
