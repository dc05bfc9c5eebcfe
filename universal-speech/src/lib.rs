//! Bindings to UniversalSpeech, a speech and braille library that drives
//! whichever screen reader is running (NVDA, JAWS, Dolphin, System Access)
//! and falls back to SAPI.
//!
//! # Example
//!
//! ```ignore
//! use universal_speech::UniversalSpeech;
//!
//! let mut speech = UniversalSpeech::new()?;
//! speech.enable_native_speech(true);
//! speech.say("Hello, world.", true);
//!
//! println!("You are using {}", speech.engine_used()?);
//! for engine in speech.get_engines() {
//!     println!("{} (available: {})", engine.name, engine.available);
//! }
//!
//! if let Err(e) = speech.set_rate(150, None, None) {
//!     println!("{}", e);
//! }
//! ```

pub mod backend;
mod engine;
mod error;
pub mod loader;
pub mod params;
mod speech;

#[cfg(windows)]
mod dll;

pub use backend::SpeechBackend;
#[cfg(windows)]
pub use dll::UniversalSpeechDll;
pub use engine::EngineInfo;
pub use error::{Result, SpeechError};
pub use loader::Loader;
pub use params::{Capability, Prosody};
pub use speech::UniversalSpeech;
