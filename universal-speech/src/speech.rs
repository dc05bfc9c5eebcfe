//! High-level speech and braille interface

use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::backend::SpeechBackend;
use crate::engine::EngineInfo;
use crate::error::{Result, SpeechError};
use crate::params::{self, Capability, Prosody};

/// Entry point to UniversalSpeech.
///
/// Every call goes straight to the native library and blocks until it
/// returns. Nothing is cached: capabilities and engine lists are read again on
/// each call since the active engine can change at any time.
#[derive(Debug)]
pub struct UniversalSpeech<B> {
    backend: B,
    native_speech: bool,
}

#[cfg(windows)]
impl UniversalSpeech<crate::dll::UniversalSpeechDll> {
    /// Load UniversalSpeech.dll from the default location (see [`Loader::new`](crate::Loader::new))
    pub fn new() -> Result<Self> {
        Self::from_loader(&crate::Loader::new())
    }

    pub fn from_loader(loader: &crate::Loader) -> Result<Self> {
        Ok(Self::with_backend(loader.load()?))
    }
}

impl<B: SpeechBackend> UniversalSpeech<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            native_speech: true,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Speak `text`, cutting off the current utterance first if `interrupt` is set
    pub fn say(&self, text: &str, interrupt: bool) {
        let ret = self.backend.say(text, interrupt);
        if ret == 0 {
            debug!("speechSay returned 0 ({} chars)", text.len());
        }
    }

    /// Speak only the first letter of `text`
    pub fn say_first_letter(&self, text: &str, interrupt: bool) {
        let Some(letter) = text.graphemes(true).next() else {
            return;
        };

        let ret = if letter.is_ascii() {
            self.backend.say_a(letter, interrupt)
        } else {
            self.backend.say(letter, interrupt)
        };
        if ret == 0 {
            debug!("first letter {:?} was not spoken", letter);
        }
    }

    /// Show `text` on the braille display
    pub fn braille(&self, text: &str) -> Result<()> {
        if self.backend.braille(text) == 0 {
            return Err(SpeechError::Unsupported(Capability::Braille));
        }
        Ok(())
    }

    /// Speak `text` and show it in braille
    pub fn speech(&self, text: &str) -> Result<()> {
        self.say(text, true);
        self.braille(text)
    }

    /// Speak the first letter of `text` and show the whole text in braille
    pub fn speech_first_letter(&self, text: &str) -> Result<()> {
        self.say_first_letter(text, true);
        self.braille(text)
    }

    pub fn stop(&self) {
        if self.backend.stop() == 0 {
            debug!("speechStop returned 0");
        }
    }

    /// Whether the active engine provides `capability`.
    ///
    /// Braille has no flag and is always reported as available; an engine
    /// without it makes [`braille`](Self::braille) fail instead.
    pub fn has_capability(&self, capability: Capability) -> bool {
        match capability.flag() {
            Some(flag) => self.backend.get_value(flag) != 0,
            None => true,
        }
    }

    pub fn rate_supported(&self) -> bool {
        self.has_capability(Capability::Rate)
    }

    pub fn volume_supported(&self) -> bool {
        self.has_capability(Capability::Volume)
    }

    pub fn pitch_supported(&self) -> bool {
        self.has_capability(Capability::Pitch)
    }

    pub fn inflexion_supported(&self) -> bool {
        self.has_capability(Capability::Inflexion)
    }

    fn require(&self, capability: Capability) -> Result<()> {
        if self.has_capability(capability) {
            Ok(())
        } else {
            Err(SpeechError::Unsupported(capability))
        }
    }

    fn require_param(&self, what: i32) -> Result<()> {
        match Capability::for_param(what) {
            Some(capability) => self.require(capability),
            None => Ok(()),
        }
    }

    /// Read a numeric parameter (see [`params`])
    pub fn get_value(&self, what: i32) -> Result<i32> {
        self.require_param(what)?;
        Ok(self.backend.get_value(what))
    }

    /// Write a numeric parameter (see [`params`])
    pub fn set_value(&self, what: i32, value: i32) -> Result<()> {
        self.require_param(what)?;
        self.write(what, value);
        Ok(())
    }

    fn write(&self, what: i32, value: i32) {
        if self.backend.set_value(what, value) == 0 {
            debug!("speechSetValue({:#x}, {}) returned 0", what, value);
        }
    }

    /// Read a string parameter such as `ENGINE + n` or `VOICE + n`
    pub fn get_string(&self, what: i32) -> Result<String> {
        self.backend
            .get_string(what)
            .ok_or(SpeechError::UnsupportedString(what))
    }

    /// Allow or forbid the native fallback engines (SAPI).
    ///
    /// When forbidden and no screen reader is running, speech is dropped
    /// silently rather than failing.
    pub fn enable_native_speech(&mut self, enabled: bool) {
        self.write(params::ENABLE_NATIVE_SPEECH, enabled as i32);
        self.native_speech = enabled;
    }

    pub fn native_speech_enabled(&self) -> bool {
        self.native_speech
    }

    /// Name of the engine currently servicing requests
    pub fn engine_used(&self) -> Result<String> {
        let id = self.backend.get_value(params::ENGINE);
        if id < 0 {
            return Err(SpeechError::UnsupportedString(params::ENGINE));
        }
        self.get_string(params::ENGINE + id)
    }

    /// All engines UniversalSpeech knows about, in native order
    pub fn get_engines(&self) -> Vec<EngineInfo> {
        self.names(params::ENGINE)
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let id = i as i32;
                EngineInfo {
                    name,
                    available: self.backend.get_value(params::ENGINE_AVAILABLE + id) != 0,
                    id,
                }
            })
            .collect()
    }

    /// Select an engine by id, as listed by [`get_engines`](Self::get_engines)
    pub fn set_engine(&self, id: i32) {
        self.write(params::ENGINE, id);
    }

    /// Let UniversalSpeech pick the engine itself
    pub fn set_auto_engine(&self, enabled: bool) {
        self.write(params::AUTO_ENGINE, enabled as i32);
    }

    pub fn get_voices(&self) -> Vec<String> {
        self.names(params::VOICE)
    }

    pub fn set_voice(&self, index: i32) {
        self.write(params::VOICE, index);
    }

    pub fn get_languages(&self) -> Vec<String> {
        self.names(params::LANGUAGE)
    }

    pub fn set_language(&self, index: i32) {
        self.write(params::LANGUAGE, index);
    }

    pub fn get_subengines(&self) -> Vec<String> {
        self.names(params::SUBENGINE)
    }

    pub fn set_subengine(&self, index: i32) {
        self.write(params::SUBENGINE, index);
    }

    // Indexed string tables end at the first missing or empty name, and never
    // run into the next table.
    fn names(&self, base: i32) -> Vec<String> {
        (0..params::TABLE_SIZE)
            .map_while(|i| {
                self.backend
                    .get_string(base + i)
                    .filter(|name| !name.is_empty())
            })
            .collect()
    }

    /// Set a prosody parameter, optionally setting its allowed range first
    pub fn set_prosody(
        &self,
        prosody: Prosody,
        value: i32,
        min: Option<i32>,
        max: Option<i32>,
    ) -> Result<()> {
        self.require(prosody.capability())?;

        if let Some(min) = min {
            self.write(prosody.min(), min);
        }
        if let Some(max) = max {
            self.write(prosody.max(), max);
        }
        self.write(prosody.value(), value);
        Ok(())
    }

    pub fn prosody(&self, prosody: Prosody) -> Result<i32> {
        self.require(prosody.capability())?;
        Ok(self.backend.get_value(prosody.value()))
    }

    /// Allowed `(min, max)` range of a prosody parameter
    pub fn range(&self, prosody: Prosody) -> Result<(i32, i32)> {
        self.require(prosody.capability())?;
        Ok((
            self.backend.get_value(prosody.min()),
            self.backend.get_value(prosody.max()),
        ))
    }

    pub fn set_rate(&self, value: i32, min: Option<i32>, max: Option<i32>) -> Result<()> {
        self.set_prosody(Prosody::Rate, value, min, max)
    }

    pub fn set_volume(&self, value: i32, min: Option<i32>, max: Option<i32>) -> Result<()> {
        self.set_prosody(Prosody::Volume, value, min, max)
    }

    pub fn set_pitch(&self, value: i32, min: Option<i32>, max: Option<i32>) -> Result<()> {
        self.set_prosody(Prosody::Pitch, value, min, max)
    }

    pub fn set_inflexion(&self, value: i32, min: Option<i32>, max: Option<i32>) -> Result<()> {
        self.set_prosody(Prosody::Inflexion, value, min, max)
    }

    pub fn rate(&self) -> Result<i32> {
        self.prosody(Prosody::Rate)
    }

    pub fn volume(&self) -> Result<i32> {
        self.prosody(Prosody::Volume)
    }

    pub fn pitch(&self) -> Result<i32> {
        self.prosody(Prosody::Pitch)
    }

    pub fn inflexion(&self) -> Result<i32> {
        self.prosody(Prosody::Inflexion)
    }

    pub fn set_paused(&self, paused: bool) -> Result<()> {
        self.set_value(params::PAUSED, paused as i32)
    }

    pub fn is_paused(&self) -> Result<bool> {
        Ok(self.get_value(params::PAUSED)? != 0)
    }

    pub fn is_busy(&self) -> Result<bool> {
        Ok(self.get_value(params::BUSY)? != 0)
    }

    /// Block until the current utterance is finished
    pub fn wait(&self) -> Result<()> {
        self.get_value(params::WAIT).map(|_| ())
    }
}
