//! UniversalSpeech parameter identifiers
//!
//! These values are passed straight to `speechGetValue`, `speechSetValue` and
//! `speechGetString`, so they must match UniversalSpeech.h exactly.

use std::fmt;

pub const VOLUME: i32 = 0;
pub const VOLUME_MAX: i32 = 1;
pub const VOLUME_MIN: i32 = 2;
pub const VOLUME_SUPPORTED: i32 = 3;
pub const RATE: i32 = 4;
pub const RATE_MAX: i32 = 5;
pub const RATE_MIN: i32 = 6;
pub const RATE_SUPPORTED: i32 = 7;
pub const PITCH: i32 = 8;
pub const PITCH_MAX: i32 = 9;
pub const PITCH_MIN: i32 = 10;
pub const PITCH_SUPPORTED: i32 = 11;
pub const INFLEXION: i32 = 12;
pub const INFLEXION_MAX: i32 = 13;
pub const INFLEXION_MIN: i32 = 14;
pub const INFLEXION_SUPPORTED: i32 = 15;
pub const PAUSED: i32 = 16;
pub const PAUSE_SUPPORTED: i32 = 17;
pub const BUSY: i32 = 18;
pub const BUSY_SUPPORTED: i32 = 19;
pub const WAIT: i32 = 20;
pub const WAIT_SUPPORTED: i32 = 21;

pub const ENABLE_NATIVE_SPEECH: i32 = 0xFFFF;
pub const AUTO_ENGINE: i32 = 0xFFFE;

// Indexed tables: add the entry index to the base id.
pub const VOICE: i32 = 0x10000;
pub const LANGUAGE: i32 = 0x20000;
pub const SUBENGINE: i32 = 0x30000;
pub const ENGINE: i32 = 0x40000;
pub const ENGINE_AVAILABLE: i32 = 0x50000;

/// Distance between two indexed table bases
pub const TABLE_SIZE: i32 = 0x10000;

/// First id available for engine specific parameters
pub const USER_PARAM: i32 = 0x1000000;

/// A feature the active engine may or may not provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Braille,
    Volume,
    Rate,
    Pitch,
    Inflexion,
    Pause,
    Busy,
    Wait,
}

impl Capability {
    /// Id of the native flag reporting this capability.
    /// Braille has none: it is only known once a braille call fails.
    pub fn flag(self) -> Option<i32> {
        match self {
            Capability::Braille => None,
            Capability::Volume => Some(VOLUME_SUPPORTED),
            Capability::Rate => Some(RATE_SUPPORTED),
            Capability::Pitch => Some(PITCH_SUPPORTED),
            Capability::Inflexion => Some(INFLEXION_SUPPORTED),
            Capability::Pause => Some(PAUSE_SUPPORTED),
            Capability::Busy => Some(BUSY_SUPPORTED),
            Capability::Wait => Some(WAIT_SUPPORTED),
        }
    }

    /// Capability gating a numeric parameter, if any.
    ///
    /// The `*_SUPPORTED` flags themselves and the indexed tables are never gated.
    pub fn for_param(param: i32) -> Option<Capability> {
        match param {
            VOLUME | VOLUME_MAX | VOLUME_MIN => Some(Capability::Volume),
            RATE | RATE_MAX | RATE_MIN => Some(Capability::Rate),
            PITCH | PITCH_MAX | PITCH_MIN => Some(Capability::Pitch),
            INFLEXION | INFLEXION_MAX | INFLEXION_MIN => Some(Capability::Inflexion),
            PAUSED => Some(Capability::Pause),
            BUSY => Some(Capability::Busy),
            WAIT => Some(Capability::Wait),
            _ => None,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Braille => "braille",
            Capability::Volume => "volume",
            Capability::Rate => "rate",
            Capability::Pitch => "pitch",
            Capability::Inflexion => "inflexion",
            Capability::Pause => "pause",
            Capability::Busy => "busy",
            Capability::Wait => "wait",
        };
        f.pad(name)
    }
}

/// Prosody parameters that come with a value, a range and a support flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prosody {
    Volume,
    Rate,
    Pitch,
    Inflexion,
}

impl Prosody {
    pub const ALL: [Prosody; 4] = [
        Prosody::Volume,
        Prosody::Rate,
        Prosody::Pitch,
        Prosody::Inflexion,
    ];

    pub fn value(self) -> i32 {
        self.base()
    }

    pub fn max(self) -> i32 {
        self.base() + 1
    }

    pub fn min(self) -> i32 {
        self.base() + 2
    }

    pub fn supported(self) -> i32 {
        self.base() + 3
    }

    pub fn capability(self) -> Capability {
        match self {
            Prosody::Volume => Capability::Volume,
            Prosody::Rate => Capability::Rate,
            Prosody::Pitch => Capability::Pitch,
            Prosody::Inflexion => Capability::Inflexion,
        }
    }

    fn base(self) -> i32 {
        match self {
            Prosody::Volume => VOLUME,
            Prosody::Rate => RATE,
            Prosody::Pitch => PITCH,
            Prosody::Inflexion => INFLEXION,
        }
    }
}

impl fmt::Display for Prosody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.capability(), f)
    }
}

/// Parse a parameter given either by name (`rate`, `engine_available+2`)
/// or as a number (`7`, `0x40000`)
pub fn parse_param(input: &str) -> Option<i32> {
    let input = input.trim();
    let (name, index) = match input.split_once('+') {
        Some((name, index)) => (name.trim(), Some(parse_number(index.trim())?)),
        None => (input, None),
    };

    let base = match name.to_ascii_lowercase().as_str() {
        "volume" => VOLUME,
        "volume_max" => VOLUME_MAX,
        "volume_min" => VOLUME_MIN,
        "volume_supported" => VOLUME_SUPPORTED,
        "rate" => RATE,
        "rate_max" => RATE_MAX,
        "rate_min" => RATE_MIN,
        "rate_supported" => RATE_SUPPORTED,
        "pitch" => PITCH,
        "pitch_max" => PITCH_MAX,
        "pitch_min" => PITCH_MIN,
        "pitch_supported" => PITCH_SUPPORTED,
        "inflexion" => INFLEXION,
        "inflexion_max" => INFLEXION_MAX,
        "inflexion_min" => INFLEXION_MIN,
        "inflexion_supported" => INFLEXION_SUPPORTED,
        "paused" => PAUSED,
        "pause_supported" => PAUSE_SUPPORTED,
        "busy" => BUSY,
        "busy_supported" => BUSY_SUPPORTED,
        "wait" => WAIT,
        "wait_supported" => WAIT_SUPPORTED,
        "enable_native_speech" => ENABLE_NATIVE_SPEECH,
        "auto_engine" => AUTO_ENGINE,
        "voice" => VOICE,
        "language" => LANGUAGE,
        "subengine" => SUBENGINE,
        "engine" => ENGINE,
        "engine_available" => ENGINE_AVAILABLE,
        "user_param" => USER_PARAM,
        _ => parse_number(name)?,
    };

    match index {
        Some(index) => base.checked_add(index),
        None => Some(base),
    }
}

fn parse_number(s: &str) -> Option<i32> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => i32::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}
