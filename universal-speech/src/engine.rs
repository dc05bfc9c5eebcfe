use serde::Serialize;

/// An engine UniversalSpeech knows about (screen reader, SAPI, braille driver)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineInfo {
    pub name: String,
    /// Whether the engine is running and can take requests right now
    pub available: bool,
    /// Index passed back to UniversalSpeech as `ENGINE + id`
    pub id: i32,
}
