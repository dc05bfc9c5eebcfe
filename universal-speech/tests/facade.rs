use std::cell::RefCell;
use std::collections::HashMap;

use universal_speech::params::*;
use universal_speech::{Capability, Prosody, SpeechBackend, SpeechError, UniversalSpeech};

/// An engine as UniversalSpeech would report it
#[derive(Clone)]
struct FakeEngine {
    name: &'static str,
    available: bool,
    braille: bool,
    supported: Vec<Capability>,
    voices: Vec<&'static str>,
}

fn sapi5() -> FakeEngine {
    FakeEngine {
        name: "SAPI5",
        available: true,
        braille: false,
        supported: vec![
            Capability::Volume,
            Capability::Rate,
            Capability::Pitch,
            Capability::Inflexion,
            Capability::Busy,
            Capability::Wait,
        ],
        voices: vec!["Microsoft David", "Microsoft Zira"],
    }
}

fn nvda(available: bool) -> FakeEngine {
    FakeEngine {
        name: "NVDA",
        available,
        braille: false,
        supported: vec![],
        voices: vec![],
    }
}

fn jaws(available: bool) -> FakeEngine {
    FakeEngine {
        name: "Jaws",
        available,
        braille: true,
        supported: vec![],
        voices: vec![],
    }
}

#[derive(Default)]
struct State {
    active: usize,
    native_speech: bool,
    values: HashMap<i32, i32>,
    spoken: Vec<(String, bool)>,
    spoken_a: Vec<(String, bool)>,
    brailled: Vec<String>,
    writes: Vec<(i32, i32)>,
    reads: Vec<i32>,
    stops: usize,
}

/// In-memory stand-in for UniversalSpeech.dll.
///
/// The first available engine is active; when only SAPI5 is left it is used
/// only if native speech is enabled.
struct FakeSpeech {
    engines: Vec<FakeEngine>,
    state: RefCell<State>,
}

impl FakeSpeech {
    fn new(engines: Vec<FakeEngine>) -> Self {
        let active = engines.iter().position(|e| e.available).unwrap_or(0);
        Self {
            engines,
            state: RefCell::new(State {
                active,
                native_speech: true,
                ..Default::default()
            }),
        }
    }

    fn active(&self) -> Option<&FakeEngine> {
        let state = self.state.borrow();
        let engine = self.engines.get(state.active)?;
        if !engine.available || (engine.name == "SAPI5" && !state.native_speech) {
            return None;
        }
        Some(engine)
    }

    fn spoken(&self) -> Vec<(String, bool)> {
        self.state.borrow().spoken.clone()
    }

    fn spoken_a(&self) -> Vec<(String, bool)> {
        self.state.borrow().spoken_a.clone()
    }

    fn brailled(&self) -> Vec<String> {
        self.state.borrow().brailled.clone()
    }

    fn writes(&self) -> Vec<(i32, i32)> {
        self.state.borrow().writes.clone()
    }

    fn reads(&self) -> Vec<i32> {
        self.state.borrow().reads.clone()
    }
}

impl SpeechBackend for FakeSpeech {
    fn say(&self, text: &str, interrupt: bool) -> i32 {
        if self.active().is_none() {
            return 0;
        }
        self.state.borrow_mut().spoken.push((text.to_string(), interrupt));
        1
    }

    fn say_a(&self, text: &str, interrupt: bool) -> i32 {
        if self.active().is_none() {
            return 0;
        }
        self.state.borrow_mut().spoken_a.push((text.to_string(), interrupt));
        1
    }

    fn braille(&self, text: &str) -> i32 {
        match self.active() {
            Some(engine) if engine.braille => {
                self.state.borrow_mut().brailled.push(text.to_string());
                1
            }
            _ => 0,
        }
    }

    fn stop(&self) -> i32 {
        self.state.borrow_mut().stops += 1;
        1
    }

    fn get_value(&self, what: i32) -> i32 {
        self.state.borrow_mut().reads.push(what);

        if what == ENGINE {
            return self.state.borrow().active as i32;
        }
        if (ENGINE_AVAILABLE..ENGINE_AVAILABLE + TABLE_SIZE).contains(&what) {
            let index = (what - ENGINE_AVAILABLE) as usize;
            return self.engines.get(index).map_or(0, |e| e.available as i32);
        }

        let supported = |cap: Capability| {
            self.active()
                .is_some_and(|engine| engine.supported.contains(&cap)) as i32
        };
        match what {
            VOLUME_SUPPORTED => supported(Capability::Volume),
            RATE_SUPPORTED => supported(Capability::Rate),
            PITCH_SUPPORTED => supported(Capability::Pitch),
            INFLEXION_SUPPORTED => supported(Capability::Inflexion),
            PAUSE_SUPPORTED => supported(Capability::Pause),
            BUSY_SUPPORTED => supported(Capability::Busy),
            WAIT_SUPPORTED => supported(Capability::Wait),
            _ => self.state.borrow().values.get(&what).copied().unwrap_or(0),
        }
    }

    fn set_value(&self, what: i32, value: i32) -> i32 {
        let mut state = self.state.borrow_mut();
        state.writes.push((what, value));
        match what {
            ENABLE_NATIVE_SPEECH => state.native_speech = value != 0,
            ENGINE => {
                if value < 0 || value as usize >= self.engines.len() {
                    return 0;
                }
                state.active = value as usize;
            }
            _ => {
                state.values.insert(what, value);
            }
        }
        1
    }

    fn get_string(&self, what: i32) -> Option<String> {
        if (ENGINE..ENGINE + TABLE_SIZE).contains(&what) {
            let index = (what - ENGINE) as usize;
            return self.engines.get(index).map(|e| e.name.to_string());
        }
        if (VOICE..VOICE + TABLE_SIZE).contains(&what) {
            let index = (what - VOICE) as usize;
            let engine = self.active()?;
            return engine.voices.get(index).map(|v| v.to_string());
        }
        None
    }
}

fn sapi_only() -> FakeSpeech {
    FakeSpeech::new(vec![nvda(false), jaws(false), sapi5()])
}

fn nvda_running() -> FakeSpeech {
    FakeSpeech::new(vec![nvda(true), jaws(false), sapi5()])
}

#[test]
fn test_sapi_rate_round_trip() {
    let fake = sapi_only();
    let speech = UniversalSpeech::with_backend(&fake);

    assert_eq!(speech.engine_used().unwrap(), "SAPI5");
    assert!(speech.rate_supported());

    speech.set_rate(150, None, None).unwrap();
    assert_eq!(speech.get_value(RATE).unwrap(), 150);
    assert_eq!(speech.rate().unwrap(), 150);
}

#[test]
fn test_nvda_without_braille() {
    let fake = nvda_running();
    let speech = UniversalSpeech::with_backend(&fake);

    assert_eq!(speech.engine_used().unwrap(), "NVDA");

    let err = speech.braille("test").unwrap_err();
    assert!(matches!(err, SpeechError::Unsupported(Capability::Braille)));
    assert!(err.is_unsupported());

    speech.say("test", true);
    assert_eq!(fake.spoken(), vec![("test".to_string(), true)]);
}

#[test]
fn test_speech_runs_both_paths_even_without_braille() {
    let fake = nvda_running();
    let speech = UniversalSpeech::with_backend(&fake);

    let err = speech.speech("Hello").unwrap_err();
    assert!(err.is_unsupported());
    assert_eq!(fake.spoken(), vec![("Hello".to_string(), true)]);
    assert!(fake.brailled().is_empty());
}

#[test]
fn test_speech_with_braille_engine() {
    let fake = FakeSpeech::new(vec![nvda(false), jaws(true), sapi5()]);
    let speech = UniversalSpeech::with_backend(&fake);

    speech.speech("Hello").unwrap();
    assert_eq!(fake.spoken(), vec![("Hello".to_string(), true)]);
    assert_eq!(fake.brailled(), vec!["Hello".to_string()]);
}

#[test]
fn test_speech_first_letter() {
    let fake = FakeSpeech::new(vec![jaws(true)]);
    let speech = UniversalSpeech::with_backend(&fake);

    speech.speech_first_letter("Hello").unwrap();
    assert_eq!(fake.spoken_a(), vec![("H".to_string(), true)]);
    assert!(fake.spoken().is_empty());
    assert_eq!(fake.brailled(), vec!["Hello".to_string()]);
}

#[test]
fn test_speech_first_letter_without_braille() {
    let fake = nvda_running();
    let speech = UniversalSpeech::with_backend(&fake);

    let err = speech.speech_first_letter("Hello").unwrap_err();
    assert!(matches!(err, SpeechError::Unsupported(Capability::Braille)));
    assert_eq!(fake.spoken_a(), vec![("H".to_string(), true)]);
    assert!(fake.spoken().is_empty());
    assert!(fake.brailled().is_empty());
}

#[test]
fn test_say_first_letter_takes_a_whole_grapheme() {
    let fake = sapi_only();
    let speech = UniversalSpeech::with_backend(&fake);

    speech.say_first_letter("e\u{301}te", false);
    speech.say_first_letter("", true);

    assert_eq!(fake.spoken(), vec![("e\u{301}".to_string(), false)]);
    assert!(fake.spoken_a().is_empty());
}

#[test]
fn test_unsupported_params_are_rejected_before_the_native_call() {
    let fake = nvda_running();
    let speech = UniversalSpeech::with_backend(&fake);

    for prosody in Prosody::ALL {
        let err = speech.set_prosody(prosody, 50, Some(0), Some(100)).unwrap_err();
        assert!(matches!(err, SpeechError::Unsupported(c) if c == prosody.capability()));

        assert!(speech.get_value(prosody.value()).unwrap_err().is_unsupported());
        assert!(speech.get_value(prosody.min()).unwrap_err().is_unsupported());
        assert!(speech.set_value(prosody.max(), 1).unwrap_err().is_unsupported());
    }
    assert!(matches!(
        speech.set_rate(150, None, None),
        Err(SpeechError::Unsupported(Capability::Rate))
    ));
    assert!(speech.set_volume(1, None, None).is_err());
    assert!(speech.set_pitch(1, None, None).is_err());
    assert!(speech.set_inflexion(1, None, None).is_err());
    assert!(speech.is_busy().unwrap_err().is_unsupported());
    assert!(speech.set_paused(true).unwrap_err().is_unsupported());

    assert!(fake.writes().is_empty());
    assert!(!fake.reads().contains(&RATE));
}

#[test]
fn test_supported_params_are_forwarded_unchanged() {
    let fake = sapi_only();
    let speech = UniversalSpeech::with_backend(&fake);

    speech.set_value(VOLUME, 73).unwrap();
    speech.set_value(PITCH_MAX, -5).unwrap();
    speech.set_value(USER_PARAM + 1, 9).unwrap();

    assert_eq!(
        fake.writes(),
        vec![(VOLUME, 73), (PITCH_MAX, -5), (USER_PARAM + 1, 9)]
    );
    assert_eq!(speech.get_value(VOLUME).unwrap(), 73);
    assert_eq!(speech.get_value(USER_PARAM + 1).unwrap(), 9);
}

#[test]
fn test_set_prosody_writes_range_then_value() {
    let fake = sapi_only();
    let speech = UniversalSpeech::with_backend(&fake);

    speech.set_pitch(10, Some(-20), Some(20)).unwrap();
    speech.set_volume(80, None, Some(100)).unwrap();
    speech.set_inflexion(3, Some(0), None).unwrap();

    assert_eq!(
        fake.writes(),
        vec![
            (PITCH_MIN, -20),
            (PITCH_MAX, 20),
            (PITCH, 10),
            (VOLUME_MAX, 100),
            (VOLUME, 80),
            (INFLEXION_MIN, 0),
            (INFLEXION, 3),
        ]
    );
    assert_eq!(speech.range(Prosody::Pitch).unwrap(), (-20, 20));
    assert_eq!(speech.pitch().unwrap(), 10);
    assert_eq!(speech.volume().unwrap(), 80);
    assert_eq!(speech.inflexion().unwrap(), 3);
}

#[test]
fn test_get_engines() {
    let fake = nvda_running();
    let speech = UniversalSpeech::with_backend(&fake);

    let engines = speech.get_engines();
    let summary: Vec<_> = engines
        .iter()
        .map(|e| (e.name.as_str(), e.available, e.id))
        .collect();
    assert_eq!(
        summary,
        vec![("NVDA", true, 0), ("Jaws", false, 1), ("SAPI5", true, 2)]
    );

    assert_eq!(speech.get_engines(), engines);
}

#[test]
fn test_engine_list_stops_at_empty_name() {
    let mut blank = jaws(true);
    blank.name = "";
    let fake = FakeSpeech::new(vec![nvda(true), blank, sapi5()]);
    let speech = UniversalSpeech::with_backend(&fake);

    assert_eq!(speech.get_engines().len(), 1);
}

#[test]
fn test_native_speech_toggle() {
    let fake = sapi_only();
    let mut speech = UniversalSpeech::with_backend(&fake);
    assert!(speech.native_speech_enabled());

    speech.enable_native_speech(false);
    assert!(!speech.native_speech_enabled());
    speech.say("dropped", true);
    assert!(fake.spoken().is_empty());

    speech.enable_native_speech(true);
    speech.say("spoken", false);
    assert_eq!(fake.spoken(), vec![("spoken".to_string(), false)]);

    assert_eq!(
        fake.writes(),
        vec![(ENABLE_NATIVE_SPEECH, 0), (ENABLE_NATIVE_SPEECH, 1)]
    );
}

#[test]
fn test_capabilities_follow_the_active_engine() {
    let fake = nvda_running();
    let speech = UniversalSpeech::with_backend(&fake);
    assert!(!speech.rate_supported());
    assert!(!speech.volume_supported());

    speech.set_engine(2);
    assert_eq!(speech.engine_used().unwrap(), "SAPI5");
    assert!(speech.rate_supported());
    assert!(speech.volume_supported());
    assert!(speech.pitch_supported());
    assert!(speech.inflexion_supported());
    assert!(!speech.has_capability(Capability::Pause));
    assert!(speech.has_capability(Capability::Braille));
}

#[test]
fn test_voices_of_the_active_engine() {
    let fake = sapi_only();
    let speech = UniversalSpeech::with_backend(&fake);

    assert_eq!(speech.get_voices(), vec!["Microsoft David", "Microsoft Zira"]);
    assert!(speech.get_languages().is_empty());
    assert!(speech.get_subengines().is_empty());

    speech.set_voice(1);
    speech.set_language(0);
    speech.set_subengine(0);
    speech.set_auto_engine(true);
    assert_eq!(
        fake.writes(),
        vec![(VOICE, 1), (LANGUAGE, 0), (SUBENGINE, 0), (AUTO_ENGINE, 1)]
    );
}

#[test]
fn test_missing_string_is_unsupported() {
    let fake = nvda_running();
    let speech = UniversalSpeech::with_backend(&fake);

    let err = speech.get_string(LANGUAGE).unwrap_err();
    assert!(matches!(err, SpeechError::UnsupportedString(LANGUAGE)));
    assert_eq!(speech.get_string(ENGINE + 1).unwrap(), "Jaws");
}

#[test]
fn test_busy_and_wait() {
    let fake = sapi_only();
    let speech = UniversalSpeech::with_backend(&fake);

    assert!(!speech.is_busy().unwrap());
    speech.wait().unwrap();
    assert!(fake.reads().contains(&WAIT));
}

#[test]
fn test_pause() {
    let mut engine = sapi5();
    engine.supported.push(Capability::Pause);
    let fake = FakeSpeech::new(vec![engine]);
    let speech = UniversalSpeech::with_backend(&fake);

    assert!(!speech.is_paused().unwrap());
    speech.set_paused(true).unwrap();
    assert!(speech.is_paused().unwrap());
    assert_eq!(fake.writes(), vec![(PAUSED, 1)]);

    let fake = sapi_only();
    let speech = UniversalSpeech::with_backend(&fake);
    let err = speech.set_paused(true).unwrap_err();
    assert!(matches!(err, SpeechError::Unsupported(Capability::Pause)));
    assert!(fake.writes().is_empty());
}

/// Backend with no active engine whose string tables never end
struct Unterminated;

impl SpeechBackend for Unterminated {
    fn say(&self, _text: &str, _interrupt: bool) -> i32 {
        0
    }

    fn say_a(&self, _text: &str, _interrupt: bool) -> i32 {
        0
    }

    fn braille(&self, _text: &str) -> i32 {
        0
    }

    fn stop(&self) -> i32 {
        0
    }

    fn get_value(&self, what: i32) -> i32 {
        if what == ENGINE { -1 } else { 0 }
    }

    fn set_value(&self, _what: i32, _value: i32) -> i32 {
        0
    }

    fn get_string(&self, what: i32) -> Option<String> {
        Some(format!("entry {}", what))
    }
}

#[test]
fn test_engine_used_without_an_engine() {
    let speech = UniversalSpeech::with_backend(Unterminated);

    let err = speech.engine_used().unwrap_err();
    assert!(matches!(err, SpeechError::UnsupportedString(ENGINE)));
}

#[test]
fn test_tables_stop_at_the_next_base() {
    let speech = UniversalSpeech::with_backend(Unterminated);

    let voices = speech.get_voices();
    assert_eq!(voices.len(), TABLE_SIZE as usize);
    assert_eq!(voices.last().unwrap(), &format!("entry {}", LANGUAGE - 1));
}

#[test]
fn test_stop() {
    let fake = sapi_only();
    let speech = UniversalSpeech::with_backend(&fake);

    speech.stop();
    speech.stop();
    assert_eq!(fake.state.borrow().stops, 2);
}

#[test]
fn test_boxed_backend() {
    let backend: Box<dyn SpeechBackend> = Box::new(sapi_only());
    let speech = UniversalSpeech::with_backend(backend);

    speech.set_rate(42, None, None).unwrap();
    assert_eq!(speech.rate().unwrap(), 42);
}
