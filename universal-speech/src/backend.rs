//! The native call interface
//!
//! One method per UniversalSpeech entry point. Return codes are passed back
//! untouched; interpreting them is left to [`UniversalSpeech`](crate::UniversalSpeech).

pub trait SpeechBackend {
    /// `speechSay`
    fn say(&self, text: &str, interrupt: bool) -> i32;

    /// `speechSayA`, the single-byte string variant
    fn say_a(&self, text: &str, interrupt: bool) -> i32;

    /// `brailleDisplay`
    fn braille(&self, text: &str) -> i32;

    /// `speechStop`
    fn stop(&self) -> i32;

    /// `speechGetValue`
    fn get_value(&self, what: i32) -> i32;

    /// `speechSetValue`
    fn set_value(&self, what: i32, value: i32) -> i32;

    /// `speechGetString`; a NULL result is `None`
    fn get_string(&self, what: i32) -> Option<String>;
}

impl<B: SpeechBackend + ?Sized> SpeechBackend for &B {
    fn say(&self, text: &str, interrupt: bool) -> i32 {
        (**self).say(text, interrupt)
    }

    fn say_a(&self, text: &str, interrupt: bool) -> i32 {
        (**self).say_a(text, interrupt)
    }

    fn braille(&self, text: &str) -> i32 {
        (**self).braille(text)
    }

    fn stop(&self) -> i32 {
        (**self).stop()
    }

    fn get_value(&self, what: i32) -> i32 {
        (**self).get_value(what)
    }

    fn set_value(&self, what: i32, value: i32) -> i32 {
        (**self).set_value(what, value)
    }

    fn get_string(&self, what: i32) -> Option<String> {
        (**self).get_string(what)
    }
}

impl<B: SpeechBackend + ?Sized> SpeechBackend for Box<B> {
    fn say(&self, text: &str, interrupt: bool) -> i32 {
        (**self).say(text, interrupt)
    }

    fn say_a(&self, text: &str, interrupt: bool) -> i32 {
        (**self).say_a(text, interrupt)
    }

    fn braille(&self, text: &str) -> i32 {
        (**self).braille(text)
    }

    fn stop(&self) -> i32 {
        (**self).stop()
    }

    fn get_value(&self, what: i32) -> i32 {
        (**self).get_value(what)
    }

    fn set_value(&self, what: i32, value: i32) -> i32 {
        (**self).set_value(what, value)
    }

    fn get_string(&self, what: i32) -> Option<String> {
        (**self).get_string(what)
    }
}
