//! UniversalSpeech.dll bound at runtime
//!
//! The entry points are plain cdecl exports taking NUL-terminated strings
//! (UTF-16 for the wide variants).

#![cfg(windows)]

use std::ffi::{c_char, OsStr};
use std::iter;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use tracing::info;
use windows::core::{s, PCSTR, PCWSTR};
use windows::Win32::Foundation::{HANDLE, HMODULE};
use windows::Win32::System::LibraryLoader::{
    GetProcAddress, LoadLibraryExW, LOAD_WITH_ALTERED_SEARCH_PATH,
};

use crate::backend::SpeechBackend;
use crate::error::{Result, SpeechError};

type SayFn = unsafe extern "C" fn(text: *const u16, interrupt: i32) -> i32;
type SayAFn = unsafe extern "C" fn(text: *const c_char, interrupt: i32) -> i32;
type BrailleFn = unsafe extern "C" fn(text: *const u16) -> i32;
type StopFn = unsafe extern "C" fn() -> i32;
type GetValueFn = unsafe extern "C" fn(what: i32) -> i32;
type SetValueFn = unsafe extern "C" fn(what: i32, value: i32) -> i32;
type GetStringFn = unsafe extern "C" fn(what: i32) -> *const u16;

/// Entry points of a loaded UniversalSpeech.dll.
///
/// The module is never unloaded: the pointers stay valid until the process exits.
#[derive(Debug, Clone, Copy)]
pub struct UniversalSpeechDll {
    say: SayFn,
    say_a: SayAFn,
    braille: BrailleFn,
    stop: StopFn,
    get_value: GetValueFn,
    set_value: SetValueFn,
    get_string: GetStringFn,
}

macro_rules! bind {
    ($module:expr, $name:literal) => {
        symbol($module, s!($name), $name)
    };
}

unsafe fn symbol<F: Copy>(module: HMODULE, name: PCSTR, label: &'static str) -> Result<F> {
    let proc = unsafe { GetProcAddress(module, name) }.ok_or(SpeechError::MissingSymbol(label))?;
    debug_assert_eq!(std::mem::size_of_val(&proc), std::mem::size_of::<F>());
    Ok(unsafe { std::mem::transmute_copy(&proc) })
}

impl UniversalSpeechDll {
    /// Load the dll at `path` and bind every entry point.
    ///
    /// Dependencies are searched for in the dll's own folder first, so the
    /// screen reader client libraries next to it are found without touching
    /// the process-wide search path.
    pub fn open(path: &Path) -> Result<Self> {
        let load_failed = |e: windows::core::Error| SpeechError::LoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        unsafe {
            let file = wide_os(path.as_os_str());
            let module = LoadLibraryExW(
                PCWSTR::from_raw(file.as_ptr()),
                HANDLE::default(),
                LOAD_WITH_ALTERED_SEARCH_PATH,
            )
            .map_err(load_failed)?;

            let dll = Self {
                say: bind!(module, "speechSay")?,
                say_a: bind!(module, "speechSayA")?,
                braille: bind!(module, "brailleDisplay")?,
                stop: bind!(module, "speechStop")?,
                get_value: bind!(module, "speechGetValue")?,
                set_value: bind!(module, "speechSetValue")?,
                get_string: bind!(module, "speechGetString")?,
            };

            info!("loaded {}", path.display());
            Ok(dll)
        }
    }
}

/// NUL-terminated UTF-16, cut at the first embedded NUL
fn wide(text: &str) -> Vec<u16> {
    text.encode_utf16()
        .take_while(|&c| c != 0)
        .chain(iter::once(0))
        .collect()
}

fn wide_os(os: &OsStr) -> Vec<u16> {
    os.encode_wide().chain(iter::once(0)).collect()
}

/// NUL-terminated single-byte string; non-ASCII characters become '?'
fn narrow(text: &str) -> Vec<c_char> {
    text.chars()
        .take_while(|&c| c != '\0')
        .map(|c| if c.is_ascii() { c as c_char } else { b'?' as c_char })
        .chain(iter::once(0))
        .collect()
}

impl SpeechBackend for UniversalSpeechDll {
    fn say(&self, text: &str, interrupt: bool) -> i32 {
        let text = wide(text);
        unsafe { (self.say)(text.as_ptr(), interrupt as i32) }
    }

    fn say_a(&self, text: &str, interrupt: bool) -> i32 {
        let text = narrow(text);
        unsafe { (self.say_a)(text.as_ptr(), interrupt as i32) }
    }

    fn braille(&self, text: &str) -> i32 {
        let text = wide(text);
        unsafe { (self.braille)(text.as_ptr()) }
    }

    fn stop(&self) -> i32 {
        unsafe { (self.stop)() }
    }

    fn get_value(&self, what: i32) -> i32 {
        unsafe { (self.get_value)(what) }
    }

    fn set_value(&self, what: i32, value: i32) -> i32 {
        unsafe { (self.set_value)(what, value) }
    }

    fn get_string(&self, what: i32) -> Option<String> {
        unsafe {
            let ptr = (self.get_string)(what);
            if ptr.is_null() {
                None
            } else {
                Some(String::from_utf16_lossy(PCWSTR::from_raw(ptr).as_wide()))
            }
        }
    }
}
