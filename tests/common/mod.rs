//! Scripted stand-in for libttfautohint
//!
//! Parses the key string the way the native library does, reads one
//! word per key, fills the out-parameters and tracks every allocation
//! and release.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::ffi::{c_char, c_int, c_void, CStr};

use ttfautohint::constants::{KEY_SEPARATOR, MAX_ARGS};
use ttfautohint::marshal::Word;
use ttfautohint::Engine;

/// Prefix the echo mode puts in front of the input font
pub const HINTED_PREFIX: &[u8] = b"hinted:";

#[derive(Debug, Clone, Copy)]
pub enum Mode {
    /// Succeed with `HINTED_PREFIX` + font bytes
    Echo,
    /// Fail with a code and a static message
    Fail { code: c_int, message: &'static [u8] },
    /// Fail but leave an allocated buffer in the out slot
    FailWithBuffer { code: c_int, message: &'static [u8] },
    /// Report success with a zero-length buffer
    Empty,
}

pub struct FakeEngine {
    mode: Mode,
    pub calls: Cell<usize>,
    pub allocated: RefCell<Vec<usize>>,
    pub released: RefCell<Vec<usize>>,
    /// Keys of the last call
    pub keys: RefCell<Vec<String>>,
    /// Raw words of the last call, by key
    pub words: RefCell<BTreeMap<String, Word>>,
    /// Byte buffers and strings of the last call, by key
    pub payloads: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl FakeEngine {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            calls: Cell::new(0),
            allocated: RefCell::new(Vec::new()),
            released: RefCell::new(Vec::new()),
            keys: RefCell::new(Vec::new()),
            words: RefCell::new(BTreeMap::new()),
            payloads: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn word(&self, key: &str) -> Option<Word> {
        self.words.borrow().get(key).copied()
    }

    pub fn payload(&self, key: &str) -> Option<Vec<u8>> {
        self.payloads.borrow().get(key).cloned()
    }

    /// Every allocation was released exactly once
    pub fn balanced(&self) -> bool {
        let mut allocated = self.allocated.borrow().clone();
        let mut released = self.released.borrow().clone();
        allocated.sort();
        released.sort();
        allocated == released
    }

    unsafe fn alloc(&self, bytes: &[u8]) -> *mut c_char {
        let p = libc::malloc(bytes.len().max(1)) as *mut u8;
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), p, bytes.len());
        self.allocated.borrow_mut().push(p as usize);
        p as *mut c_char
    }
}

impl Engine for FakeEngine {
    unsafe fn call(&self, keys: &CStr, words: &[Word; MAX_ARGS]) -> c_int {
        self.calls.set(self.calls.get() + 1);

        let keys: Vec<String> = keys
            .to_str()
            .unwrap()
            .split(KEY_SEPARATOR)
            .map(str::to_string)
            .collect();
        let by_key: BTreeMap<String, Word> =
            keys.iter().cloned().zip(words.iter().copied()).collect();

        let mut payloads = BTreeMap::new();
        for (ptr_key, len_key) in [
            ("in-buffer", "in-buffer-len"),
            ("control-buffer", "control-buffer-len"),
            ("reference-buffer", "reference-buffer-len"),
        ] {
            if let (Some(&p), Some(&n)) = (by_key.get(ptr_key), by_key.get(len_key)) {
                let bytes = std::slice::from_raw_parts(p as usize as *const u8, n as usize);
                payloads.insert(ptr_key.to_string(), bytes.to_vec());
            }
        }
        for key in [
            "reference-name",
            "default-script",
            "fallback-script",
            "x-height-snapping-exceptions",
        ] {
            if let Some(&p) = by_key.get(key) {
                let s = CStr::from_ptr(p as usize as *const c_char);
                payloads.insert(key.to_string(), s.to_bytes().to_vec());
            }
        }

        let out = by_key["out-buffer"] as usize as *mut *mut c_char;
        let out_len = by_key["out-buffer-len"] as usize as *mut usize;
        let error = by_key["error-string"] as usize as *mut *const c_char;
        let font = payloads["in-buffer"].clone();

        *self.keys.borrow_mut() = keys;
        *self.words.borrow_mut() = by_key;
        *self.payloads.borrow_mut() = payloads;

        match self.mode {
            Mode::Echo => {
                let result = [HINTED_PREFIX, &font[..]].concat();
                *out = self.alloc(&result);
                *out_len = result.len();
                0
            }
            Mode::Fail { code, message } => {
                *error = message.as_ptr() as *const c_char;
                code
            }
            Mode::FailWithBuffer { code, message } => {
                *out = self.alloc(b"partial");
                *out_len = 7;
                *error = message.as_ptr() as *const c_char;
                code
            }
            Mode::Empty => {
                *out = self.alloc(b"");
                *out_len = 0;
                0
            }
        }
    }

    unsafe fn release(&self, ptr: *mut c_void) {
        self.released.borrow_mut().push(ptr as usize);
        libc::free(ptr);
    }
}

/// Minimal sfnt header standing in for a TrueType font
pub fn font_bytes() -> Vec<u8> {
    let mut font = vec![0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    font.extend_from_slice(b"glyf loca head");
    font
}
