//! Argument marshalling
//!
//! Builds the `(key, value)` list for `TTF_autohint`. The native side
//! walks the key string and pulls one variadic value per key, so keys
//! and values are kept as one sorted list and only split at the call.
//!
//! Optional features are enabled by key presence; unset values are left
//! out of the list entirely.

use std::ffi::{c_char, c_int, c_uint, c_void, CStr, CString};
use std::marker::PhantomData;
use std::ptr;

use log::debug;

use crate::constants::*;
use crate::error::{Error, Result};
use crate::options::{native_key, Options};
use crate::resolve::ResolvedInputs;

/// One variadic argument slot as seen by the C side
pub type Word = u64;

/// Typed value of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeValue {
    /// `int` / `FT_Bool` / `FT_Long`-sized signed value
    Int(c_int),
    /// `FT_UInt`
    UInt(c_uint),
    /// `size_t`
    Size(usize),
    /// `unsigned long long`
    ULongLong(u64),
    /// `const char*` into a buffer or C string that outlives the call
    Ptr(*const c_void),
    /// Pointer to an out-parameter slot
    Out(*mut c_void),
}

impl NativeValue {
    fn bytes(buf: &[u8]) -> Self {
        Self::Ptr(buf.as_ptr() as *const c_void)
    }

    fn text(s: &CStr) -> Self {
        Self::Ptr(s.as_ptr() as *const c_void)
    }

    fn flag(v: bool) -> Self {
        Self::Int(c_int::from(v))
    }

    /// Widen to a full variadic word
    ///
    /// Signed values are sign-extended so the callee's `va_arg(ap, int)`
    /// reads the same value from the low half.
    pub fn word(self) -> Word {
        match self {
            Self::Int(v) => v as i64 as u64,
            Self::UInt(v) => v as u64,
            Self::Size(v) => v as u64,
            Self::ULongLong(v) => v,
            Self::Ptr(p) => p as usize as u64,
            Self::Out(p) => p as usize as u64,
        }
    }
}

/// Out-parameters written by the native call
#[derive(Debug)]
pub struct OutSlots {
    /// `char*` allocated by the native library on success
    pub buffer: *mut c_char,
    pub len: usize,
    /// Message owned by the native library on failure
    pub error: *const c_char,
}

impl Default for OutSlots {
    fn default() -> Self {
        Self {
            buffer: ptr::null_mut(),
            len: 0,
            error: ptr::null(),
        }
    }
}

/// Sorted, duplicate-free argument list for one call
///
/// Borrows the resolved inputs and the out-slots, so neither can move
/// or be dropped while pointers into them are in the list.
#[derive(Debug)]
pub struct Arguments<'a> {
    entries: Vec<(String, NativeValue)>,
    _borrow: PhantomData<(&'a ResolvedInputs, &'a mut OutSlots)>,
}

impl<'a> Arguments<'a> {
    pub fn build(options: &Options, inputs: &'a ResolvedInputs, slots: &'a mut OutSlots) -> Self {
        let mut entries: Vec<(String, NativeValue)> = Vec::with_capacity(MAX_ARGS);
        let mut push = |key: &str, value: NativeValue| entries.push((key.to_string(), value));

        push(KEY_IN_BUFFER, NativeValue::bytes(&inputs.font));
        push(KEY_IN_BUFFER_LEN, NativeValue::Size(inputs.font.len()));
        if let Some(control) = &inputs.control {
            push(KEY_CONTROL_BUFFER, NativeValue::bytes(control));
            push(KEY_CONTROL_BUFFER_LEN, NativeValue::Size(control.len()));
        }
        if let Some(reference) = &inputs.reference {
            push(KEY_REFERENCE_BUFFER, NativeValue::bytes(reference));
            push(KEY_REFERENCE_BUFFER_LEN, NativeValue::Size(reference.len()));
        }

        let mut option = |name: &str, value: NativeValue| push(&native_key(name), value);

        option("reference_index", NativeValue::Int(options.reference_index));
        if let Some(name) = &inputs.reference_name {
            option("reference_name", NativeValue::text(name));
        }
        option("hinting_range_min", NativeValue::UInt(options.hinting_range_min));
        option("hinting_range_max", NativeValue::UInt(options.hinting_range_max));
        option("hinting_limit", NativeValue::UInt(options.hinting_limit));
        option("hint_composites", NativeValue::flag(options.hint_composites));
        option("adjust_subglyphs", NativeValue::flag(options.adjust_subglyphs));
        option("gray_strong_stem_width", NativeValue::flag(options.gray_strong_stem_width));
        option(
            "gdi_cleartype_strong_stem_width",
            NativeValue::flag(options.gdi_cleartype_strong_stem_width),
        );
        option(
            "dw_cleartype_strong_stem_width",
            NativeValue::flag(options.dw_cleartype_strong_stem_width),
        );
        option("increase_x_height", NativeValue::UInt(options.increase_x_height));
        option(
            "x_height_snapping_exceptions",
            NativeValue::text(&inputs.x_height_snapping_exceptions),
        );
        option("windows_compatibility", NativeValue::flag(options.windows_compatibility));
        option("default_script", NativeValue::text(&inputs.default_script));
        option("fallback_script", NativeValue::text(&inputs.fallback_script));
        option("fallback_scaling", NativeValue::flag(options.fallback_scaling));
        option("symbol", NativeValue::flag(options.symbol));
        option("fallback_stem_width", NativeValue::UInt(options.fallback_stem_width));
        option("ignore_restrictions", NativeValue::flag(options.ignore_restrictions));
        option("TTFA_info", NativeValue::flag(options.ttfa_info));
        option("dehint", NativeValue::flag(options.dehint));
        if let Some(epoch) = options.epoch {
            option("epoch", NativeValue::ULongLong(epoch));
        }
        option("debug", NativeValue::flag(options.debug));

        push(
            KEY_OUT_BUFFER,
            NativeValue::Out(ptr::addr_of_mut!(slots.buffer) as *mut c_void),
        );
        push(
            KEY_OUT_BUFFER_LEN,
            NativeValue::Out(ptr::addr_of_mut!(slots.len) as *mut c_void),
        );
        push(
            KEY_ERROR_STRING,
            NativeValue::Out(ptr::addr_of_mut!(slots.error) as *mut c_void),
        );

        entries.sort_by(|a, b| a.0.cmp(&b.0));
        debug_assert!(entries.len() <= MAX_ARGS);
        debug_assert!(entries.windows(2).all(|w| w[0].0 != w[1].0));

        Self {
            entries,
            _borrow: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in call order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Value for `key`, if present
    pub fn get(&self, key: &str) -> Option<NativeValue> {
        self.entries
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .ok()
            .map(|i| self.entries[i].1)
    }

    pub fn entries(&self) -> &[(String, NativeValue)] {
        &self.entries
    }

    /// The option string: hyphenated keys joined by `", "`
    pub fn key_string(&self) -> Result<CString> {
        let joined = self.keys().collect::<Vec<_>>().join(KEY_SEPARATOR);
        debug!("Native keys: {}", joined);
        CString::new(joined).map_err(|_| Error::Protocol("NUL byte in option key".to_string()))
    }

    /// Values in key order, padded with zero words
    pub fn words(&self) -> [Word; MAX_ARGS] {
        let mut words = [0; MAX_ARGS];
        for (word, (_, value)) in words.iter_mut().zip(&self.entries) {
            *word = value.word();
        }
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{lookup, OptionKind, Options};
    use crate::resolve::resolve;
    use pretty_assertions::assert_eq;

    fn build_keys(mut opts: Options) -> Vec<String> {
        let inputs = resolve(&mut opts).unwrap();
        let mut slots = OutSlots::default();
        let args = Arguments::build(&opts, &inputs, &mut slots);
        args.keys().map(str::to_string).collect()
    }

    #[test]
    fn test_default_keys_sorted_and_unique() {
        let keys = build_keys(Options::new(vec![0u8; 16]));
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(keys, sorted);
        assert_eq!(
            keys,
            vec![
                "TTFA-info",
                "adjust-subglyphs",
                "debug",
                "default-script",
                "dehint",
                "dw-cleartype-strong-stem-width",
                "error-string",
                "fallback-scaling",
                "fallback-script",
                "fallback-stem-width",
                "gdi-cleartype-strong-stem-width",
                "gray-strong-stem-width",
                "hint-composites",
                "hinting-limit",
                "hinting-range-max",
                "hinting-range-min",
                "ignore-restrictions",
                "in-buffer",
                "in-buffer-len",
                "increase-x-height",
                "out-buffer",
                "out-buffer-len",
                "reference-index",
                "symbol",
                "windows-compatibility",
                "x-height-snapping-exceptions",
            ]
        );
    }

    #[test]
    fn test_unset_values_omitted() {
        let keys = build_keys(Options::new(vec![0u8; 16]));
        for absent in [
            "epoch",
            "reference-name",
            "control-buffer",
            "control-buffer-len",
            "reference-buffer",
            "reference-buffer-len",
        ] {
            assert!(!keys.iter().any(|k| k == absent), "{} present", absent);
        }
    }

    #[test]
    fn test_every_optional_key_present() {
        let mut opts = Options::new(vec![0u8; 16])
            .control(b"a 0 l 1".to_vec())
            .reference(vec![1u8; 32]);
        opts.reference_name = Some("Ref".to_string());
        opts.epoch = Some(1_500_000_000);
        let keys = build_keys(opts);
        assert_eq!(keys.len(), MAX_ARGS);
    }

    #[test]
    fn test_values_follow_registry_kinds() {
        let mut opts = Options::new(vec![0u8; 16]);
        opts.reference_name = Some("Ref".to_string());
        opts.epoch = Some(42);
        opts.hint_composites = true;
        let inputs = resolve(&mut opts).unwrap();
        let mut slots = OutSlots::default();
        let args = Arguments::build(&opts, &inputs, &mut slots);

        for (key, value) in args.entries() {
            let name = key.replace('-', "_");
            let Some(spec) = lookup(&name) else {
                continue;
            };
            let ok = match spec.kind {
                OptionKind::Bool => matches!(value, NativeValue::Int(0 | 1)),
                OptionKind::UInt => matches!(value, NativeValue::UInt(_)),
                OptionKind::Int => matches!(value, NativeValue::Int(_)),
                OptionKind::Text => matches!(value, NativeValue::Ptr(p) if !p.is_null()),
                OptionKind::Epoch => matches!(value, NativeValue::ULongLong(_)),
                OptionKind::Buffer => matches!(value, NativeValue::Ptr(_)),
                OptionKind::FileSource | OptionKind::Destination => false,
            };
            assert!(ok, "{} has {:?}", key, value);
        }
        assert_eq!(args.get("hint-composites"), Some(NativeValue::Int(1)));
        assert_eq!(args.get("epoch"), Some(NativeValue::ULongLong(42)));
        assert_eq!(args.get("in-buffer-len"), Some(NativeValue::Size(16)));
    }

    #[test]
    fn test_buffers_point_into_inputs() {
        let mut opts = Options::new(vec![7u8; 5]).control(b"ctl".to_vec());
        let inputs = resolve(&mut opts).unwrap();
        let mut slots = OutSlots::default();
        let args = Arguments::build(&opts, &inputs, &mut slots);

        assert_eq!(
            args.get("in-buffer"),
            Some(NativeValue::Ptr(inputs.font.as_ptr() as *const c_void))
        );
        assert_eq!(args.get("control-buffer-len"), Some(NativeValue::Size(3)));
    }

    #[test]
    fn test_key_string_and_words_align() {
        let mut opts = Options::new(vec![0u8; 3]);
        opts.hinting_range_min = 9;
        let inputs = resolve(&mut opts).unwrap();
        let mut slots = OutSlots::default();
        let args = Arguments::build(&opts, &inputs, &mut slots);

        let keys = args.key_string().unwrap();
        let keys = keys.to_str().unwrap();
        assert!(keys.starts_with("TTFA-info, adjust-subglyphs, "));

        let words = args.words();
        let pos = keys
            .split(KEY_SEPARATOR)
            .position(|k| k == "hinting-range-min")
            .unwrap();
        assert_eq!(words[pos], 9);
        assert!(words[args.len()..].iter().all(|&w| w == 0));
    }

    #[test]
    fn test_negative_int_sign_extended() {
        assert_eq!(NativeValue::Int(-1).word(), u64::MAX);
        assert_eq!(NativeValue::Int(-1).word() as u32 as i32, -1);
        assert_eq!(NativeValue::UInt(u32::MAX).word(), u32::MAX as u64);
    }
}
