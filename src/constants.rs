//! Global constants for the ttfautohint wrapper
//!
//! Option defaults, native protocol key names and library file names
//! gathered in one place to eliminate magic values throughout the crate.

// ============================================================================
// Option Defaults
// ============================================================================

/// Face index used in the reference font
pub const DEFAULT_REFERENCE_INDEX: i32 = 0;

/// Smallest PPEM value for which hint sets are computed
pub const DEFAULT_HINTING_RANGE_MIN: u32 = 8;

/// Largest PPEM value for which hint sets are computed
pub const DEFAULT_HINTING_RANGE_MAX: u32 = 50;

/// PPEM value above which hinting is switched off (0 = no limit)
pub const DEFAULT_HINTING_LIMIT: u32 = 200;

/// PPEM value up to which x-height rounding is increased (0 = off)
pub const DEFAULT_INCREASE_X_HEIGHT: u32 = 14;

/// Stem width used by the fallback script (0 = derive from font)
pub const DEFAULT_FALLBACK_STEM_WIDTH: u32 = 0;

/// Script used for glyphs not covered by any script
pub const DEFAULT_SCRIPT: &str = "latn";

/// Script used when no script can be detected
pub const DEFAULT_FALLBACK_SCRIPT: &str = "none";

// ============================================================================
// Native Protocol
// ============================================================================

/// Exported entry point of the native library
pub const ENTRY_POINT: &[u8] = b"TTF_autohint\0";

/// Separator placed between keys of the option string
pub const KEY_SEPARATOR: &str = ", ";

/// Maximum number of value words ever passed to the entry point
///
/// One word per key the marshaller can emit (31 option keys plus
/// the error-string slot).
pub const MAX_ARGS: usize = 32;

pub const KEY_IN_BUFFER: &str = "in-buffer";
pub const KEY_IN_BUFFER_LEN: &str = "in-buffer-len";
pub const KEY_OUT_BUFFER: &str = "out-buffer";
pub const KEY_OUT_BUFFER_LEN: &str = "out-buffer-len";
pub const KEY_CONTROL_BUFFER: &str = "control-buffer";
pub const KEY_CONTROL_BUFFER_LEN: &str = "control-buffer-len";
pub const KEY_REFERENCE_BUFFER: &str = "reference-buffer";
pub const KEY_REFERENCE_BUFFER_LEN: &str = "reference-buffer-len";
pub const KEY_ERROR_STRING: &str = "error-string";

// ============================================================================
// Library Loading
// ============================================================================

/// Candidate file names for the native library, tried in order
#[cfg(target_os = "linux")]
pub const LIBRARY_NAMES: &[&str] = &["libttfautohint.so", "libttfautohint.so.1"];

#[cfg(target_os = "macos")]
pub const LIBRARY_NAMES: &[&str] = &["libttfautohint.dylib", "libttfautohint.1.dylib"];

#[cfg(target_os = "windows")]
pub const LIBRARY_NAMES: &[&str] = &["ttfautohint.dll"];

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub const LIBRARY_NAMES: &[&str] = &["libttfautohint.so"];

/// C runtime whose `free` pairs with the Windows DLL's `malloc`
///
/// Distributed `ttfautohint.dll` builds are MinGW builds linked against
/// `msvcrt.dll`, not the UCRT a Rust MSVC binary uses.
#[cfg(target_os = "windows")]
pub const WINDOWS_RUNTIME: &str = "msvcrt.dll";

/// Exported release routine of the C runtime
pub const FREE_SYMBOL: &[u8] = b"free\0";

/// Environment variable naming an explicit settings file
pub const CONFIG_ENV: &str = "TTFAUTOHINT_CONFIG";
