//! Options accepted by `TTF_autohint`
//!
//! Two ways in:
//! - `Options` - one typed field per option, defaults filled by `Options::new`
//! - `Options::from_values` - name-keyed `OptionValue`s, validated against
//!   the registry (unknown names, missing/conflicting inputs, wrong shapes)

pub mod registry;
mod validate;

use std::fmt;
use std::io::{Read, Write};
use std::path::PathBuf;

use crate::constants::*;

pub use registry::{lookup, native_key, DefaultValue, OptionKind, OptionSpec, REGISTRY};

/// Source of one logical input stream (font, control data, reference font)
pub enum InputSource {
    /// Path read to completion
    File(PathBuf),
    /// Open handle read to completion
    Reader(Box<dyn Read>),
    /// Bytes already in memory
    Buffer(Vec<u8>),
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
            Self::Buffer(bytes) => write!(f, "Buffer({} bytes)", bytes.len()),
        }
    }
}

impl From<Vec<u8>> for InputSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Buffer(bytes)
    }
}

impl From<PathBuf> for InputSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

/// Destination for the hinted font
pub enum OutputTarget {
    /// Path created (or truncated) and written
    File(PathBuf),
    /// Open handle written to
    Writer(Box<dyn Write>),
}

impl fmt::Debug for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// Loosely typed option value, as supplied by name
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Bytes(Vec<u8>),
    Path(PathBuf),
    Reader(Box<dyn Read>),
    Writer(Box<dyn Write>),
}

impl OptionValue {
    /// Type name reported in type errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Text(_) => "str",
            Self::Bytes(_) => "bytes",
            Self::Path(_) => "path",
            Self::Reader(_) => "reader",
            Self::Writer(_) => "writer",
        }
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "Bool({})", v),
            Self::Int(v) => write!(f, "Int({})", v),
            Self::Text(v) => write!(f, "Text({:?})", v),
            Self::Bytes(v) => write!(f, "Bytes({} bytes)", v.len()),
            Self::Path(v) => write!(f, "Path({:?})", v),
            Self::Reader(_) => f.write_str("Reader(..)"),
            Self::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for OptionValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<PathBuf> for OptionValue {
    fn from(v: PathBuf) -> Self {
        Self::Path(v)
    }
}

/// Complete, validated option set for one invocation
#[derive(Debug)]
pub struct Options {
    /// Font to hint (required)
    pub input: InputSource,
    /// Where to write the result; returned directly when `None`
    pub output: Option<OutputTarget>,
    /// Hint control instructions
    pub control: Option<InputSource>,
    /// Reference font for blue zones and stem widths
    pub reference: Option<InputSource>,
    pub reference_index: i32,
    /// Family name of the reference font (`None` = not passed)
    pub reference_name: Option<String>,
    pub hinting_range_min: u32,
    pub hinting_range_max: u32,
    /// 0 disables the limit
    pub hinting_limit: u32,
    pub hint_composites: bool,
    pub adjust_subglyphs: bool,
    pub gray_strong_stem_width: bool,
    pub gdi_cleartype_strong_stem_width: bool,
    pub dw_cleartype_strong_stem_width: bool,
    pub increase_x_height: u32,
    /// Comma separated PPEM values and ranges
    pub x_height_snapping_exceptions: String,
    pub windows_compatibility: bool,
    /// OpenType script tag
    pub default_script: String,
    /// OpenType script tag or "none"
    pub fallback_script: String,
    pub fallback_scaling: bool,
    pub symbol: bool,
    pub fallback_stem_width: u32,
    pub ignore_restrictions: bool,
    /// Add the TTFA info table
    pub ttfa_info: bool,
    pub dehint: bool,
    /// Seconds since the Unix epoch for `head` timestamps (`None` = native picks)
    pub epoch: Option<u64>,
    pub debug: bool,
}

impl Options {
    /// Options for `input` with every other option at its default
    pub fn new(input: impl Into<InputSource>) -> Self {
        Self {
            input: input.into(),
            output: None,
            control: None,
            reference: None,
            reference_index: DEFAULT_REFERENCE_INDEX,
            reference_name: None,
            hinting_range_min: DEFAULT_HINTING_RANGE_MIN,
            hinting_range_max: DEFAULT_HINTING_RANGE_MAX,
            hinting_limit: DEFAULT_HINTING_LIMIT,
            hint_composites: false,
            adjust_subglyphs: false,
            gray_strong_stem_width: false,
            gdi_cleartype_strong_stem_width: true,
            dw_cleartype_strong_stem_width: false,
            increase_x_height: DEFAULT_INCREASE_X_HEIGHT,
            x_height_snapping_exceptions: String::new(),
            windows_compatibility: false,
            default_script: DEFAULT_SCRIPT.to_string(),
            fallback_script: DEFAULT_FALLBACK_SCRIPT.to_string(),
            fallback_scaling: false,
            symbol: false,
            fallback_stem_width: DEFAULT_FALLBACK_STEM_WIDTH,
            ignore_restrictions: false,
            ttfa_info: false,
            dehint: false,
            epoch: None,
            debug: false,
        }
    }

    /// Write the result to `target` instead of returning it
    pub fn output(mut self, target: OutputTarget) -> Self {
        self.output = Some(target);
        self
    }

    pub fn control(mut self, source: impl Into<InputSource>) -> Self {
        self.control = Some(source.into());
        self
    }

    pub fn reference(mut self, source: impl Into<InputSource>) -> Self {
        self.reference = Some(source.into());
        self
    }
}
