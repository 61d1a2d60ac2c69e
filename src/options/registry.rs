//! Closed set of recognized option names
//!
//! Every option has a shape and a default. The shape decides which
//! `OptionValue`s are accepted and how the value crosses the native
//! boundary.

use crate::constants::*;

/// Shape of an option value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// File-like source: path or open reader
    FileSource,
    /// In-memory byte buffer
    Buffer,
    /// File-like destination: path or open writer
    Destination,
    /// Passed as integer 0/1
    Bool,
    /// Passed as unsigned int
    UInt,
    /// Passed as signed int
    Int,
    /// Passed as narrow C string
    Text,
    /// Passed as unsigned long long; omitted when unset
    Epoch,
}

impl OptionKind {
    /// Human readable description used in type errors
    pub fn expected(self) -> &'static str {
        match self {
            Self::FileSource => "path or reader",
            Self::Buffer => "bytes",
            Self::Destination => "path or writer",
            Self::Bool => "bool",
            Self::UInt | Self::Int | Self::Epoch => "int",
            Self::Text => "str",
        }
    }
}

/// Default value of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// Unset; nothing is passed to the native library
    Absent,
    Bool(bool),
    UInt(u32),
    Int(i32),
    Text(&'static str),
}

/// Registry entry
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: OptionKind,
    pub default: DefaultValue,
}

const fn spec(name: &'static str, kind: OptionKind, default: DefaultValue) -> OptionSpec {
    OptionSpec {
        name,
        kind,
        default,
    }
}

use DefaultValue::{Absent, Bool as B, Int as I, Text as T, UInt as U};
use OptionKind::*;

/// All recognized options, in documentation order
pub const REGISTRY: &[OptionSpec] = &[
    spec("in_file", FileSource, Absent),
    spec("in_buffer", Buffer, Absent),
    spec("out_file", Destination, Absent),
    spec("control_file", FileSource, Absent),
    spec("control_buffer", Buffer, Absent),
    spec("reference_file", FileSource, Absent),
    spec("reference_buffer", Buffer, Absent),
    spec("reference_index", Int, I(DEFAULT_REFERENCE_INDEX)),
    spec("reference_name", Text, Absent),
    spec("hinting_range_min", UInt, U(DEFAULT_HINTING_RANGE_MIN)),
    spec("hinting_range_max", UInt, U(DEFAULT_HINTING_RANGE_MAX)),
    spec("hinting_limit", UInt, U(DEFAULT_HINTING_LIMIT)),
    spec("hint_composites", Bool, B(false)),
    spec("adjust_subglyphs", Bool, B(false)),
    spec("gray_strong_stem_width", Bool, B(false)),
    spec("gdi_cleartype_strong_stem_width", Bool, B(true)),
    spec("dw_cleartype_strong_stem_width", Bool, B(false)),
    spec("increase_x_height", UInt, U(DEFAULT_INCREASE_X_HEIGHT)),
    spec("x_height_snapping_exceptions", Text, T("")),
    spec("windows_compatibility", Bool, B(false)),
    spec("default_script", Text, T(DEFAULT_SCRIPT)),
    spec("fallback_script", Text, T(DEFAULT_FALLBACK_SCRIPT)),
    spec("fallback_scaling", Bool, B(false)),
    spec("symbol", Bool, B(false)),
    spec("fallback_stem_width", UInt, U(DEFAULT_FALLBACK_STEM_WIDTH)),
    spec("ignore_restrictions", Bool, B(false)),
    spec("TTFA_info", Bool, B(false)),
    spec("dehint", Bool, B(false)),
    spec("epoch", Epoch, Absent),
    spec("debug", Bool, B(false)),
];

/// Look up an option by name
pub fn lookup(name: &str) -> Option<&'static OptionSpec> {
    REGISTRY.iter().find(|s| s.name == name)
}

/// Native key for an option name (`hinting_range_min` -> `hinting-range-min`)
pub fn native_key(name: &str) -> String {
    name.replace('_', "-")
}
