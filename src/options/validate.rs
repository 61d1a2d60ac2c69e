//! Option validation
//!
//! Merges name-keyed values over the registry defaults and produces a
//! typed `Options`. Pure: nothing is opened or read here.

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::debug;

use super::registry::{lookup, OptionKind, OptionSpec};
use super::{InputSource, OptionValue, Options, OutputTarget};
use crate::error::{Error, Result};

/// Mutually exclusive (file, buffer) pairs for the optional inputs
const EXCLUSIVE_PAIRS: [(&str, &str); 2] = [
    ("control_file", "control_buffer"),
    ("reference_file", "reference_buffer"),
];

impl Options {
    /// Build options from name-keyed values
    ///
    /// Unspecified options keep their defaults. When a name is given
    /// more than once the last value wins.
    pub fn from_values<I, K>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, OptionValue)>,
        K: Into<String>,
    {
        let mut values: BTreeMap<String, OptionValue> =
            values.into_iter().map(|(k, v)| (k.into(), v)).collect();

        let unknown: Vec<String> = values
            .keys()
            .filter(|k| lookup(k).is_none())
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(Error::UnknownOptions(unknown));
        }

        let input = match (values.remove("in_file"), values.remove("in_buffer")) {
            (None, None) => return Err(Error::MissingInput),
            (Some(_), Some(_)) => {
                return Err(Error::ConflictingInputs {
                    first: "in_file",
                    second: "in_buffer",
                })
            }
            (Some(file), None) => source_from_value("in_file", file)?,
            (None, Some(buffer)) => source_from_value("in_buffer", buffer)?,
        };

        for (first, second) in EXCLUSIVE_PAIRS {
            if values.contains_key(first) && values.contains_key(second) {
                return Err(Error::ConflictingInputs { first, second });
            }
        }

        let mut opts = Options::new(input);
        for (name, value) in values {
            apply(&mut opts, &name, value)?;
        }
        debug!("Validated options: {:?}", opts);
        Ok(opts)
    }
}

/// Convert a source value for a file-like or buffer option
fn source_from_value(field: &str, value: OptionValue) -> Result<InputSource> {
    let spec = spec_for(field)?;
    match (spec.kind, value) {
        (OptionKind::Buffer, OptionValue::Bytes(bytes)) => Ok(InputSource::Buffer(bytes)),
        (OptionKind::FileSource, OptionValue::Path(path)) => Ok(InputSource::File(path)),
        (OptionKind::FileSource, OptionValue::Text(path)) => Ok(InputSource::File(PathBuf::from(path))),
        (OptionKind::FileSource, OptionValue::Reader(reader)) => Ok(InputSource::Reader(reader)),
        (kind, other) => Err(type_error(field, kind, &other)),
    }
}

fn destination_from_value(field: &str, value: OptionValue) -> Result<OutputTarget> {
    match value {
        OptionValue::Path(path) => Ok(OutputTarget::File(path)),
        OptionValue::Text(path) => Ok(OutputTarget::File(PathBuf::from(path))),
        OptionValue::Writer(writer) => Ok(OutputTarget::Writer(writer)),
        other => Err(type_error(field, OptionKind::Destination, &other)),
    }
}

fn spec_for(field: &str) -> Result<&'static OptionSpec> {
    lookup(field).ok_or_else(|| Error::UnknownOptions(vec![field.to_string()]))
}

fn type_error(field: &str, kind: OptionKind, found: &OptionValue) -> Error {
    Error::Type {
        field: field.to_string(),
        expected: kind.expected(),
        found: found.type_name(),
    }
}

fn as_bool(field: &str, value: OptionValue) -> Result<bool> {
    match value {
        OptionValue::Bool(v) => Ok(v),
        other => Err(type_error(field, OptionKind::Bool, &other)),
    }
}

fn as_int(field: &str, kind: OptionKind, value: OptionValue) -> Result<i64> {
    match value {
        OptionValue::Int(v) => Ok(v),
        other => Err(type_error(field, kind, &other)),
    }
}

fn as_u32(field: &str, value: OptionValue) -> Result<u32> {
    let v = as_int(field, OptionKind::UInt, value)?;
    u32::try_from(v).map_err(|_| Error::OutOfRange {
        field: field.to_string(),
        value: v,
    })
}

fn as_i32(field: &str, value: OptionValue) -> Result<i32> {
    let v = as_int(field, OptionKind::Int, value)?;
    i32::try_from(v).map_err(|_| Error::OutOfRange {
        field: field.to_string(),
        value: v,
    })
}

fn as_u64(field: &str, value: OptionValue) -> Result<u64> {
    let v = as_int(field, OptionKind::Epoch, value)?;
    u64::try_from(v).map_err(|_| Error::OutOfRange {
        field: field.to_string(),
        value: v,
    })
}

/// Text options also accept UTF-8 bytes; ASCII is enforced when marshalling
fn as_text(field: &str, value: OptionValue) -> Result<String> {
    match value {
        OptionValue::Text(s) => Ok(s),
        OptionValue::Bytes(bytes) => String::from_utf8(bytes).map_err(|_| Error::Type {
            field: field.to_string(),
            expected: OptionKind::Text.expected(),
            found: "non-UTF-8 bytes",
        }),
        other => Err(type_error(field, OptionKind::Text, &other)),
    }
}

/// Store one validated value into its typed field
fn apply(opts: &mut Options, name: &str, value: OptionValue) -> Result<()> {
    match name {
        "out_file" => opts.output = Some(destination_from_value(name, value)?),
        "control_file" | "control_buffer" => opts.control = Some(source_from_value(name, value)?),
        "reference_file" | "reference_buffer" => {
            opts.reference = Some(source_from_value(name, value)?)
        }
        "reference_index" => opts.reference_index = as_i32(name, value)?,
        "reference_name" => opts.reference_name = Some(as_text(name, value)?),
        "hinting_range_min" => opts.hinting_range_min = as_u32(name, value)?,
        "hinting_range_max" => opts.hinting_range_max = as_u32(name, value)?,
        "hinting_limit" => opts.hinting_limit = as_u32(name, value)?,
        "hint_composites" => opts.hint_composites = as_bool(name, value)?,
        "adjust_subglyphs" => opts.adjust_subglyphs = as_bool(name, value)?,
        "gray_strong_stem_width" => opts.gray_strong_stem_width = as_bool(name, value)?,
        "gdi_cleartype_strong_stem_width" => {
            opts.gdi_cleartype_strong_stem_width = as_bool(name, value)?
        }
        "dw_cleartype_strong_stem_width" => {
            opts.dw_cleartype_strong_stem_width = as_bool(name, value)?
        }
        "increase_x_height" => opts.increase_x_height = as_u32(name, value)?,
        "x_height_snapping_exceptions" => {
            opts.x_height_snapping_exceptions = as_text(name, value)?
        }
        "windows_compatibility" => opts.windows_compatibility = as_bool(name, value)?,
        "default_script" => opts.default_script = as_text(name, value)?,
        "fallback_script" => opts.fallback_script = as_text(name, value)?,
        "fallback_scaling" => opts.fallback_scaling = as_bool(name, value)?,
        "symbol" => opts.symbol = as_bool(name, value)?,
        "fallback_stem_width" => opts.fallback_stem_width = as_u32(name, value)?,
        "ignore_restrictions" => opts.ignore_restrictions = as_bool(name, value)?,
        "TTFA_info" => opts.ttfa_info = as_bool(name, value)?,
        "dehint" => opts.dehint = as_bool(name, value)?,
        "epoch" => opts.epoch = Some(as_u64(name, value)?),
        "debug" => opts.debug = as_bool(name, value)?,
        // in_file / in_buffer are consumed before this point
        other => return Err(Error::UnknownOptions(vec![other.to_string()])),
    }
    Ok(())
}
