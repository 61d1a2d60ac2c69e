//! Input resolution
//!
//! Turns every file-like source into bytes and encodes the text options
//! as narrow C strings. File and reader sources are consumed to the end.

use std::ffi::CString;
use std::io::Read;

use log::debug;

use crate::error::{Error, Result};
use crate::options::{InputSource, Options};

/// Byte buffers and encoded strings handed to the native call
#[derive(Debug)]
pub struct ResolvedInputs {
    /// Font to hint
    pub font: Vec<u8>,
    pub control: Option<Vec<u8>>,
    pub reference: Option<Vec<u8>>,
    pub reference_name: Option<CString>,
    pub default_script: CString,
    pub fallback_script: CString,
    pub x_height_snapping_exceptions: CString,
}

/// Resolve the three input streams and the text options of `options`
///
/// Sources are moved out of `options`; in-memory buffers are moved,
/// not copied. The remaining scalar options are left untouched.
pub fn resolve(options: &mut Options) -> Result<ResolvedInputs> {
    let input = std::mem::replace(&mut options.input, InputSource::Buffer(Vec::new()));
    let font = read_source("in_file", input)?;
    let control = options
        .control
        .take()
        .map(|s| read_source("control_file", s))
        .transpose()?;
    let reference = options
        .reference
        .take()
        .map(|s| read_source("reference_file", s))
        .transpose()?;

    let reference_name = options
        .reference_name
        .as_deref()
        .map(|name| encode_ascii("reference_name", name))
        .transpose()?;

    let resolved = ResolvedInputs {
        font,
        control,
        reference,
        reference_name,
        default_script: encode_ascii("default_script", &options.default_script)?,
        fallback_script: encode_ascii("fallback_script", &options.fallback_script)?,
        x_height_snapping_exceptions: encode_ascii(
            "x_height_snapping_exceptions",
            &options.x_height_snapping_exceptions,
        )?,
    };

    debug!(
        "Resolved inputs: font={} bytes, control={:?}, reference={:?}",
        resolved.font.len(),
        resolved.control.as_ref().map(Vec::len),
        resolved.reference.as_ref().map(Vec::len)
    );
    Ok(resolved)
}

/// Read a source to completion
fn read_source(field: &str, source: InputSource) -> Result<Vec<u8>> {
    match source {
        InputSource::Buffer(bytes) => Ok(bytes),
        InputSource::File(path) => std::fs::read(&path)
            .map_err(|e| Error::io(format!("Failed to read {}: {}", field, path.display()), e)),
        InputSource::Reader(mut reader) => {
            let mut bytes = Vec::new();
            reader
                .read_to_end(&mut bytes)
                .map_err(|e| Error::io(format!("Failed to read {}", field), e))?;
            Ok(bytes)
        }
    }
}

/// Strict ASCII encoding; failure is fatal for the call
pub fn encode_ascii(field: &'static str, text: &str) -> Result<CString> {
    if !text.is_ascii() {
        return Err(Error::Encoding { field });
    }
    CString::new(text).map_err(|_| Error::Encoding { field })
}
