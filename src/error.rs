//! Error taxonomy
//!
//! Configuration errors are detected before the native call, native
//! errors carry the library's return code and message, and protocol
//! errors flag a mismatch between this layer and the native library.

use std::ffi::{c_char, c_int, CStr};
use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// One or more option names are not in the registry
    #[error("{}", unknown_options_message(.0))]
    UnknownOptions(Vec<String>),

    /// Neither `in_file` nor `in_buffer` was given
    #[error("No input file or buffer provided")]
    MissingInput,

    /// Both options of a mutually exclusive pair were given
    #[error("{first} and {second} are mutually exclusive")]
    ConflictingInputs {
        first: &'static str,
        second: &'static str,
    },

    /// Option value has the wrong shape
    #[error("{field} type must be {expected}, not {found}")]
    Type {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Integer does not fit the native type of the option
    #[error("{field} value {value} is out of range")]
    OutOfRange { field: String, value: i64 },

    /// Text option cannot cross the boundary as a narrow C string
    #[error("{field} must be ASCII text without NUL bytes")]
    Encoding { field: &'static str },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Native library could not be loaded or lacks the entry point
    #[error("Failed to load {}: {source}", .path.display())]
    Library {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// Non-zero return code from `TTF_autohint`
    #[error("{code}: {message}")]
    Native { code: i32, message: String },

    /// Argument list cannot be expressed in the native calling protocol
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// Settings or job file is malformed
    #[error("{0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Return code of a native failure
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Native { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True for errors raised before any native call was attempted
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownOptions(_)
                | Self::MissingInput
                | Self::ConflictingInputs { .. }
                | Self::Type { .. }
                | Self::OutOfRange { .. }
                | Self::Encoding { .. }
                | Self::Config(_)
        )
    }
}

fn unknown_options_message(keys: &[String]) -> String {
    let quoted: Vec<String> = keys.iter().map(|k| format!("'{}'", k)).collect();
    format!(
        "unknown option{}: {}",
        if keys.len() > 1 { "s" } else { "" },
        quoted.join(", ")
    )
}

/// Build the structured error for a failed native call
///
/// The message is copied out of native memory; the pointer is not
/// retained. The error string belongs to the native library and is
/// never released here.
///
/// # Safety
/// `message` must be null or point to a NUL-terminated string that
/// stays valid for the duration of this call.
pub unsafe fn report(code: c_int, message: *const c_char) -> Error {
    let message = if message.is_null() {
        String::new()
    } else {
        CStr::from_ptr(message).to_string_lossy().into_owned()
    };
    Error::Native { code, message }
}
