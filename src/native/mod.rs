//! Native call boundary
//!
//! Handles:
//! - Loading libttfautohint (libloading)
//! - The variadic `TTF_autohint` call
//! - Copying and releasing the native output buffer
//! - Converting failures into structured errors

pub mod buffer;
pub mod library;

pub use buffer::NativeBuffer;
pub use library::Library;

use std::ffi::{c_int, c_void, CStr};

use log::{debug, info};

use crate::constants::MAX_ARGS;
use crate::error::{self, Result};
use crate::marshal::{Arguments, OutSlots, Word};
use crate::options::Options;
use crate::resolve::ResolvedInputs;

/// Something that can run `TTF_autohint`
pub trait Engine {
    /// Invoke the entry point
    ///
    /// # Safety
    /// `words` must hold one value per key in `keys`, in key order, with
    /// every pointer valid for the duration of the call.
    unsafe fn call(&self, keys: &CStr, words: &[Word; MAX_ARGS]) -> c_int;

    /// Release memory the engine allocated for its output
    ///
    /// # Safety
    /// `ptr` must come from a successful `call` and not be released twice.
    unsafe fn release(&self, ptr: *mut c_void);
}

/// Run one blocking native call and return an owned copy of its output
///
/// No retries: a non-zero return code is reported as `Error::Native`.
pub fn invoke<E: Engine + ?Sized>(
    engine: &E,
    options: &Options,
    inputs: &ResolvedInputs,
) -> Result<Vec<u8>> {
    let mut slots = OutSlots::default();

    let rv = {
        let args = Arguments::build(options, inputs, &mut slots);
        let keys = args.key_string()?;
        let words = args.words();
        debug!("Calling TTF_autohint with {} arguments", args.len());
        // SAFETY: `args` keeps the inputs and out-slots borrowed across the call
        unsafe { engine.call(&keys, &words) }
    };

    // SAFETY: the out-buffer slot was written by the engine's allocator or left null
    let buffer = unsafe { NativeBuffer::from_raw(engine, slots.buffer, slots.len) };

    if rv != 0 {
        // SAFETY: on failure the error slot is null or a NUL-terminated message
        return Err(unsafe { error::report(rv, slots.error) });
    }

    let bytes = buffer.into_vec();
    info!("TTF_autohint produced {} bytes", bytes.len());
    Ok(bytes)
}
