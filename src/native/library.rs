//! Dynamically loaded ttfautohint library
//!
//! Resolves `TTF_autohint` with libloading and performs the variadic
//! call. Every argument is passed as a 64-bit word: the C default
//! argument promotions put each variadic `int`, `size_t`, pointer and
//! `unsigned long long` in its own word-sized slot, and the callee reads
//! only as many slots as the key string names.
//!
//! The output buffer is released with `free` from the C runtime the
//! library itself was linked against (`msvcrt.dll` on Windows).

use std::ffi::{c_char, c_int, c_void, CStr};
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::Engine;
use crate::constants::{ENTRY_POINT, LIBRARY_NAMES, MAX_ARGS};
#[cfg(windows)]
use crate::constants::{FREE_SYMBOL, WINDOWS_RUNTIME};
use crate::error::{Error, Result};
use crate::marshal::Word;

#[cfg(not(target_pointer_width = "64"))]
compile_error!("the TTF_autohint call adapter requires a 64-bit target");

/// `TTF_Error TTF_autohint(const char* options, ...)`
type AutohintFn = unsafe extern "C" fn(options: *const c_char, ...) -> c_int;

/// `void free(void* ptr)`
pub type FreeFn = unsafe extern "C" fn(ptr: *mut c_void);

// `Engine::call` below spreads exactly this many words
const _: () = assert!(MAX_ARGS == 32);

/// Loaded native library
///
/// The native library keeps global state; calls must not overlap.
pub struct Library {
    autohint: AutohintFn,
    free: FreeFn,
    path: PathBuf,
    // Keeps the code behind `autohint` mapped
    _lib: libloading::Library,
    // Keeps the code behind `free` mapped when it comes from a DLL
    _runtime: Option<libloading::Library>,
}

impl Library {
    /// Load the library at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lib_error = |source| Error::Library {
            path: path.clone(),
            source,
        };

        // SAFETY: ttfautohint has no load-time initializers with preconditions
        let lib = unsafe { libloading::Library::new(&path) }.map_err(lib_error)?;
        // SAFETY: the symbol has the signature of `AutohintFn`
        let autohint = unsafe { lib.get::<AutohintFn>(ENTRY_POINT).map(|sym| *sym) }
            .map_err(lib_error)?;
        let (free, runtime) = runtime_free()?;

        info!("Loaded ttfautohint: {}", path.display());
        Ok(Self {
            autohint,
            free,
            path,
            _lib: lib,
            _runtime: runtime,
        })
    }

    /// Load the library from the platform's default file names
    pub fn open_default() -> Result<Self> {
        let mut last_err = None;
        for name in LIBRARY_NAMES {
            match Self::open(*name) {
                Ok(lib) => return Ok(lib),
                Err(e) => {
                    debug!("{}", e);
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| Error::Config("no library names for this platform".to_string())))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `free` of the C runtime the library allocates its output from
#[cfg(not(windows))]
pub fn runtime_free() -> Result<(FreeFn, Option<libloading::Library>)> {
    Ok((libc::free as FreeFn, None))
}

/// `free` of the C runtime the library allocates its output from
#[cfg(windows)]
pub fn runtime_free() -> Result<(FreeFn, Option<libloading::Library>)> {
    let lib_error = |source| Error::Library {
        path: PathBuf::from(WINDOWS_RUNTIME),
        source,
    };
    // SAFETY: msvcrt.dll is a system library without load-time preconditions
    let runtime = unsafe { libloading::Library::new(WINDOWS_RUNTIME) }.map_err(lib_error)?;
    // SAFETY: `free` has the signature of `FreeFn`
    let free = unsafe { runtime.get::<FreeFn>(FREE_SYMBOL).map(|sym| *sym) }.map_err(lib_error)?;
    debug!("Output buffers released with {}", WINDOWS_RUNTIME);
    Ok((free, Some(runtime)))
}

impl Engine for Library {
    #[rustfmt::skip]
    unsafe fn call(&self, keys: &CStr, w: &[Word; MAX_ARGS]) -> c_int {
        (self.autohint)(
            keys.as_ptr(),
            w[0], w[1], w[2], w[3], w[4], w[5], w[6], w[7],
            w[8], w[9], w[10], w[11], w[12], w[13], w[14], w[15],
            w[16], w[17], w[18], w[19], w[20], w[21], w[22], w[23],
            w[24], w[25], w[26], w[27], w[28], w[29], w[30], w[31],
        )
    }

    unsafe fn release(&self, ptr: *mut c_void) {
        (self.free)(ptr);
    }
}
