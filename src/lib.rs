//! ttfautohint - safe wrapper around libttfautohint
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Options (typed, or validated from names)    │
//! │                      ↓                       │
//! │  resolve: files/readers → bytes, text → C    │
//! │                      ↓                       │
//! │  marshal: sorted (key, value) list           │
//! │                      ↓                       │
//! │  native: TTF_autohint(keys, ...)             │
//! │        ↓ rv != 0            ↓ rv == 0        │
//! │  Error::Native        NativeBuffer → Vec<u8> │
//! │                             ↓                │
//! │                      output: file / bytes    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ```no_run
//! use ttfautohint::{autohint_with_default_library, Options};
//!
//! let font = std::fs::read("Font.ttf")?;
//! let hinted = autohint_with_default_library(Options::new(font))?;
//! std::fs::write("Font-hinted.ttf", hinted.into_bytes().unwrap_or_default())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod marshal;
pub mod native;
pub mod options;
pub mod output;
pub mod resolve;

pub use config::Config;
pub use error::{Error, Result};
pub use native::{Engine, Library};
pub use options::{InputSource, OptionValue, Options, OutputTarget};
pub use output::Output;

use log::debug;

/// Hint a font with `engine`
///
/// Sources are read, the arguments marshalled, the native call made
/// once, and the result delivered to `options.output` (or returned).
/// Either a complete output is produced or nothing is written.
pub fn autohint<E: Engine + ?Sized>(engine: &E, mut options: Options) -> Result<Output> {
    let target = options.output.take();
    let inputs = resolve::resolve(&mut options)?;
    let bytes = native::invoke(engine, &options, &inputs)?;
    debug!("Delivering {} bytes to {:?}", bytes.len(), target);
    output::deliver(bytes, target)
}

/// Name-keyed form of [`autohint`]
pub fn autohint_values<E, I, K>(engine: &E, values: I) -> Result<Output>
where
    E: Engine + ?Sized,
    I: IntoIterator<Item = (K, OptionValue)>,
    K: Into<String>,
{
    autohint(engine, Options::from_values(values)?)
}

/// Load the library from its default location and hint a font
pub fn autohint_with_default_library(options: Options) -> Result<Output> {
    let library = Library::open_default()?;
    autohint(&library, options)
}
