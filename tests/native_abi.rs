//! Calls through a real C variadic `TTF_autohint`
//!
//! The fixture in `tests/fixtures` is compiled with the system C
//! compiler (`$CC`, default `cc`) into a shared library and loaded with
//! `Library::open`, so the values cross the actual `extern "C"` boundary
//! and are read back with `va_arg`.

#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::process::Command;

use pretty_assertions::assert_eq;
use ttfautohint::{autohint, Error, Library, Options};

fn build_fixture(dir: &Path) -> Option<PathBuf> {
    let source = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fake_ttfautohint.c");
    let name = if cfg!(target_os = "macos") {
        "libfake_ttfautohint.dylib"
    } else {
        "libfake_ttfautohint.so"
    };
    let lib = dir.join(name);
    let compiler = std::env::var("CC").unwrap_or_else(|_| "cc".to_string());

    let status = Command::new(&compiler)
        .args(["-shared", "-fPIC", "-o"])
        .arg(&lib)
        .arg(&source)
        .status();
    match status {
        Ok(s) if s.success() => Some(lib),
        _ => {
            eprintln!("skipping: {} cannot build {}", compiler, source.display());
            None
        }
    }
}

fn run(library: &Library, options: Options) -> String {
    let bytes = autohint(library, options).unwrap().into_bytes().unwrap();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_values_reach_c_callee() {
    let dir = tempfile::tempdir().unwrap();
    let Some(path) = build_fixture(dir.path()) else {
        return;
    };
    let library = Library::open(&path).unwrap();

    let mut opts = Options::new(vec![42u8, 0, 1]);
    opts.reference_index = -3;
    opts.epoch = Some(u64::MAX - 1);
    opts.hinting_range_max = 77;
    assert_eq!(
        run(&library, opts),
        "len=3 first=42 ref=-3 epoch=18446744073709551614 hmax=77 gdi=1 ds=latn"
    );

    // Unset epoch is not passed at all
    let mut opts = Options::new(vec![7u8]);
    opts.default_script = "cyrl".to_string();
    opts.gdi_cleartype_strong_stem_width = false;
    assert_eq!(
        run(&library, opts),
        "len=1 first=7 ref=0 epoch=-0 hmax=50 gdi=0 ds=cyrl"
    );
}

#[test]
fn test_c_callee_failure_is_structured() {
    let dir = tempfile::tempdir().unwrap();
    let Some(path) = build_fixture(dir.path()) else {
        return;
    };
    let library = Library::open(&path).unwrap();

    let err = autohint(&library, Options::new(b"FAIL font".to_vec())).unwrap_err();
    assert!(matches!(err, Error::Native { code: 1, .. }));
    assert_eq!(err.to_string(), "1: invalid font file");
}
