//! ttfautohint-job - run TOML job files through libttfautohint
//!
//! Each job file is a table of option names, for example:
//!
//! ```toml
//! in_file = "Font.ttf"
//! out_file = "Font-hinted.ttf"
//! hinting_range_max = 64
//! windows_compatibility = true
//! ```

use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use ttfautohint::{autohint, Config, Output};

fn print_help() {
    println!("ttfautohint-job {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: ttfautohint-job [OPTIONS] JOB.toml...");
    println!();
    println!("Options:");
    println!("  -h, --help         Show this help");
    println!("  -V, --version      Show version");
    println!("  --init-config      Write a settings template to ~/.config/ttfautohint/config.toml");
    println!();
    println!("Settings are read from $TTFAUTOHINT_CONFIG or ~/.config/ttfautohint/config.toml.");
    println!("Set RUST_LOG=debug to see the arguments passed to TTF_autohint.");
}

fn run_job(config: &Config, library: &ttfautohint::Library, path: &Path) -> Result<()> {
    let options = config.load_job(path)?;
    let output = autohint(library, options)
        .with_context(|| format!("Job failed: {}", path.display()))?;
    match output {
        Output::Written(n) => println!("{}: wrote {} bytes", path.display(), n),
        Output::Bytes(bytes) => println!(
            "{}: produced {} bytes (no out_file given, discarded)",
            path.display(),
            bytes.len()
        ),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // --help
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("ttfautohint-job {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // --init-config
    if args.iter().any(|a| a == "--init-config") {
        let path = Config::write_template()?;
        println!("Config file generated: {}", path.display());
        return Ok(());
    }

    let config = Config::load();
    let library = config.open_library().context("Failed to load libttfautohint")?;
    info!("Using {}", library.path().display());

    for job in &args {
        run_job(&config, &library, Path::new(job))?;
    }
    Ok(())
}
