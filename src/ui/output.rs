//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Progress and diagnostics go to stderr so the changelog path printed on
//! success is the only stdout line. Everything but errors respects the
//! quiet flag.

use std::fmt::Display;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - errors only
    Quiet,
    /// Normal mode - warnings and the final result
    Normal,
    /// Debug mode - progress logging
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print a success message (respects quiet mode).
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Write `contents` to `path` via a temp file and rename.
///
/// Creates missing parent directories. A reader never sees a half-written
/// file at `path`, and a failed write leaves no temp file behind.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    if let Err(e) = write_and_rename(temp_path, path, contents) {
        let _ = fs::remove_file(temp_path);
        return Err(e);
    }
    Ok(())
}

fn write_and_rename(temp_path: &Path, path: &Path, contents: &str) -> io::Result<()> {
    let mut file = fs::File::create(temp_path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    fs::rename(temp_path, path)
}
