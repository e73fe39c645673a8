//! Log subscriber writing to the configured log file, or stderr as a fallback.

use std::fs;
use std::io;
use std::path::Path;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Fixed level filter: every evaluation line is kept. The environment is
/// not consulted.
pub const FILTER: &str = "debug";

/// Writer that is either the log file or stderr.
///
/// Each event writes through its own duplicate of the log file handle. If
/// the duplicate cannot be made (e.g. out of descriptors mid-sweep), the
/// line goes to stderr instead of being dropped, and the sweep continues.
enum FileOrStderr {
    File(fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct FileMakeWriter(fs::File);

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

/// Build a subscriber appending timestamped lines to `log_file`.
///
/// The file and its parent directory are created if missing. The caller
/// decides the scope, e.g. with `tracing::subscriber::with_default`.
pub fn file_subscriber(
    log_file: &Path,
) -> io::Result<impl tracing::Subscriber + Send + Sync + 'static> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let writer = BoxMakeWriter::new(FileMakeWriter(file));

    Ok(tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(FILTER))
        .with_writer(writer)
        .with_ansi(false)
        .finish())
}
