use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_NAME: &str = "equityplan.log";

/// Startup truncation threshold
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Tail retained on truncation
const KEEP_SIZE: u64 = 1024 * 1024;

const TRUNCATION_MARKER: &[u8] = b"--- earlier entries truncated ---\n";

/// Cut `log_path` down to its last `keep` bytes, starting on a line
/// boundary, if it is larger than `max`. `Ok(true)` when it was cut.
fn rotate_log_if_needed(log_path: &Path, max: u64, keep: u64) -> std::io::Result<bool> {
    if !log_path.exists() {
        return Ok(false);
    }

    let file_size = fs::metadata(log_path)?.len();
    if file_size <= max {
        return Ok(false);
    }

    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::Start(file_size.saturating_sub(keep)))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    drop(file);

    let skip = buffer
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut file = File::create(log_path)?;
    file.write_all(TRUNCATION_MARKER)?;
    file.write_all(&buffer[skip..])?;

    Ok(true)
}

/// `MakeWriter` over a single appending file handle
#[derive(Clone)]
struct SharedLogFile {
    file: Arc<Mutex<File>>,
}

impl SharedLogFile {
    fn new(file: File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

struct LogHandle {
    file: Arc<Mutex<File>>,
}

impl LogHandle {
    fn lock(&self) -> MutexGuard<'_, File> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for LogHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for SharedLogFile {
    type Writer = LogHandle;

    fn make_writer(&'a self) -> Self::Writer {
        LogHandle {
            file: Arc::clone(&self.file),
        }
    }
}

/// Install the global subscriber, appending plain-text records to
/// [`LOG_FILE_NAME`] under `data_dir`.
///
/// `level` applies to the binary's own target; the engine logs at `warn`
/// unless `RUST_LOG` says otherwise. An oversized log is truncated first.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<()> {
    fs::create_dir_all(data_dir)?;

    let log_path = data_dir.join(LOG_FILE_NAME);

    if let Err(e) = rotate_log_if_needed(&log_path, MAX_LOG_SIZE, KEEP_SIZE) {
        eprintln!("warning: could not truncate {}: {e}", log_path.display());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let default_filter = format!("equityplan={level},equityplan_core=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(SharedLogFile::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .init();

    tracing::info!(log_path = %log_path.display(), "logging initialized");
    Ok(())
}
