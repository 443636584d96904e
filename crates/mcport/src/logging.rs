use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use color_eyre::eyre::WrapErr;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file name inside the output directory
pub const LOG_FILE: &str = "mcport.log";
/// Maximum log file size before trimming (2 MB)
const MAX_LOG_SIZE: u64 = 2 * 1024 * 1024;
/// Bytes of the most recent entries kept after trimming
const KEEP_SIZE: u64 = 512 * 1024;

/// Trim the log to its most recent `KEEP_SIZE` bytes once it exceeds `MAX_LOG_SIZE`.
fn trim_log_if_needed(log_path: &Path) -> std::io::Result<()> {
    let Ok(metadata) = fs::metadata(log_path) else {
        return Ok(());
    };
    if metadata.len() <= MAX_LOG_SIZE {
        return Ok(());
    }

    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::Start(metadata.len().saturating_sub(KEEP_SIZE)))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    drop(file);

    // Start at a line boundary
    let skip = buffer
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |i| i + 1);

    let mut file = File::create(log_path)?;
    file.write_all(b"--- log trimmed (older entries removed) ---\n")?;
    file.write_all(&buffer[skip..])?;
    Ok(())
}

/// Default filter directive for a CLI log level
pub fn default_filter(level: &str) -> String {
    format!("mcport={level},mcport_core=warn")
}

/// Initialize logging to `{output_dir}/mcport.log`.
///
/// `RUST_LOG` takes precedence over `level`. Runs append to the same file,
/// which is trimmed when it grows past a few megabytes.
pub fn init_logging(output_dir: &Path, level: &str) -> color_eyre::Result<()> {
    fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("creating output directory {}", output_dir.display()))?;

    let log_path = output_dir.join(LOG_FILE);
    if let Err(e) = trim_log_if_needed(&log_path) {
        eprintln!("Warning: failed to trim log file: {e}");
    }

    let appender = tracing_appender::rolling::never(output_dir, LOG_FILE);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()
        .wrap_err("installing tracing subscriber")?;

    tracing::info!(log_path = %log_path.display(), "mcport logging initialized");
    Ok(())
}
