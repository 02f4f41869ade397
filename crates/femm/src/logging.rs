use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_NAME: &str = "femm.log";

/// Maximum log file size before rotation (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Size to keep after rotation (1 MB of most recent logs)
const KEEP_SIZE: u64 = 1024 * 1024;

const ROTATION_MARKER: &[u8] = b"--- Log rotated (older entries removed) ---\n";

/// Size limits for `femm.log`
#[derive(Debug, Clone, Copy)]
struct Rotation {
    max_size: u64,
    keep_size: u64,
}

impl Rotation {
    const DEFAULT: Rotation = Rotation {
        max_size: MAX_LOG_SIZE,
        keep_size: KEEP_SIZE,
    };

    /// Once `path` grows past `max_size`, rewrite it as the marker followed
    /// by whole lines from its last `keep_size` bytes
    fn apply(self, path: &Path) -> std::io::Result<bool> {
        let len = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        if len <= self.max_size {
            return Ok(false);
        }

        let tail = read_tail(path, self.keep_size.min(len))?;
        let kept = match tail.iter().position(|&b| b == b'\n') {
            Some(newline) => &tail[newline + 1..],
            None => &tail[..],
        };

        let mut file = File::create(path)?;
        file.write_all(ROTATION_MARKER)?;
        file.write_all(kept)?;
        Ok(true)
    }
}

fn read_tail(path: &Path, bytes: u64) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(-(bytes as i64)))?;
    let mut tail = Vec::with_capacity(bytes as usize);
    file.read_to_end(&mut tail)?;
    Ok(tail)
}

/// Log file shared by every event; each event locks it for its write
#[derive(Clone)]
struct SharedLog(Arc<Mutex<File>>);

impl SharedLog {
    fn new(file: File) -> Self {
        Self(Arc::new(Mutex::new(file)))
    }

    fn with_file<R>(
        &self,
        f: impl FnOnce(&mut File) -> std::io::Result<R>,
    ) -> std::io::Result<R> {
        let mut file = self
            .0
            .lock()
            .map_err(|_| std::io::Error::other("log file lock poisoned"))?;
        f(&mut file)
    }
}

impl Write for SharedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.with_file(|file| file.flush())
    }
}

impl<'a> MakeWriter<'a> for SharedLog {
    type Writer = SharedLog;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Initialize logging to `{data_dir}/femm.log` and to stderr.
///
/// The file is rotated by size before it is opened: past 5MB only the last
/// 1MB is kept. `RUST_LOG` overrides `level` when set. Sweeps log from worker
/// threads, so the file layer records thread ids.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<()> {
    fs::create_dir_all(data_dir)?;

    let log_path = data_dir.join(LOG_FILE_NAME);

    let rotated = Rotation::DEFAULT.apply(&log_path).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to rotate log file: {}", e);
        false
    });

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let default_filter = format!("femm={level},femm_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(SharedLog::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .with(
            fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    tracing::debug!(log_path = %log_path.display(), rotated, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotation(max_size: u64, keep_size: u64) -> Rotation {
        Rotation {
            max_size,
            keep_size,
        }
    }

    #[test]
    fn test_small_log_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        fs::write(&path, "one\ntwo\n").unwrap();

        assert!(!rotation(100, 10).apply(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_rotation_keeps_whole_recent_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        let lines: String = (0..20).map(|i| format!("line {i:02}\n")).collect();
        fs::write(&path, &lines).unwrap();

        // 8 bytes per line; the last 20 bytes start mid-line
        assert!(rotation(100, 20).apply(&path).unwrap());

        let rotated = fs::read(&path).unwrap();
        assert!(rotated.starts_with(ROTATION_MARKER));
        assert_eq!(&rotated[ROTATION_MARKER.len()..], b"line 18\nline 19\n");
    }

    #[test]
    fn test_missing_log_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!rotation(1, 1).apply(&dir.path().join(LOG_FILE_NAME)).unwrap());
    }

    #[test]
    fn test_shared_log_writers_append_to_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        let log = SharedLog::new(File::create(&path).unwrap());

        let mut first = log.make_writer();
        let mut second = log.make_writer();
        first.write_all(b"worker 0\n").unwrap();
        second.write_all(b"worker 1\n").unwrap();
        second.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "worker 0\nworker 1\n");
    }
}
