//! Result persistence

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;
use tracing::{info, warn};

use crate::generator::FoundResult;

const FILE_TIMESTAMP: &str = "%Y%m%d_%H%M%S";
const BODY_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistenceError {
    fn io(path: &Path, source: io::Error) -> Self {
        PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Somewhere found results are kept
pub trait ResultSink: Send + Sync {
    /// Store one result; returns a human-readable location
    fn persist(&self, result: &FoundResult) -> Result<String, PersistenceError>;
}

/// Persist, logging instead of failing
pub fn persist_or_warn(sink: &dyn ResultSink, result: &FoundResult) -> Option<String> {
    match sink.persist(result) {
        Ok(location) => {
            info!(chain = %result.chain, location = %location, "result saved");
            Some(location)
        }
        Err(err) => {
            warn!(chain = %result.chain, error = %err, "failed to save result");
            None
        }
    }
}

/// One text file per result, e.g. `results/ETH_wallet_20240101_120000.txt`
#[derive(Debug, Clone)]
pub struct FileResultSink {
    dir: PathBuf,
}

impl Default for FileResultSink {
    fn default() -> Self {
        Self::new("results")
    }
}

impl FileResultSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ResultSink for FileResultSink {
    fn persist(&self, result: &FoundResult) -> Result<String, PersistenceError> {
        fs::create_dir_all(&self.dir).map_err(|e| PersistenceError::io(&self.dir, e))?;

        let stem = format!(
            "{}_wallet_{}",
            result.chain.ticker(),
            result.timestamp.format(FILE_TIMESTAMP)
        );
        let (path, file) = create_unique(&self.dir, &stem)?;
        write_or_discard(&path, file, render_result(result).as_bytes())?;

        Ok(path.display().to_string())
    }
}

/// Text block for one result
pub fn render_result(result: &FoundResult) -> String {
    format!(
        "Chain: {}\nPrivate Key: {}\nAddress: {}\nTime: {}\n",
        result.chain.ticker(),
        result.private_key_export(),
        result.display_address(),
        result.timestamp.format(BODY_TIMESTAMP)
    )
}

/// Write every result of a session to one `wallet_results_*.txt` in `dir`
pub fn export_results(dir: &Path, results: &[FoundResult]) -> Result<PathBuf, PersistenceError> {
    fs::create_dir_all(dir).map_err(|e| PersistenceError::io(dir, e))?;

    let stem = format!("wallet_results_{}", Local::now().format(FILE_TIMESTAMP));
    let (path, file) = create_unique(dir, &stem)?;

    let body = results
        .iter()
        .map(render_result)
        .collect::<Vec<_>>()
        .join("\n");
    write_or_discard(&path, file, body.as_bytes())?;

    Ok(path)
}

/// Write and flush `bytes`; on failure remove `path` so no truncated result is left
fn write_or_discard(path: &Path, mut writer: impl Write, bytes: &[u8]) -> Result<(), PersistenceError> {
    let written = writer.write_all(bytes).and_then(|()| writer.flush());
    drop(writer);

    written.map_err(|e| {
        if let Err(cleanup) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %cleanup, "failed to remove partial result file");
        }
        PersistenceError::io(path, e)
    })
}

/// `stem.txt`, or `stem_1.txt`, `stem_2.txt`... if taken
fn create_unique(dir: &Path, stem: &str) -> Result<(PathBuf, File), PersistenceError> {
    let mut n = 0u32;
    loop {
        let name = if n == 0 {
            format!("{stem}.txt")
        } else {
            format!("{stem}_{n}.txt")
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(PersistenceError::io(&path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use trivanity_chains::{ChainKind, PrivateKey};

    fn sample(chain: ChainKind) -> FoundResult {
        let mut key = [0u8; 32];
        key[31] = 1;
        let private_key = PrivateKey::from_bytes(key.to_vec());
        FoundResult {
            chain,
            address: chain.codec().derive(&private_key).unwrap(),
            private_key,
            timestamp: Local.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileResultSink::new(dir.path().join("results"));

        let location = sink.persist(&sample(ChainKind::Tron)).unwrap();
        assert!(location.ends_with("TRX_wallet_20240517_093000.txt"));

        let body = fs::read_to_string(&location).unwrap();
        assert_eq!(
            body,
            "Chain: TRX\n\
             Private Key: 0000000000000000000000000000000000000000000000000000000000000001\n\
             Address: TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC\n\
             Time: 2024-05-17 09:30:00\n"
        );
    }

    #[test]
    fn test_same_second_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileResultSink::new(dir.path());

        let first = sink.persist(&sample(ChainKind::Ethereum)).unwrap();
        let second = sink.persist(&sample(ChainKind::Ethereum)).unwrap();
        assert_ne!(first, second);
        assert!(second.ends_with("ETH_wallet_20240517_093000_1.txt"));
    }

    #[test]
    fn test_ethereum_file_uses_checksum_address() {
        let dir = tempfile::tempdir().unwrap();
        let location = FileResultSink::new(dir.path())
            .persist(&sample(ChainKind::Ethereum))
            .unwrap();
        let body = fs::read_to_string(location).unwrap();
        assert!(body.contains("Address: 0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf\n"));
    }

    #[test]
    fn test_failure_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the results directory should be
        let blocker = dir.path().join("results");
        fs::write(&blocker, b"").unwrap();

        let sink = FileResultSink::new(&blocker);
        assert!(matches!(
            sink.persist(&sample(ChainKind::Solana)),
            Err(PersistenceError::Io { .. })
        ));
        assert_eq!(persist_or_warn(&sink, &sample(ChainKind::Solana)), None);
    }

    /// Accepts `limit` bytes, then fails like a full disk
    struct FullDisk {
        file: File,
        limit: usize,
    }

    impl Write for FullDisk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.limit == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "no space left"));
            }
            let n = buf.len().min(self.limit);
            self.limit -= n;
            self.file.write(&buf[..n])
        }

        fn flush(&mut self) -> io::Result<()> {
            self.file.flush()
        }
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let (path, file) = create_unique(dir.path(), "TRX_wallet_20240517_093000").unwrap();
        assert!(path.exists());

        let body = render_result(&sample(ChainKind::Tron));
        let writer = FullDisk { file, limit: 10 };
        assert!(matches!(
            write_or_discard(&path, writer, body.as_bytes()),
            Err(PersistenceError::Io { .. })
        ));
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_successful_write_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let (path, file) = create_unique(dir.path(), "stem").unwrap();
        write_or_discard(&path, file, b"Chain: SOL\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Chain: SOL\n");
    }

    #[test]
    fn test_export_results() {
        let dir = tempfile::tempdir().unwrap();
        let results = [sample(ChainKind::Ethereum), sample(ChainKind::Solana)];

        let path = export_results(dir.path(), &results).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("wallet_results_"));

        let body = fs::read_to_string(&path).unwrap();
        assert_eq!(body.matches("Chain: ").count(), 2);
        assert!(body.contains("Chain: SOL\n"));
    }
}
