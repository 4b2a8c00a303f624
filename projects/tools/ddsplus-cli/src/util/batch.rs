use super::Throughput;
use crate::error::CliError;
use bytesize::ByteSize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{error, info};

#[cfg(feature = "multithreaded")]
use rayon::prelude::*;

/// Runs `process` on every file in `files`, in parallel with the `multithreaded` feature.
///
/// `process` returns the number of bytes it read. Failures are logged and do not stop the
/// batch; the number of failed files is returned.
pub fn process_batch<F>(files: &[PathBuf], process: F) -> usize
where
    F: Fn(&Path) -> Result<u64, CliError> + Sync,
{
    let start = Instant::now();
    let bytes_processed = AtomicU64::new(0);
    let failures = AtomicU64::new(0);

    let run = |path: &PathBuf| match process(path) {
        Ok(bytes) => {
            bytes_processed.fetch_add(bytes, Ordering::Relaxed);
        }
        Err(e) => {
            error!("{}: {e}", path.display());
            failures.fetch_add(1, Ordering::Relaxed);
        }
    };

    #[cfg(feature = "multithreaded")]
    files.par_iter().for_each(run);
    #[cfg(not(feature = "multithreaded"))]
    files.iter().for_each(run);

    let elapsed = start.elapsed();
    let total_bytes = bytes_processed.load(Ordering::Relaxed);
    info!(
        files = files.len(),
        failed = failures.load(Ordering::Relaxed),
        "processed {} in {elapsed:.2?} ({})",
        ByteSize(total_bytes),
        Throughput::new(total_bytes, elapsed.as_secs_f64())
    );
    failures.load(Ordering::Relaxed) as usize
}
