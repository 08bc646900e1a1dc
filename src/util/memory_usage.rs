use log::{debug, info};
use psutil::process::os::linux::ProcessExt;
use psutil::process::Process;
use std::fmt::Arguments;

const BYTES_IN_MB: f64 = 1024_f64 * 1024_f64;

/// Logs the memory footprint of the current process. Failures to read `/proc` are only logged.
#[allow(clippy::cast_precision_loss)]
pub fn print_memory_usage(msg: Arguments) {
    let mem = match Process::new(std::process::id()).map(|process| process.procfs_statm()) {
        Ok(Ok(mem)) => mem,
        Ok(Err(e)) => {
            debug!("Could not read memory details [{}]: {}", msg, e);
            return;
        }
        Err(e) => {
            debug!("Could not inspect current process [{}]: {}", msg, e);
            return;
        }
    };
    info!(
        "Memory usage: total = {:.3} MB, rss = {:.3} MB, shared = {:.3} MB [{}]",
        mem.size as f64 / BYTES_IN_MB,
        mem.resident as f64 / BYTES_IN_MB,
        mem.shared as f64 / BYTES_IN_MB,
        msg
    );
}
