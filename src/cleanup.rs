//! Best-effort deletion of kept temp files at process exit.
//!
//! Sock files and the per-command input/output/error files are left on disk
//! while the process runs. They are registered here and removed by an
//! `atexit` handler when the process exits normally.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

static HANDLER_REGISTERED: AtomicBool = AtomicBool::new(false);
static PENDING: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

/// Marks a file for deletion when the process exits.
pub fn delete_on_exit(path: &Path) {
    register_exit_handler();
    if let Ok(mut pending) = PENDING.lock() {
        pending.push(path.to_path_buf());
    }
}

/// Register the exit handler with atexit (idempotent).
fn register_exit_handler() {
    if HANDLER_REGISTERED.swap(true, Ordering::SeqCst) {
        return;
    }
    // SAFETY: `remove_pending` is a plain `extern "C" fn()` that does not unwind.
    unsafe {
        libc::atexit(remove_pending);
    }
}

/// Called by atexit on process exit.
extern "C" fn remove_pending() {
    let paths = match PENDING.lock() {
        Ok(mut pending) => std::mem::take(&mut *pending),
        Err(_) => return,
    };
    for path in paths {
        let _ = fs::remove_file(path);
    }
}
