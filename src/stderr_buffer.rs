//! Holds diagnostic lines back while the TUI owns the terminal.

use std::sync::{Mutex, MutexGuard};

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

fn lock_buffer() -> MutexGuard<'static, Option<Vec<String>>> {
    // A panic while holding the lock leaves plain data behind; keep using it.
    BUFFER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Start holding messages instead of printing them.
pub fn activate() {
    *lock_buffer() = Some(Vec::new());
}

pub fn is_active() -> bool {
    lock_buffer().is_some()
}

/// Stop holding messages and return everything collected so far.
pub fn drain() -> Vec<String> {
    lock_buffer().take().unwrap_or_default()
}

/// Store the message while buffering, otherwise print it to stderr.
pub fn emit(msg: String) {
    let mut guard = lock_buffer();
    match guard.as_mut() {
        Some(buf) => buf.push(msg),
        None => {
            drop(guard);
            eprintln!("{}", msg);
        }
    }
}

/// Like `eprintln!`, but routed through the buffer while it is active.
#[macro_export]
macro_rules! buffered_eprintln {
    ($($arg:tt)*) => {
        $crate::stderr_buffer::emit(format!($($arg)*))
    };
}
