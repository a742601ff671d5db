//! One-time diagnostics setup.

use std::panic;
use std::sync::Once;

static INIT: Once = Once::new();

/// Install a panic hook that reports through `tracing` before running the
/// previously installed hook. Idempotent; hashing never depends on it.
pub fn init() {
    INIT.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "xelis_hash", "panic: {info}");
            previous(info);
        }));
    });
}

/// Whether [`init`] has run in this process.
pub fn is_initialized() -> bool {
    INIT.is_completed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
        assert!(is_initialized());
    }
}
