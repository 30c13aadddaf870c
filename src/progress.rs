//! Progress reporting for downloads.

/// Progress callback invoked as download bytes arrive.
///
/// # Arguments
///
/// * `current` - Bytes transferred so far
/// * `total` - Total expected bytes, `0` when the server did not declare one
/// * `label` - Name of the file being downloaded
///
/// The callback is purely observational: it must not block and must not
/// panic. It is invoked from the downloading thread, once per block for
/// single-shot downloads and once per chunk for ranged downloads.
pub type ProgressCallback = Box<dyn Fn(u64, u64, &str) + Send + Sync>;

/// Invoke the callback if one is attached.
pub(crate) fn report(progress: Option<&ProgressCallback>, current: u64, total: u64, label: &str) {
    if let Some(cb) = progress {
        cb(current, total, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_report_invokes_attached_callback() {
        let seen = Arc::new(AtomicU64::new(0));
        let seen_clone = Arc::clone(&seen);

        let callback: ProgressCallback = Box::new(move |current, _total, _label| {
            seen_clone.store(current, Ordering::SeqCst);
        });

        report(Some(&callback), 42, 100, "data.zip");
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn test_report_without_callback_is_noop() {
        report(None, 42, 100, "data.zip");
    }
}
