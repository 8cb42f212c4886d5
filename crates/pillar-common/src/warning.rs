//! Deduplicated warnings.
//!
//! Layout and rendering run once per output image, but batch renders repeat
//! the same degenerate conditions (a missing font, an undrawable payload) for
//! every image. These helpers report each unique message once per batch.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Set of warnings already emitted, keyed by `"[component] message"`.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Emit a warning through `tracing` the first time `message` is seen for
/// `component`. Later calls with the same pair are silent.
///
/// # Example
/// ```
/// pillar_common::warning::warn_once("render", "no system font found");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(component, "{message}");
    }
}

/// Forget every recorded warning (call between independent batches).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Whether `message` has already been reported for `component`.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_records_message() {
        warn_once("test-record", "first");
        assert!(was_warned("test-record", "first"));
        assert!(!was_warned("test-record", "second"));
    }

    #[test]
    fn test_same_message_different_component_is_distinct() {
        warn_once("test-a", "shared");
        assert!(was_warned("test-a", "shared"));
        assert!(!was_warned("test-b", "shared"));
    }
}
