//! Engine warnings with once-per-message deduplication.
//!
//! Real pages hit the same unsupported construct hundreds of times per
//! layout pass. Warnings are routed through [`tracing`] so hosts control
//! the sink, and deduplicated so each unique message is reported once.

use std::collections::HashSet;
use std::sync::Mutex;

/// Global set of warnings already emitted (deduplication).
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported feature (emits once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("css", "unsupported at-rule '@supports'");
/// ```
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap()
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(target: "tern", component, "{message}");
    }
}

/// Clear all recorded warnings (call when loading a new page).
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap();
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warn_once_deduplicates() {
        clear_warnings();
        warn_once("test", "message one");
        warn_once("test", "message one");
        let guard = WARNED.lock().unwrap();
        let set = guard.as_ref().unwrap();
        assert!(set.contains("[test] message one"));
    }
}
