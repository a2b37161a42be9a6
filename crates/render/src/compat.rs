//! Compatibility shim for the legacy `openLeadFormModal` global.
//!
//! The upstream content format assumes a single process-wide hook, so the
//! shim is one module-scoped slot, reinstalled by every render and cleared
//! by that render's teardown. Two renderer instances mounted concurrently
//! would fight over the slot; that configuration is unsupported.

use std::sync::Arc;

use parking_lot::Mutex;

type LegacyHook = Arc<dyn Fn(Option<&str>) + Send + Sync>;

static HOOK: Mutex<Option<LegacyHook>> = Mutex::new(None);

/// Serializes tests that touch the process-wide slot.
#[cfg(test)]
pub(crate) static TEST_HOOK_GUARD: Mutex<()> = Mutex::new(());

/// Install the hook for the current render, replacing any previous one.
pub fn install_hook<F>(hook: F)
where
    F: Fn(Option<&str>) + Send + Sync + 'static,
{
    *HOOK.lock() = Some(Arc::new(hook));
}

/// Remove the hook. Called from render teardown.
pub fn clear_hook() {
    *HOOK.lock() = None;
}

/// Invoke the legacy entry point. Residual direct-call trigger patterns
/// land here; with no render active the call is dropped.
pub fn open_lead_form(header: Option<&str>) {
    let hook = HOOK.lock().clone();
    match hook {
        Some(hook) => hook(header),
        None => tracing::debug!("legacy lead-form call with no active render"),
    }
}
