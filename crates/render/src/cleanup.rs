//! Teardown registry for a single render.
//!
//! Every observer, timer, and listener a render establishes registers its
//! teardown here. The whole set runs exactly once, either on unmount or
//! before the next fragment's setup, so handlers never accumulate across
//! fragment swaps. This is the subsystem's only cancellation mechanism.

/// A run-once collection of teardown closures.
#[derive(Default)]
pub struct RenderCleanup {
    tasks: Vec<Box<dyn FnOnce() + Send>>,
    finished: bool,
}

impl RenderCleanup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a teardown task. Ignored once the cleanup has run.
    pub fn defer<F>(&mut self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.finished {
            return;
        }
        self.tasks.push(Box::new(task));
    }

    /// Run all registered tasks, in registration order. Idempotent.
    pub fn run(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        for task in self.tasks.drain(..) {
            task();
        }
    }

    /// Whether teardown has already run.
    pub fn finished(&self) -> bool {
        self.finished
    }
}

impl Drop for RenderCleanup {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for RenderCleanup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderCleanup")
            .field("pending", &self.tasks.len())
            .field("finished", &self.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_tasks_run_once_in_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut cleanup = RenderCleanup::new();
        for i in 0..3 {
            let order = Arc::clone(&order);
            cleanup.defer(move || order.lock().unwrap().push(i));
        }
        cleanup.run();
        cleanup.run();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_defer_after_run_ignored() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut cleanup = RenderCleanup::new();
        cleanup.run();
        let count_clone = Arc::clone(&count);
        cleanup.defer(move || {
            count_clone.fetch_add(1, Ordering::Relaxed);
        });
        cleanup.run();
        assert_eq!(count.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_drop_runs_pending_tasks() {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let mut cleanup = RenderCleanup::new();
            let count_clone = Arc::clone(&count);
            cleanup.defer(move || {
                count_clone.fetch_add(1, Ordering::Relaxed);
            });
        }
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }
}
