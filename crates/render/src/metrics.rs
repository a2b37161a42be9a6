use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for tracking pipeline behavior across renders
#[derive(Debug, Default)]
pub struct RenderMetrics {
    /// Number of fragments rendered
    pub fragments_rendered: AtomicUsize,
    /// Number of legacy triggers rewritten to declarative attributes
    pub triggers_rewritten: AtomicUsize,
    /// Number of inline handlers dropped outright
    pub handlers_dropped: AtomicUsize,
    /// Number of fallback widget placeholders synthesized
    pub placeholders_synthesized: AtomicUsize,
    /// Number of images prepared for lazy loading / error hiding
    pub images_prepared: AtomicUsize,
    /// Number of cross-context messages ignored as malformed or unexpected
    pub messages_ignored: AtomicUsize,
}

impl RenderMetrics {
    /// Create new render metrics
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_fragments(&self) {
        self.fragments_rendered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_triggers_rewritten(&self, count: usize) {
        self.triggers_rewritten.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_handlers_dropped(&self, count: usize) {
        self.handlers_dropped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_placeholders(&self) {
        self.placeholders_synthesized.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_images_prepared(&self, count: usize) {
        self.images_prepared.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_messages_ignored(&self) {
        self.messages_ignored.fetch_add(1, Ordering::Relaxed);
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.fragments_rendered.store(0, Ordering::Relaxed);
        self.triggers_rewritten.store(0, Ordering::Relaxed);
        self.handlers_dropped.store(0, Ordering::Relaxed);
        self.placeholders_synthesized.store(0, Ordering::Relaxed);
        self.images_prepared.store(0, Ordering::Relaxed);
        self.messages_ignored.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_counters() {
        let metrics = RenderMetrics::new();
        metrics.increment_fragments();
        metrics.add_triggers_rewritten(3);
        metrics.add_handlers_dropped(2);
        metrics.increment_placeholders();

        assert_eq!(metrics.fragments_rendered.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.triggers_rewritten.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.handlers_dropped.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.placeholders_synthesized.load(Ordering::Relaxed), 1);

        metrics.reset();
        assert_eq!(metrics.triggers_rewritten.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_thread_safety() {
        let metrics = Arc::new(RenderMetrics::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let metrics = Arc::clone(&metrics);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    metrics.increment_fragments();
                    metrics.increment_messages_ignored();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.fragments_rendered.load(Ordering::Relaxed), 1000);
        assert_eq!(metrics.messages_ignored.load(Ordering::Relaxed), 1000);
    }
}
