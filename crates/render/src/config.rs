use std::time::Duration;

/// Configuration for the rendering pipeline
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Maximum accepted fragment size in bytes
    pub max_fragment_bytes: usize,
    /// Delays after the initial document write at which the sizing engine
    /// re-measures, to catch late style/script settling
    pub settle_delays: Vec<Duration>,
    /// Interval of the fallback polling timer
    pub poll_interval: Duration,
    /// Maximum number of fallback poll ticks per render
    pub poll_budget: u32,
    /// Whether images get `loading="lazy"` during preparation
    pub lazy_images: bool,
    /// Whether a missing widget placeholder is synthesized
    pub synthesize_placeholder: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_fragment_bytes: 512 * 1024, // 512KB fragment limit by default
            settle_delays: vec![
                Duration::from_millis(50),
                Duration::from_millis(250),
                Duration::from_millis(1200),
            ],
            poll_interval: Duration::from_millis(500),
            poll_budget: 20,
            lazy_images: true,
            synthesize_placeholder: true,
        }
    }
}

impl RenderConfig {
    /// Check a fragment against the size limit.
    pub fn fragment_within_limit(&self, fragment: &str) -> bool {
        fragment.len() <= self.max_fragment_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.max_fragment_bytes, 512 * 1024);
        assert_eq!(config.settle_delays.len(), 3);
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.poll_budget, 20);
        assert!(config.lazy_images);
        assert!(config.synthesize_placeholder);
    }

    #[test]
    fn test_fragment_limit() {
        let config = RenderConfig {
            max_fragment_bytes: 8,
            ..Default::default()
        };
        assert!(config.fragment_within_limit("<br>"));
        assert!(!config.fragment_within_limit("<p>too long</p>"));
    }
}
