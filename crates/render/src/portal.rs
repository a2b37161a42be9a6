//! In-DOM rendering strategy.
//!
//! The fragment is normalized, patched, sanitized down to the allow-list,
//! and only then handed to the host for direct injection. The region markup
//! leads with the embedded utility stylesheet, standing in for any CDN
//! loader stripped during patching. Live widgets are mounted into
//! placeholder nodes discovered in the sanitized tree (the host's portal
//! mechanism renders them out-of-tree, wrapped in the `hearth-portal-reset`
//! style boundary).
//!
//! Known gap: the allow-list admits raw `<style>` blocks with unscoped
//! selectors, so a fragment's style rules can affect unrelated host
//! elements sharing the same class names. The reset boundary protects the
//! mounted widgets; the rest of the host page is not shielded.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use hearth_policy::{SanitizePolicy, PLACEHOLDER_SELECTORS};

use crate::bridge::{ClickRouter, HostSink};
use crate::cleanup::RenderCleanup;
use crate::compat;
use crate::config::RenderConfig;
use crate::dom;
use crate::error::{RenderError, RenderResult};
use crate::metrics::RenderMetrics;
use crate::normalize::normalize_actions;
use crate::patch::{patch_document, UTILITY_CSS};
use crate::sanitize::{sanitize_fragment, scrub_action_urls};

/// A placeholder node where a live lead-capture widget is mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalTarget {
    /// Stable identifier, from the node or a synthesized index
    pub id: String,
    /// Optional form header from `data-form-header`
    pub header: Option<String>,
}

/// Output of one in-DOM render.
#[derive(Debug, Clone)]
pub struct RenderedRegion {
    /// Container identifier; fresh whenever the fragment identity changes
    pub container_id: String,
    /// Render-safe markup for direct injection
    pub html: String,
    /// Widget mount points discovered (or synthesized) in the markup
    pub portals: Vec<PortalTarget>,
}

/// Renderer for the in-DOM strategy. Deterministic over the fragment: the
/// same fragment always produces the same markup and container identifier
/// for the renderer's lifetime.
pub struct PortalRenderer {
    policy: SanitizePolicy,
    config: RenderConfig,
    metrics: Arc<RenderMetrics>,
    router: ClickRouter,
    generation: u64,
    fragment_hash: Option<u64>,
    container_id: String,
}

impl PortalRenderer {
    pub fn new(policy: SanitizePolicy, config: RenderConfig) -> Self {
        Self {
            policy,
            config,
            metrics: Arc::new(RenderMetrics::new()),
            router: ClickRouter::delegated(),
            generation: 0,
            fragment_hash: None,
            container_id: String::new(),
        }
    }

    /// The delegated click router for the current render's container.
    pub fn router(&self) -> &ClickRouter {
        &self.router
    }

    pub fn metrics(&self) -> &RenderMetrics {
        &self.metrics
    }

    /// Install the legacy-trigger shim for this render, forwarding into the
    /// host sink. The returned cleanup clears the shim; run it on unmount
    /// or before the next fragment's setup.
    pub fn wire(&self, sink: Arc<dyn HostSink + Send + Sync>) -> RenderCleanup {
        compat::install_hook(move |header| sink.open_lead_form(header));
        let mut cleanup = RenderCleanup::new();
        cleanup.defer(compat::clear_hook);
        cleanup
    }

    /// Render a fragment to injection-safe markup plus its portal plan.
    pub fn render(&mut self, fragment: &str) -> RenderResult<RenderedRegion> {
        if !self.config.fragment_within_limit(fragment) {
            return Err(RenderError::FragmentTooLarge(fragment.len()));
        }

        let hash = fragment_identity(fragment);
        if self.fragment_hash != Some(hash) {
            self.generation += 1;
            self.container_id = format!("hearth-embed-{}-{:08x}", self.generation, hash);
            self.fragment_hash = Some(hash);
        }

        let normalized = normalize_actions(fragment);
        self.metrics.add_triggers_rewritten(normalized.rewritten);
        self.metrics.add_handlers_dropped(normalized.dropped);

        let doc = dom::parse_document(&normalized.html);
        patch_document(&doc);
        self.metrics.add_images_prepared(prepare_images(&doc, &self.config));

        let sanitized = sanitize_fragment(&dom::fragment_html(&doc), &self.policy);

        // Placeholder discovery happens on the sanitized tree, the same
        // markup the host injects.
        let sanitized_doc = dom::parse_document(&sanitized);
        scrub_action_urls(&sanitized_doc, &self.policy);
        let portals = self.discover_portals(&sanitized_doc);

        self.metrics.increment_fragments();
        Ok(RenderedRegion {
            container_id: self.container_id.clone(),
            html: format!(
                "<style>{UTILITY_CSS}</style>{}",
                dom::fragment_html(&sanitized_doc)
            ),
            portals,
        })
    }

    fn discover_portals(&self, doc: &kuchiki::NodeRef) -> Vec<PortalTarget> {
        let selector = PLACEHOLDER_SELECTORS.join(", ");
        let mut found: Vec<_> = match doc.select(&selector) {
            Ok(matches) => matches.collect(),
            Err(()) => Vec::new(),
        };

        if found.is_empty() && self.config.synthesize_placeholder {
            // An empty or placeholder-free fragment still yields one usable
            // conversion point.
            if let Some(body) = dom::body(doc) {
                for node in dom::snippet_nodes(
                    r#"<div data-form-embed="" data-portal-id="hearth-portal-fallback"></div>"#,
                ) {
                    body.prepend(node);
                }
                self.metrics.increment_placeholders();
                tracing::debug!("synthesized fallback widget placeholder");
                if let Ok(matches) = doc.select(&selector) {
                    found = matches.collect();
                }
            }
        }

        found
            .iter()
            .enumerate()
            .map(|(index, placeholder)| {
                let mut attributes = placeholder.attributes.borrow_mut();
                let id = attributes
                    .get("id")
                    .or_else(|| attributes.get("data-portal-id"))
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| format!("hearth-portal-{}", index));
                // Address every target from the shell the same way.
                attributes.insert("data-portal-id", id.clone());
                let header = attributes
                    .get("data-form-header")
                    .filter(|value| !value.is_empty())
                    .map(|value| value.to_string());
                PortalTarget { id, header }
            })
            .collect()
    }
}

/// Mark images for lazy loading and hide-on-failure handling.
fn prepare_images(doc: &kuchiki::NodeRef, config: &RenderConfig) -> usize {
    let images: Vec<_> = match doc.select("img") {
        Ok(matches) => matches.collect(),
        Err(()) => return 0,
    };
    let count = images.len();
    for image in images {
        let mut attributes = image.attributes.borrow_mut();
        if config.lazy_images {
            attributes.insert("loading", "lazy".to_string());
        }
        // A failed image is hidden by the shell, not left as a broken glyph.
        attributes.insert("data-hide-on-error", String::new());
    }
    count
}

fn fragment_identity(fragment: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    fragment.hash(&mut hasher);
    hasher.finish()
}
