//! Isolated rendering strategy.
//!
//! The fragment is written into a separate browsing context as a complete
//! document. Its own inline scripts and styles execute natively; the
//! browsing-context boundary, not markup stripping, is the isolation
//! mechanism. The only channel back into the host is a typed message
//! envelope, and the only inbound wiring is the click router and sizer
//! attached after the context's load event.

use std::sync::Arc;
use std::time::Instant;

use hearth_policy::{BridgeMessage, SanitizePolicy};

use crate::bridge::{ClickRouter, HostSink};
use crate::cleanup::RenderCleanup;
use crate::config::RenderConfig;
use crate::dom;
use crate::error::{RenderError, RenderResult};
use crate::metrics::RenderMetrics;
use crate::normalize::normalize_actions;
use crate::patch::{patch_document, UTILITY_CSS};
use crate::sanitize::scrub_action_urls;
use crate::sizing::FrameSizer;

/// Script injected into the isolated document. It redefines the legacy
/// global to post the typed envelope to the parent, covering dynamically
/// constructed triggers the normalizer cannot statically rewrite.
pub const BRIDGE_SCRIPT: &str = r#"(function () {
  window.openLeadFormModal = function (header) {
    window.parent.postMessage({ type: "OPEN_LEAD_FORM", header: header || null }, "*");
  };
})();"#;

/// Body used when the fragment is empty; the context never renders a
/// bare document.
const EMPTY_BODY: &str = r#"<div class="hearth-empty"></div>"#;

/// A complete document ready to be written into the isolated context.
#[derive(Debug, Clone)]
pub struct IsolatedDocument {
    pub html: String,
}

/// Renderer for the isolated strategy.
pub struct IsolatedRenderer {
    policy: SanitizePolicy,
    config: RenderConfig,
    metrics: Arc<RenderMetrics>,
}

impl IsolatedRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            policy: SanitizePolicy::default(),
            config,
            metrics: Arc::new(RenderMetrics::new()),
        }
    }

    pub fn metrics(&self) -> &RenderMetrics {
        &self.metrics
    }

    /// Assemble the full document for a fragment. Normalization and
    /// patching run; allow-list stripping intentionally does not.
    pub fn render(&self, fragment: &str) -> RenderResult<IsolatedDocument> {
        if !self.config.fragment_within_limit(fragment) {
            return Err(RenderError::FragmentTooLarge(fragment.len()));
        }

        let normalized = normalize_actions(fragment);
        self.metrics.add_triggers_rewritten(normalized.rewritten);
        self.metrics.add_handlers_dropped(normalized.dropped);

        let doc = dom::parse_document(&normalized.html);
        patch_document(&doc);
        scrub_action_urls(&doc, &self.policy);
        let mut body = dom::fragment_html(&doc);
        if body.trim().is_empty() {
            body = EMPTY_BODY.to_string();
        }

        self.metrics.increment_fragments();
        Ok(IsolatedDocument {
            html: assemble_document(&body),
        })
    }
}

fn assemble_document(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head>\
         <meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <style>{UTILITY_CSS}</style>\
         <script>{BRIDGE_SCRIPT}</script>\
         </head><body>{body}</body></html>"
    )
}

/// Per-load wiring for one isolated context. Created after the context's
/// load event fires — attaching earlier risks losing the listener to the
/// context's own internal write. Holds the capturing click router, the
/// sizer, and the teardown set; `detach` tears everything down together.
pub struct FrameSession {
    router: ClickRouter,
    sizer: FrameSizer,
    cleanup: RenderCleanup,
}

impl FrameSession {
    pub fn attach(config: &RenderConfig, now: Instant) -> Self {
        let mut sizer = FrameSizer::new(config);
        sizer.bootstrap(now);
        Self {
            router: ClickRouter::frame(),
            sizer,
            cleanup: RenderCleanup::new(),
        }
    }

    pub fn router(&self) -> &ClickRouter {
        &self.router
    }

    pub fn sizer_mut(&mut self) -> &mut FrameSizer {
        &mut self.sizer
    }

    /// Registry for the shell's observer/listener disconnects.
    pub fn cleanup_mut(&mut self) -> &mut RenderCleanup {
        &mut self.cleanup
    }

    /// Tear down the session: cancel the sizing schedule and run every
    /// registered teardown. Used on unmount and before a fragment swap.
    pub fn detach(mut self) {
        self.sizer.teardown();
        self.cleanup.run();
    }
}

/// Parent-side message pump. Only the exact `OPEN_LEAD_FORM` envelope has
/// an effect; everything else is counted and dropped.
pub fn deliver_message(raw: &str, sink: &dyn HostSink, metrics: &RenderMetrics) -> bool {
    match hearth_policy::parse_message(raw) {
        Some(BridgeMessage::OpenLeadForm { header }) => {
            sink.open_lead_form(header.as_deref());
            true
        }
        None => {
            metrics.increment_messages_ignored();
            false
        }
    }
}
