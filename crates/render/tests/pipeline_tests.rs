//! End-to-end tests for the untrusted-content pipeline.
//!
//! These exercise the full render path the way the CRM shell drives it:
//! fragment in, safe markup / document out, clicks and messages routed,
//! heights converged, teardown verified.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;

use hearth_policy::SanitizePolicy;
use hearth_render::{
    deliver_message, normalize_actions, ClickElement, ClickPath, ClickResolution,
    DocumentGeometry, FrameSession, HostAction, HostSink, IsolatedRenderer, PortalRenderer,
    RenderConfig, RenderMetrics, SizeSignal,
};

#[derive(Default)]
struct RecordingSink {
    headers: Mutex<Vec<Option<String>>>,
}

impl HostSink for RecordingSink {
    fn open_lead_form(&self, header: Option<&str>) {
        self.headers
            .lock()
            .unwrap()
            .push(header.map(|h| h.to_string()));
    }
}

fn portal_renderer() -> PortalRenderer {
    PortalRenderer::new(SanitizePolicy::default(), RenderConfig::default())
}

/// A representative generated landing-page region.
const GENERATED_REGION: &str = r#"
<style>:root{--primary-color: {{primary}}; --border-radius: {{radius}};}</style>
<script src="https://cdn.tailwindcss.com"></script>
<section class="container">
  <h2>Trusted Furnace Repair</h2>
  <i data-lucide="phone"></i>
  <button class="cta" onclick="openLeadFormModal('Get a Quote')">Get a Quote</button>
  <a href="javascript:openLeadFormModal('Free Estimate')">Free Estimate</a>
  <span onclick="window.location='tel:+15551234567'">Call now</span>
  <button onclick="trackConversion('hero')">Untracked</button>
  <img src="https://photos.example/crew.jpg" onerror="steal()">
  <div class="accordion-header" id="faq-1">What areas do you serve?</div>
</section>
"#;

#[test]
fn normalization_is_idempotent() {
    let first = normalize_actions(GENERATED_REGION);
    let second = normalize_actions(&first.html);
    assert_eq!(first.html, second.html);
    assert_eq!(second.rewritten, 0);
    assert_eq!(second.dropped, 0);
}

#[test]
fn no_inline_handlers_survive_the_portal_strategy() {
    let mut renderer = portal_renderer();
    let region = renderer.render(GENERATED_REGION).unwrap();

    let lowered = region.html.to_lowercase();
    assert!(!lowered.contains("<script"));
    for handler in ["onclick=", "onerror=", "onload=", "onmouseover="] {
        assert!(!lowered.contains(handler), "found {}", handler);
    }
}

#[test]
fn recognized_triggers_become_declarative_attributes() {
    let mut renderer = portal_renderer();
    let region = renderer.render(GENERATED_REGION).unwrap();

    assert!(region.html.contains(r#"data-lead-form="Get a Quote""#));
    assert!(region.html.contains(r#"data-lead-form="Free Estimate""#));
    assert!(region.html.contains(r#"data-href="tel:+15551234567""#));
    // The unrecognized tracker call is gone, not forwarded.
    assert!(!region.html.contains("trackConversion"));
}

#[test]
fn empty_fragment_still_yields_one_conversion_point() {
    let mut renderer = portal_renderer();
    let region = renderer.render("").unwrap();
    assert_eq!(region.portals.len(), 1);
    assert!(region.html.contains("data-form-embed"));
}

#[test]
fn protocol_trigger_takes_the_launch_path() {
    let normalized = normalize_actions(
        r#"<span onclick="window.location='tel:+15551234567'">Call</span>"#,
    );
    assert!(normalized
        .html
        .contains(r#"data-href="tel:+15551234567""#));

    let config = RenderConfig::default();
    let session = FrameSession::attach(&config, Instant::now());
    let resolution = session.router().route(&ClickPath::new(vec![
        ClickElement::new("span").with_attr("data-href", "tel:+15551234567"),
    ]));
    assert_eq!(
        resolution,
        ClickResolution::Host(HostAction::LaunchProtocol {
            uri: "tel:+15551234567".to_string()
        })
    );
}

#[test]
fn portal_region_carries_the_utility_stylesheet() {
    let mut renderer = portal_renderer();
    let region = renderer.render(GENERATED_REGION).unwrap();
    assert!(!region.html.contains("cdn.tailwindcss.com"));
    assert!(region.html.contains(".flex{display:flex}"));
    assert!(region.html.contains(".hearth-portal-reset"));
}

#[test]
fn window_open_rewrites_keep_the_new_tab_intent() {
    let normalized = normalize_actions(
        r#"<button onclick="window.open('https://x.example/pricing')">Pricing</button>"#,
    );
    assert!(normalized.html.contains(r#"data-new-tab="""#));

    let config = RenderConfig::default();
    let session = FrameSession::attach(&config, Instant::now());
    let resolution = session.router().route(&ClickPath::new(vec![
        ClickElement::new("button")
            .with_attr("data-href", "https://x.example/pricing")
            .with_attr("data-new-tab", ""),
    ]));
    assert_eq!(
        resolution,
        ClickResolution::Host(HostAction::Navigate {
            url: "https://x.example/pricing".to_string(),
            new_tab: true
        })
    );
}

#[test]
fn frame_height_converges_after_async_image_load() {
    let config = RenderConfig::default();
    let now = Instant::now();
    let mut session = FrameSession::attach(&config, now);

    let before_load = DocumentGeometry {
        scroll_height: 320.0,
        offset_height: 320.0,
        client_height: 320.0,
        rect_bottoms: vec![310.0],
    };
    assert_eq!(
        session
            .sizer_mut()
            .observe(SizeSignal::InitialWrite, &before_load),
        Some(320)
    );

    // The hero image finishes loading and pushes an absolutely positioned
    // badge past the scroll height.
    let after_load = DocumentGeometry {
        scroll_height: 620.0,
        offset_height: 620.0,
        client_height: 620.0,
        rect_bottoms: vec![610.0, 648.5],
    };
    assert_eq!(
        session
            .sizer_mut()
            .observe(SizeSignal::ImageLoad, &after_load),
        Some(649)
    );
    assert_eq!(session.sizer_mut().current_height(), Some(649));
}

#[test]
fn unexpected_messages_have_no_observable_effect() {
    let sink = RecordingSink::default();
    let metrics = RenderMetrics::new();

    assert!(!deliver_message(r#"{"type":"SOMETHING_ELSE"}"#, &sink, &metrics));
    assert!(!deliver_message(r#"{"evil":true}"#, &sink, &metrics));
    assert!(sink.headers.lock().unwrap().is_empty());

    assert!(deliver_message(
        r#"{"type":"OPEN_LEAD_FORM","header":"Book Service"}"#,
        &sink,
        &metrics
    ));
    assert_eq!(
        *sink.headers.lock().unwrap(),
        vec![Some("Book Service".to_string())]
    );
}

#[test]
fn teardown_silences_every_registered_source() {
    let config = RenderConfig::default();
    let now = Instant::now();
    let mut session = FrameSession::attach(&config, now);

    let observer_disconnects = Arc::new(AtomicUsize::new(0));
    for _ in 0..3 {
        let disconnects = Arc::clone(&observer_disconnects);
        session.cleanup_mut().defer(move || {
            disconnects.fetch_add(1, Ordering::Relaxed);
        });
    }

    // Simulate the fragment swap: the old session detaches in full before
    // any new wiring is established.
    session.detach();
    assert_eq!(observer_disconnects.load(Ordering::Relaxed), 3);

    // A detached session cannot be reached again; a fresh one starts clean.
    let mut fresh = FrameSession::attach(&config, now);
    assert_eq!(fresh.sizer_mut().due(now), vec![SizeSignal::InitialWrite]);
    let late = fresh
        .sizer_mut()
        .due(now + Duration::from_millis(1300));
    assert!(late.contains(&SizeSignal::SettleDelay));
    fresh.detach();
}

#[test]
fn isolated_document_carries_bridge_and_utility_styles() {
    let renderer = IsolatedRenderer::new(RenderConfig::default());
    let doc = renderer.render(GENERATED_REGION).unwrap();

    assert!(doc.html.starts_with("<!DOCTYPE html>"));
    assert!(doc.html.contains("OPEN_LEAD_FORM"));
    assert!(doc.html.contains(".container{"));
    // Sanitization is skipped; the rewritten trigger attributes carry the
    // interactivity instead of inline script.
    assert!(doc.html.contains(r#"data-lead-form="Get a Quote""#));
    assert!(!doc.html.contains("cdn.tailwindcss.com"));
    assert!(!doc.html.contains("{{primary}}"));
}

#[test]
fn accordion_clicks_stay_inside_the_frame() {
    let config = RenderConfig::default();
    let session = FrameSession::attach(&config, Instant::now());
    let resolution = session.router().route(&ClickPath::new(vec![
        ClickElement::new("span"),
        ClickElement::new("div")
            .with_attr("class", "accordion-header")
            .with_attr("id", "faq-1"),
    ]));
    assert!(matches!(resolution, ClickResolution::Frame(_)));
}

#[test]
fn renders_are_deterministic_per_fragment() {
    let mut renderer = portal_renderer();
    let first = renderer.render(GENERATED_REGION).unwrap();
    let second = renderer.render(GENERATED_REGION).unwrap();
    assert_eq!(first.container_id, second.container_id);
    assert_eq!(first.html, second.html);
    assert_eq!(first.portals, second.portals);

    let swapped = renderer.render("<p>different</p>").unwrap();
    assert_ne!(swapped.container_id, first.container_id);
}
