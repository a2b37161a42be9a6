//! Interaction bridge: turns clicks inside rendered content into host
//! side effects.
//!
//! A click is delivered as the element chain from the click target outward
//! (the `closest()` view of the event). Resolution walks an ordered table
//! of matcher/handler pairs; the first rule with a matching element along
//! the chain wins. New declarative conventions are added as table entries,
//! not new branches.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// Side effects the host application performs on behalf of rendered content.
/// Serializable so the shell can forward resolutions across its own
/// process or script boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum HostAction {
    /// Open the lead-capture flow, optionally with a form header.
    OpenLeadForm { header: Option<String> },
    /// Client-side navigation, same tab or new tab.
    Navigate { url: String, new_tab: bool },
    /// Launch a tel/mailto/sms handler. The shell dispatches this through a
    /// synthesized same-document anchor click so the user-gesture context
    /// required by OS share-sheets survives.
    LaunchProtocol { uri: String },
}

/// State toggles performed inside the isolated document itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum FrameAction {
    /// Toggle an accordion section's `active` class and ARIA expanded state.
    ToggleAccordion { target: Option<String> },
    /// Activate a tab button and its panel.
    ActivateTab { target: Option<String> },
}

/// Outcome of routing one click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickResolution {
    /// The host performs a side effect.
    Host(HostAction),
    /// The isolated document mutates its own state.
    Frame(FrameAction),
    /// The browser's default behavior is allowed to proceed.
    NativeDefault,
    /// No rule matched; the click is inert.
    Unhandled,
}

/// Outward notification surface of the rendering subsystem. The lead-capture
/// UI is an external collaborator that only listens for this event.
pub trait HostSink {
    /// Open the lead-capture flow with an optional header.
    fn open_lead_form(&self, header: Option<&str>);
}

/// One element along the click chain, innermost first.
#[derive(Debug, Clone)]
pub struct ClickElement {
    tag: String,
    attributes: HashMap<String, String>,
}

impl ClickElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .insert(name.to_lowercase(), value.to_string());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|value| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Identifier used to address this element from the shell.
    fn target_id(&self, data_attr: &str) -> Option<String> {
        self.attr("id")
            .or_else(|| self.attr(data_attr).filter(|value| !value.is_empty()))
            .map(|value| value.to_string())
    }
}

/// The element chain at a click point, from the target outward.
#[derive(Debug, Clone, Default)]
pub struct ClickPath {
    elements: Vec<ClickElement>,
}

impl ClickPath {
    pub fn new(elements: Vec<ClickElement>) -> Self {
        Self { elements }
    }

    /// Innermost element matching a predicate, modeling `closest()`.
    pub fn closest(&self, matches: fn(&ClickElement) -> bool) -> Option<&ClickElement> {
        self.elements.iter().find(|element| matches(element))
    }
}

/// True for URIs handled by an external protocol launcher.
pub fn is_protocol_uri(uri: &str) -> bool {
    if let Ok(url) = Url::parse(uri) {
        return matches!(url.scheme(), "tel" | "mailto" | "sms");
    }
    false
}

type MatchFn = fn(&ClickElement) -> bool;
type ResolveFn = fn(&ClickElement) -> ClickResolution;

/// A matcher/handler pair in the routing table.
struct ClickRule {
    name: &'static str,
    matches: MatchFn,
    resolve: ResolveFn,
}

fn match_lead_form(element: &ClickElement) -> bool {
    element.has_attr("data-lead-form")
}

fn resolve_lead_form(element: &ClickElement) -> ClickResolution {
    let header = element
        .attr("data-lead-form")
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string());
    ClickResolution::Host(HostAction::OpenLeadForm { header })
}

fn match_href(element: &ClickElement) -> bool {
    element.has_attr("data-href")
}

fn resolve_href(element: &ClickElement) -> ClickResolution {
    let uri = element.attr("data-href").unwrap_or("").to_string();
    if is_protocol_uri(&uri) {
        return ClickResolution::Host(HostAction::LaunchProtocol { uri });
    }
    let new_tab = element.has_attr("data-new-tab") || element.attr("target") == Some("_blank");
    ClickResolution::Host(HostAction::Navigate { url: uri, new_tab })
}

fn match_protocol_anchor(element: &ClickElement) -> bool {
    element.tag() == "a"
        && element
            .attr("href")
            .map(is_protocol_uri)
            .unwrap_or(false)
}

fn resolve_protocol_anchor(_element: &ClickElement) -> ClickResolution {
    ClickResolution::NativeDefault
}

fn match_accordion(element: &ClickElement) -> bool {
    element.has_class("accordion-header") || element.has_attr("data-accordion")
}

fn resolve_accordion(element: &ClickElement) -> ClickResolution {
    ClickResolution::Frame(FrameAction::ToggleAccordion {
        target: element.target_id("data-accordion"),
    })
}

fn match_tab(element: &ClickElement) -> bool {
    element.has_class("tab-button")
        || element.attr("role") == Some("tab")
        || element.has_attr("data-tab")
}

fn resolve_tab(element: &ClickElement) -> ClickResolution {
    ClickResolution::Frame(FrameAction::ActivateTab {
        target: element.target_id("data-tab"),
    })
}

/// Delegated click router over an ordered rule table.
pub struct ClickRouter {
    rules: Vec<ClickRule>,
}

impl ClickRouter {
    /// Router for the in-DOM strategy: only `data-lead-form` bearers are
    /// handled by the delegated listener; everything else keeps its
    /// sanitized default behavior.
    pub fn delegated() -> Self {
        Self {
            rules: vec![ClickRule {
                name: "lead-form",
                matches: match_lead_form,
                resolve: resolve_lead_form,
            }],
        }
    }

    /// Router for the isolated strategy, in priority order.
    pub fn frame() -> Self {
        Self {
            rules: vec![
                ClickRule {
                    name: "lead-form",
                    matches: match_lead_form,
                    resolve: resolve_lead_form,
                },
                ClickRule {
                    name: "href",
                    matches: match_href,
                    resolve: resolve_href,
                },
                ClickRule {
                    name: "protocol-anchor",
                    matches: match_protocol_anchor,
                    resolve: resolve_protocol_anchor,
                },
                ClickRule {
                    name: "accordion",
                    matches: match_accordion,
                    resolve: resolve_accordion,
                },
                ClickRule {
                    name: "tab",
                    matches: match_tab,
                    resolve: resolve_tab,
                },
            ],
        }
    }

    /// Resolve a click against the rule table.
    pub fn route(&self, path: &ClickPath) -> ClickResolution {
        for rule in &self.rules {
            if let Some(element) = path.closest(rule.matches) {
                let resolution = (rule.resolve)(element);
                tracing::debug!(rule = rule.name, ?resolution, "routed click");
                return resolution;
            }
        }
        ClickResolution::Unhandled
    }
}
