//! Sanitization allow-lists for externally generated markup.
//!
//! The policy is fail-closed: anything not present in the fixed tag and
//! attribute sets is stripped before the markup can become live DOM. The
//! declarative action attributes are the only interactivity contract the
//! generated markup may rely on.

use std::collections::HashSet;

use crate::error::{PolicyError, PolicyResult};

/// The declarative action attributes recognized by the interaction bridge.
pub const ACTION_ATTRIBUTES: &[&str] = &[
    "data-lead-form",
    "data-href",
    "data-new-tab",
    "data-form-embed",
    "data-form-header",
    "data-widget",
    "data-portal-id",
    "data-hide-on-error",
];

/// CSS selectors that mark a placeholder for the embedded lead-capture
/// widget (in-DOM strategy only).
pub const PLACEHOLDER_SELECTORS: &[&str] = &[
    "[data-form-embed]",
    r#"[data-widget="lead-form"]"#,
    ".lead-form-embed",
    "#lead-form-embed",
];

/// Tags that must never survive sanitization, even if a configuration error
/// ever puts them in the allow-list.
const FORBIDDEN_TAGS: &[&str] = &["script", "iframe", "object", "embed", "frame", "applet"];

/// Sanitization policy for one rendered region
#[derive(Debug, Clone)]
pub struct SanitizePolicy {
    /// Allowed HTML elements
    allowed_tags: HashSet<String>,
    /// Allowed HTML attributes
    allowed_attributes: HashSet<String>,
    /// Allowed URL schemes for href/src values
    allowed_schemes: HashSet<String>,
}

impl SanitizePolicy {
    /// Create the policy with the fixed production allow-lists.
    pub fn new() -> Self {
        let mut allowed_tags = HashSet::new();
        allowed_tags.extend(
            [
                // Structural and content elements
                "a", "article", "aside", "b", "blockquote", "br", "button",
                "caption", "code", "dd", "details", "div", "dl", "dt", "em",
                "figcaption", "figure", "footer", "h1", "h2", "h3", "h4",
                "h5", "h6", "header", "hr", "i", "img", "li", "main", "nav",
                "ol", "p", "pre", "section", "small", "span", "strong",
                "sub", "summary", "sup", "table", "tbody", "td", "tfoot",
                "th", "thead", "tr", "u", "ul",
                // Lead-capture form scaffolding
                "form", "input", "label", "option", "select", "textarea",
                // Embedded stylesheets survive; see the portal renderer for
                // the known scoping gap.
                "style",
                // SVG path primitives for inline icons
                "svg", "path", "circle", "line", "polyline", "rect", "g",
            ]
            .iter()
            .map(|s| s.to_string()),
        );

        let mut allowed_attributes = HashSet::new();
        allowed_attributes.extend(
            [
                "alt", "aria-expanded", "aria-label", "aria-selected",
                "class", "colspan", "d", "fill", "for", "height", "href",
                "id", "loading", "name", "placeholder", "rel", "role",
                "rowspan", "src", "stroke", "stroke-linecap",
                "stroke-linejoin", "stroke-width", "style", "target",
                // HTML parsing lowercases attribute names, but foreign
                // (SVG) content keeps the camelCase local name; carry both.
                "title", "type", "value", "viewBox", "viewbox", "width", "xmlns",
                "cx", "cy", "r", "x", "y", "x1", "x2", "y1", "y2", "points",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        allowed_attributes.extend(ACTION_ATTRIBUTES.iter().map(|s| s.to_string()));

        let mut allowed_schemes = HashSet::new();
        allowed_schemes.extend(
            ["https", "http", "mailto", "tel", "sms"]
                .iter()
                .map(|s| s.to_string()),
        );

        Self {
            allowed_tags,
            allowed_attributes,
            allowed_schemes,
        }
    }

    /// Check if a tag is allowed into live DOM.
    pub fn is_tag_allowed(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        if FORBIDDEN_TAGS.contains(&tag.as_str()) {
            return false;
        }
        self.allowed_tags.contains(&tag)
    }

    /// Check if an attribute is allowed. Inline event handlers are rejected
    /// unconditionally.
    pub fn is_attribute_allowed(&self, attribute: &str) -> bool {
        let attribute = attribute.to_lowercase();
        if attribute.starts_with("on") {
            return false;
        }
        self.allowed_attributes.contains(&attribute)
    }

    /// Check if a URL scheme is allowed for href/src values.
    pub fn is_scheme_allowed(&self, scheme: &str) -> bool {
        self.allowed_schemes.contains(&scheme.to_lowercase())
    }

    /// Validate a scheme, reporting the rejection as a policy error.
    pub fn require_scheme(&self, scheme: &str) -> PolicyResult<()> {
        if self.is_scheme_allowed(scheme) {
            Ok(())
        } else {
            log::debug!("blocked URL scheme: {}", scheme);
            Err(PolicyError::DisallowedScheme {
                scheme: scheme.to_string(),
            })
        }
    }

    /// Allowed tags, for assembling a sanitizer.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.allowed_tags
            .iter()
            .map(|s| s.as_str())
            .filter(|tag| !FORBIDDEN_TAGS.contains(tag))
    }

    /// Allowed attributes, for assembling a sanitizer.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.allowed_attributes
            .iter()
            .map(|s| s.as_str())
            .filter(|attr| !attr.starts_with("on"))
    }

    /// Allowed URL schemes, for assembling a sanitizer.
    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.allowed_schemes.iter().map(|s| s.as_str())
    }
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_allowlist() {
        let policy = SanitizePolicy::default();
        assert!(policy.is_tag_allowed("div"));
        assert!(policy.is_tag_allowed("button"));
        assert!(policy.is_tag_allowed("style"));
        assert!(policy.is_tag_allowed("path"));
        assert!(!policy.is_tag_allowed("script"));
        assert!(!policy.is_tag_allowed("iframe"));
        assert!(!policy.is_tag_allowed("marquee"));
    }

    #[test]
    fn test_attribute_allowlist() {
        let policy = SanitizePolicy::default();
        assert!(policy.is_attribute_allowed("class"));
        assert!(policy.is_attribute_allowed("data-lead-form"));
        assert!(policy.is_attribute_allowed("data-href"));
        assert!(!policy.is_attribute_allowed("onclick"));
        assert!(!policy.is_attribute_allowed("onerror"));
        assert!(!policy.is_attribute_allowed("srcdoc"));
    }

    #[test]
    fn test_event_handlers_always_rejected() {
        let policy = SanitizePolicy::default();
        for handler in ["onclick", "onload", "onmouseover", "ONFOCUS"] {
            assert!(!policy.is_attribute_allowed(handler), "{}", handler);
        }
    }

    #[test]
    fn test_scheme_allowlist() {
        let policy = SanitizePolicy::default();
        assert!(policy.is_scheme_allowed("https"));
        assert!(policy.is_scheme_allowed("tel"));
        assert!(policy.is_scheme_allowed("sms"));
        assert!(policy.is_scheme_allowed("mailto"));
        assert!(!policy.is_scheme_allowed("javascript"));
        assert!(!policy.is_scheme_allowed("data"));
    }

    #[test]
    fn test_require_scheme() {
        let policy = SanitizePolicy::default();
        assert!(policy.require_scheme("tel").is_ok());
        let err = policy.require_scheme("javascript").unwrap_err();
        assert!(matches!(err, PolicyError::DisallowedScheme { .. }));
    }

    #[test]
    fn test_forbidden_tags_never_iterated() {
        let policy = SanitizePolicy::default();
        let tags: Vec<&str> = policy.tags().collect();
        assert!(!tags.contains(&"script"));
        assert!(!tags.contains(&"iframe"));
    }

    #[test]
    fn test_action_attributes_are_allowed() {
        let policy = SanitizePolicy::default();
        for attr in ACTION_ATTRIBUTES {
            assert!(policy.is_attribute_allowed(attr), "{}", attr);
        }
    }
}
