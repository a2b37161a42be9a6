//! Icon and style patching for generated fragments.
//!
//! The content generator emits icon placeholders, theme tokens, and CDN
//! stylesheet loaders it expects a downstream runtime to resolve. When any
//! of that upstream data is missing, rendering must degrade to sensible
//! defaults rather than show broken icons or literal `{{token}}` text.

use kuchiki::NodeRef;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::dom;

/// Minimal utility-class stylesheet covering the layout, spacing, and
/// typography classes the generator is known to emit, so fragments stay
/// visually coherent without a network-loaded dependency. Includes the
/// style-reset boundary class that keeps host styles out of portal mounts.
pub const UTILITY_CSS: &str = "\
.container{max-width:72rem;margin-left:auto;margin-right:auto;padding-left:1rem;padding-right:1rem}\
.flex{display:flex}.grid{display:grid}.hidden{display:none}\
.flex-col{flex-direction:column}.items-center{align-items:center}\
.justify-center{justify-content:center}.justify-between{justify-content:space-between}\
.gap-2{gap:0.5rem}.gap-4{gap:1rem}.gap-8{gap:2rem}\
.p-2{padding:0.5rem}.p-4{padding:1rem}.p-8{padding:2rem}\
.px-4{padding-left:1rem;padding-right:1rem}.py-2{padding-top:0.5rem;padding-bottom:0.5rem}\
.m-0{margin:0}.mt-2{margin-top:0.5rem}.mt-4{margin-top:1rem}.mb-4{margin-bottom:1rem}\
.text-center{text-align:center}.text-sm{font-size:0.875rem}.text-lg{font-size:1.125rem}\
.text-xl{font-size:1.25rem}.text-2xl{font-size:1.5rem}.font-bold{font-weight:700}\
.rounded{border-radius:0.25rem}.rounded-lg{border-radius:0.5rem}\
.w-full{width:100%}.h-full{height:100%}\
.hearth-portal-reset{all:initial;display:block;font-family:inherit}\
.hearth-empty{min-height:1px}";

/// CDN hosts whose utility-CSS loader scripts are removed outright.
const CDN_SCRIPT_HOSTS: &[&str] = &["cdn.tailwindcss.com", "unpkg.com", "cdn.jsdelivr.net"];

/// Inline vector bodies for the named icon set, 24x24 viewBox.
const ICON_PATHS: &[(&str, &str)] = &[
    ("phone", r#"<path d="M22 16.92v3a2 2 0 0 1-2.18 2 19.79 19.79 0 0 1-8.63-3.07 19.5 19.5 0 0 1-6-6A19.79 19.79 0 0 1 2.08 4.18 2 2 0 0 1 4.06 2h3a2 2 0 0 1 2 1.72c.13.96.36 1.9.7 2.81a2 2 0 0 1-.45 2.11L8.09 9.91a16 16 0 0 0 6 6l1.27-1.22a2 2 0 0 1 2.11-.45c.91.34 1.85.57 2.81.7A2 2 0 0 1 22 16.92z"/>"#),
    ("mail", r#"<rect width="20" height="16" x="2" y="4" rx="2"/><path d="m22 7-8.97 5.7a1.94 1.94 0 0 1-2.06 0L2 7"/>"#),
    ("map-pin", r#"<path d="M20 10c0 6-8 12-8 12s-8-6-8-12a8 8 0 0 1 16 0Z"/><circle cx="12" cy="10" r="3"/>"#),
    ("star", r#"<polyline points="12 2 15.09 8.26 22 9.27 17 14.14 18.18 21.02 12 17.77 5.82 21.02 7 14.14 2 9.27 8.91 8.26 12 2"/>"#),
    ("check", r#"<polyline points="20 6 9 17 4 12"/>"#),
    ("clock", r#"<circle cx="12" cy="12" r="10"/><polyline points="12 6 12 12 16 14"/>"#),
    ("arrow-right", r#"<path d="M5 12h14"/><path d="m12 5 7 7-7 7"/>"#),
];

/// Fallback body for unrecognized icon names.
const FALLBACK_ICON: &str = r#"<circle cx="12" cy="12" r="9"/>"#;

lazy_static! {
    // A custom-property declaration whose value still contains an
    // unresolved template token, e.g. `--primary-color: {{primary}};`
    static ref UNRESOLVED_PROPERTY: Regex = Regex::new(
        r"(--[A-Za-z0-9_-]+)\s*:\s*[^;{}]*\{\{[^{}]*\}\}[^;{}]*"
    ).unwrap();
}

/// Outcome of one patching pass.
#[derive(Debug, Clone, Default)]
pub struct PatchSummary {
    pub icons_replaced: usize,
    pub style_tokens_patched: usize,
    pub cdn_scripts_removed: usize,
}

/// Design-system default for a custom property left unresolved upstream,
/// keyed off the property's semantic name.
fn style_default(property: &str) -> &'static str {
    let name = property.to_lowercase();
    if name.contains("radius") {
        "0.5rem"
    } else if name.contains("stroke") || name.ends_with("width") {
        "2px"
    } else if name.contains("primary") {
        "hsl(214, 70%, 45%)"
    } else if name.contains("secondary") {
        "hsl(160, 45%, 40%)"
    } else if name.contains("accent") {
        "hsl(32, 90%, 55%)"
    } else if name.contains("background") || name.contains("-bg") {
        "hsl(210, 20%, 98%)"
    } else if name.contains("foreground") || name.contains("text") {
        "hsl(215, 25%, 17%)"
    } else {
        "hsl(210, 15%, 50%)"
    }
}

fn icon_markup(name: &str) -> String {
    let inner = ICON_PATHS
        .iter()
        .find(|(icon, _)| *icon == name)
        .map(|(_, body)| *body)
        .unwrap_or(FALLBACK_ICON);
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="24" height="24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" role="img" aria-label="{name}">{inner}</svg>"#
    )
}

/// Replace `data-lucide` icon placeholders with inline vector markup.
pub fn patch_icons(doc: &NodeRef) -> usize {
    let placeholders: Vec<_> = match doc.select("[data-lucide]") {
        Ok(matches) => matches.collect(),
        Err(()) => return 0,
    };
    let mut replaced = 0;
    for placeholder in placeholders {
        let name = placeholder
            .attributes
            .borrow()
            .get("data-lucide")
            .unwrap_or("")
            .to_string();
        for node in dom::snippet_nodes(&icon_markup(&name)) {
            placeholder.as_node().insert_before(node);
        }
        placeholder.as_node().detach();
        replaced += 1;
    }
    replaced
}

/// Rewrite unresolved `{{…}}` tokens in embedded `<style>` blocks to
/// design-system defaults so placeholder text never renders.
pub fn patch_style_placeholders(doc: &NodeRef) -> usize {
    let styles: Vec<_> = match doc.select("style") {
        Ok(matches) => matches.collect(),
        Err(()) => return 0,
    };
    let mut patched = 0;
    for style in styles {
        let css = style.as_node().text_contents();
        if !css.contains("{{") {
            continue;
        }
        let count = UNRESOLVED_PROPERTY.find_iter(&css).count();
        if count == 0 {
            continue;
        }
        let rewritten = UNRESOLVED_PROPERTY
            .replace_all(&css, |caps: &Captures| {
                format!("{}: {}", &caps[1], style_default(&caps[1]))
            })
            .into_owned();
        for child in style.as_node().children().collect::<Vec<_>>() {
            child.detach();
        }
        style.as_node().append(NodeRef::new_text(rewritten));
        patched += count;
    }
    patched
}

/// Remove CDN-hosted utility-CSS loader scripts; `UTILITY_CSS` stands in.
pub fn strip_cdn_scripts(doc: &NodeRef) -> usize {
    let scripts: Vec<_> = match doc.select("script[src]") {
        Ok(matches) => matches.collect(),
        Err(()) => return 0,
    };
    let mut removed = 0;
    for script in scripts {
        let src = script
            .attributes
            .borrow()
            .get("src")
            .unwrap_or("")
            .to_string();
        if CDN_SCRIPT_HOSTS.iter().any(|host| src.contains(host)) {
            script.as_node().detach();
            removed += 1;
        }
    }
    removed
}

/// Run every patching pass over a parsed fragment.
pub fn patch_document(doc: &NodeRef) -> PatchSummary {
    let summary = PatchSummary {
        icons_replaced: patch_icons(doc),
        style_tokens_patched: patch_style_placeholders(doc),
        cdn_scripts_removed: strip_cdn_scripts(doc),
    };
    if summary.icons_replaced > 0
        || summary.style_tokens_patched > 0
        || summary.cdn_scripts_removed > 0
    {
        tracing::debug!(
            icons = summary.icons_replaced,
            style_tokens = summary.style_tokens_patched,
            cdn_scripts = summary.cdn_scripts_removed,
            "patched fragment"
        );
    }
    summary
}
