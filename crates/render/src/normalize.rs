//! Action normalization for legacy call-to-action markup.
//!
//! The content generator historically wired interactivity through inline
//! scripts: `onclick="openLeadFormModal('…')"`, `href="javascript:…"`,
//! `onclick="window.location='tel:…'"`. This pass rewrites every recognized
//! trigger into one of the declarative attributes (`data-lead-form`,
//! `data-href`) and deletes every inline handler it cannot account for.
//!
//! It runs before sanitization or document assembly in either strategy —
//! for the isolated renderer it is the only defense against inline-script
//! execution, since that strategy does not strip markup.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Output of one normalization pass.
#[derive(Debug, Clone)]
pub struct Normalized {
    /// The rewritten fragment
    pub html: String,
    /// Legacy triggers rewritten to declarative attributes
    pub rewritten: usize,
    /// Inline handlers deleted without a rewrite
    pub dropped: usize,
}

lazy_static! {
    // Lead-form triggers. The attribute delimiter and the argument
    // delimiter are always opposite quotes, so each pattern has two forms.
    static ref LEAD_FORM_DQ: Regex = Regex::new(
        r#"(?i)\sonclick\s*=\s*"[^"]*openLeadFormModal\s*\(\s*(?:'([^']*)'\s*)?\)[^"]*""#
    ).unwrap();
    static ref LEAD_FORM_SQ: Regex = Regex::new(
        r#"(?i)\sonclick\s*=\s*'[^']*openLeadFormModal\s*\(\s*(?:"([^"]*)"\s*)?\)[^']*'"#
    ).unwrap();

    // javascript: hrefs calling the lead-form function. The rewritten
    // element keeps href="#" so the anchor has no navigation fallback.
    static ref JS_HREF_DQ: Regex = Regex::new(
        r#"(?i)\shref\s*=\s*"javascript:[^"]*openLeadFormModal\s*\(\s*(?:'([^']*)'\s*)?\)[^"]*""#
    ).unwrap();
    static ref JS_HREF_SQ: Regex = Regex::new(
        r#"(?i)\shref\s*=\s*'javascript:[^']*openLeadFormModal\s*\(\s*(?:"([^"]*)"\s*)?\)[^']*'"#
    ).unwrap();

    // Navigation triggers: window.open, location assignment, assign/replace.
    static ref WINDOW_OPEN_DQ: Regex = Regex::new(
        r#"(?i)\sonclick\s*=\s*"[^"]*window\.open\s*\(\s*'([^']*)'[^"]*""#
    ).unwrap();
    static ref WINDOW_OPEN_SQ: Regex = Regex::new(
        r#"(?i)\sonclick\s*=\s*'[^']*window\.open\s*\(\s*"([^"]*)"[^']*'"#
    ).unwrap();
    static ref LOCATION_CALL_DQ: Regex = Regex::new(
        r#"(?i)\sonclick\s*=\s*"[^"]*location\.(?:assign|replace)\s*\(\s*'([^']*)'\s*\)[^"]*""#
    ).unwrap();
    static ref LOCATION_CALL_SQ: Regex = Regex::new(
        r#"(?i)\sonclick\s*=\s*'[^']*location\.(?:assign|replace)\s*\(\s*"([^"]*)"\s*\)[^']*'"#
    ).unwrap();
    static ref LOCATION_ASSIGN_DQ: Regex = Regex::new(
        r#"(?i)\sonclick\s*=\s*"[^"]*(?:window\.|document\.)?location(?:\.href)?\s*=\s*'([^']*)'[^"]*""#
    ).unwrap();
    static ref LOCATION_ASSIGN_SQ: Regex = Regex::new(
        r#"(?i)\sonclick\s*=\s*'[^']*(?:window\.|document\.)?location(?:\.href)?\s*=\s*"([^"]*)"[^']*'"#
    ).unwrap();

    // Bare protocol URIs inside an otherwise unrecognized handler.
    static ref PROTOCOL_DQ: Regex = Regex::new(
        r#"(?i)\sonclick\s*=\s*"[^"]*'((?:tel|mailto|sms):[^']*)'[^"]*""#
    ).unwrap();
    static ref PROTOCOL_SQ: Regex = Regex::new(
        r#"(?i)\sonclick\s*=\s*'[^']*"((?:tel|mailto|sms):[^"]*)"[^']*'"#
    ).unwrap();

    // Anything still carrying an inline handler after the rewrites above
    // is deleted outright; unrecognized handlers are never forwarded.
    static ref ONCLICK_ANY: Regex = Regex::new(
        r#"(?i)\sonclick\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#
    ).unwrap();
    static ref HANDLER_ANY: Regex = Regex::new(
        r#"(?i)\son[a-z][a-z0-9]*\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#
    ).unwrap();
}

/// Escape a captured value for re-emission inside a double-quoted attribute.
/// Existing entities pass through untouched.
fn attr_escape(value: &str) -> String {
    value.replace('"', "&quot;")
}

fn captured<'a>(caps: &'a Captures<'a>) -> &'a str {
    caps.get(1).map_or("", |m| m.as_str())
}

/// Rewrite all recognized legacy call-to-action triggers in a fragment to
/// declarative attributes and strip every other inline handler.
///
/// Idempotent: the output contains no pattern this pass recognizes.
pub fn normalize_actions(fragment: &str) -> Normalized {
    let mut html = fragment.to_string();
    let mut rewritten = 0usize;

    for re in [&*LEAD_FORM_DQ, &*LEAD_FORM_SQ] {
        rewritten += re.find_iter(&html).count();
        html = re
            .replace_all(&html, |caps: &Captures| {
                format!(" data-lead-form=\"{}\"", attr_escape(captured(caps)))
            })
            .into_owned();
    }

    for re in [&*JS_HREF_DQ, &*JS_HREF_SQ] {
        rewritten += re.find_iter(&html).count();
        html = re
            .replace_all(&html, |caps: &Captures| {
                format!(
                    " data-lead-form=\"{}\" href=\"#\"",
                    attr_escape(captured(caps))
                )
            })
            .into_owned();
    }

    // window.open implies a new browsing context; the rewrite keeps that.
    for re in [&*WINDOW_OPEN_DQ, &*WINDOW_OPEN_SQ] {
        rewritten += re.find_iter(&html).count();
        html = re
            .replace_all(&html, |caps: &Captures| {
                format!(
                    " data-href=\"{}\" data-new-tab=\"\"",
                    attr_escape(captured(caps))
                )
            })
            .into_owned();
    }

    for re in [
        &*LOCATION_CALL_DQ,
        &*LOCATION_CALL_SQ,
        &*LOCATION_ASSIGN_DQ,
        &*LOCATION_ASSIGN_SQ,
        &*PROTOCOL_DQ,
        &*PROTOCOL_SQ,
    ] {
        rewritten += re.find_iter(&html).count();
        html = re
            .replace_all(&html, |caps: &Captures| {
                format!(" data-href=\"{}\"", attr_escape(captured(caps)))
            })
            .into_owned();
    }

    let mut dropped = ONCLICK_ANY.find_iter(&html).count();
    html = ONCLICK_ANY.replace_all(&html, "").into_owned();

    let residual = HANDLER_ANY.find_iter(&html).count();
    dropped += residual;
    html = HANDLER_ANY.replace_all(&html, "").into_owned();

    if rewritten > 0 || dropped > 0 {
        tracing::debug!(rewritten, dropped, "normalized legacy triggers");
    }

    Normalized {
        html,
        rewritten,
        dropped,
    }
}
