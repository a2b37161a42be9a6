//! Allow-list sanitization for the in-DOM rendering strategy.
//!
//! Assembles an ammonia builder from the shared [`SanitizePolicy`]. The
//! sanitized string is the only form of a fragment that may be injected
//! into the host DOM; the injection mechanism itself is unsafe-by-design
//! and depends on this pass having run first.

use std::collections::HashSet;

use ammonia::Builder;
use hearth_policy::SanitizePolicy;
use kuchiki::NodeRef;
use url::Url;

/// Build the fragment sanitizer for a policy.
///
/// `<script>` content is removed wholesale; embedded `<style>` blocks
/// survive with their content (see the portal renderer for the scoping
/// caveat). ammonia manages `rel` on links itself, so the policy's `rel`
/// entry is withheld from the generic attribute set.
pub fn sanitizer(policy: &SanitizePolicy) -> Builder<'_> {
    let tags: HashSet<&str> = policy.tags().collect();
    let attributes: HashSet<&str> = policy
        .attributes()
        .filter(|attr| *attr != "rel")
        .collect();
    let schemes: HashSet<&str> = policy.schemes().collect();

    let mut clean_content = HashSet::new();
    clean_content.insert("script");

    let mut builder = Builder::default();
    builder
        .tags(tags)
        .generic_attributes(attributes)
        .url_schemes(schemes)
        .clean_content_tags(clean_content);
    builder
}

/// Sanitize a fragment down to the allow-list.
pub fn sanitize_fragment(html: &str, policy: &SanitizePolicy) -> String {
    sanitizer(policy).clean(html).to_string()
}

/// Remove `data-href` values whose URL scheme the policy rejects.
///
/// ammonia polices `href`/`src`, not data attributes, and the normalizer
/// copies whatever target a legacy trigger carried — including a smuggled
/// `javascript:` URL the bridge would otherwise navigate to. Relative
/// targets have no scheme to check and pass through.
pub fn scrub_action_urls(doc: &NodeRef, policy: &SanitizePolicy) -> usize {
    let bearers: Vec<_> = match doc.select("[data-href]") {
        Ok(matches) => matches.collect(),
        Err(()) => return 0,
    };
    let mut scrubbed = 0;
    for bearer in bearers {
        let uri = bearer
            .attributes
            .borrow()
            .get("data-href")
            .unwrap_or("")
            .to_string();
        let Ok(url) = Url::parse(&uri) else { continue };
        if policy.require_scheme(url.scheme()).is_err() {
            bearer.attributes.borrow_mut().remove("data-href");
            scrubbed += 1;
        }
    }
    if scrubbed > 0 {
        tracing::debug!(scrubbed, "removed disallowed navigation targets");
    }
    scrubbed
}
