// snapper::slimdom
//
// The slim-DOM filter (spec.md §4.4): a set of independent predicates,
// each gated by its own `SlimDomOptions` flag, that decide whether a
// node should be dropped from the snapshot entirely rather than
// serialized. Applied before a node is otherwise processed; a node
// that this filter rejects never reaches `serialize.rs`.

use kuchikiki::{NodeData as KNodeData, NodeRef};

use crate::options::SlimDomOptions;

fn element_attr(node: &NodeRef, name: &str) -> Option<String> {
    node.as_element()
        .and_then(|el| el.attributes.borrow().get(name).map(str::to_string))
}

fn element_tag(node: &NodeRef) -> Option<String> {
    node.as_element().map(|el| el.name.local.to_string())
}

fn text_of(node: &NodeRef) -> Option<String> {
    node.as_text().map(|t| t.borrow().to_string())
}

/// `<meta>` category classification, mirroring spec.md §4.4's table of
/// name/http-equiv/property patterns that each slim-DOM flag governs.
fn meta_matches(node: &NodeRef, pattern_names: &[&str], attr: &str) -> bool {
    let Some(value) = element_attr(node, attr) else {
        return false;
    };
    let lower = value.to_ascii_lowercase();
    pattern_names.iter().any(|p| lower == *p)
}

const META_DESC_KEYWORDS: &[&str] = &["description", "keywords"];
const META_SOCIAL_PREFIXES: &[&str] = &["og:", "twitter:", "fb:", "pinterest"];
const META_ROBOTS: &[&str] = &["robots", "googlebot", "bingbot"];
const META_AUTHORSHIP: &[&str] = &["author", "generator", "framework", "publisher", "progid"];
const META_AUTHORSHIP_PROPERTY_PREFIXES: &[&str] = &["article:", "product:"];
const META_VERIFICATION: &[&str] = &[
    "google-site-verification",
    "yandex-verification",
    "csrf-token",
    "p:domain_verify",
    "verify-v1",
    "verification",
    "shopify-checkout-api-token",
];

fn meta_name_matches(node: &NodeRef, names: &[&str]) -> bool {
    meta_matches(node, names, "name")
}

fn meta_property_has_prefix(node: &NodeRef, prefixes: &[&str]) -> bool {
    let Some(value) = element_attr(node, "property") else {
        return false;
    };
    let lower = value.to_ascii_lowercase();
    prefixes.iter().any(|p| lower.starts_with(p))
}

fn rel_tokens(node: &NodeRef) -> Vec<String> {
    element_attr(node, "rel")
        .map(|r| r.to_ascii_lowercase().split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn href_is_js(node: &NodeRef) -> bool {
    let Some(href) = element_attr(node, "href") else {
        return false;
    };
    let path = href.split(['?', '#']).next().unwrap_or("");
    path.to_ascii_lowercase().ends_with(".js")
}

/// `<link rel=preload|modulepreload as=script>` and `<link rel=prefetch
/// href=*.js>` (spec.md §4.4): script-ish resources smuggled in through
/// `<link>` rather than `<script>`, dropped by the same `script` flag.
fn is_script_like_link(node: &NodeRef) -> bool {
    let rels = rel_tokens(node);
    if (rels.iter().any(|r| r == "preload" || r == "modulepreload"))
        && element_attr(node, "as").as_deref() == Some("script")
    {
        return true;
    }
    if rels.iter().any(|r| r == "prefetch") && href_is_js(node) {
        return true;
    }
    false
}

/// Should `node` be dropped from the snapshot entirely, per the flags
/// enabled in `options`? Only elements, comments, and whitespace-only
/// head text nodes are ever filtered — everything else always survives
/// slim-DOM (spec.md §4.4: this is a narrow opt-in list, not a general
/// pruning pass).
pub fn is_slim_dom_dropped(node: &NodeRef, options: &SlimDomOptions, in_head: bool) -> bool {
    if options.comment && matches!(*node.data(), KNodeData::Comment(_)) {
        return true;
    }

    if let Some(text) = text_of(node) {
        if in_head && options.head_whitespace && text.trim().is_empty() {
            return true;
        }
        return false;
    }

    let Some(tag) = element_tag(node) else {
        return false;
    };

    if options.script && (tag == "script" || (tag == "link" && is_script_like_link(node))) {
        return true;
    }

    if !in_head {
        return false;
    }

    match tag.as_str() {
        "link" if options.head_favicon => {
            element_attr(node, "rel")
                .map(|r| r.to_ascii_lowercase().contains("icon"))
                .unwrap_or(false)
        }
        "meta" => {
            (element_attr(node, "rel")
                .map(|r| r.eq_ignore_ascii_case("shortcut icon") || r.eq_ignore_ascii_case("icon"))
                .unwrap_or(false)
                && options.head_favicon)
                || (options.head_meta_desc_keywords && meta_name_matches(node, META_DESC_KEYWORDS))
                || (options.head_meta_social
                    && (meta_property_has_prefix(node, META_SOCIAL_PREFIXES)
                        || meta_name_matches(node, &["twitter:card"])))
                || (options.head_meta_robots && meta_name_matches(node, META_ROBOTS))
                || (options.head_meta_http_equiv && element_attr(node, "http-equiv").is_some())
                || (options.head_meta_authorship
                    && (meta_name_matches(node, META_AUTHORSHIP)
                        || meta_property_has_prefix(node, META_AUTHORSHIP_PROPERTY_PREFIXES)))
                || (options.head_meta_verification
                    && meta_name_matches(node, META_VERIFICATION))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuchikiki::traits::TendrilSink;

    fn node_in_head(html_head_fragment: &str) -> NodeRef {
        let full = format!("<html><head>{html_head_fragment}</head><body></body></html>");
        let doc = kuchikiki::parse_html().one(full);
        doc.descendants()
            .find(|n| {
                n.as_comment().is_some()
                    || n.as_element()
                        .map(|e| e.name.local.to_string() != "head" && e.name.local.to_string() != "html" && e.name.local.to_string() != "body")
                        .unwrap_or(false)
            })
            .expect("fragment node")
    }

    #[test]
    fn drops_comment_when_enabled() {
        let node = node_in_head("<!-- hello -->");
        let opts = SlimDomOptions {
            comment: true,
            ..SlimDomOptions::default()
        };
        assert!(is_slim_dom_dropped(&node, &opts, true));
    }

    #[test]
    fn keeps_comment_when_disabled() {
        let node = node_in_head("<!-- hello -->");
        let opts = SlimDomOptions::default();
        assert!(!is_slim_dom_dropped(&node, &opts, true));
    }

    #[test]
    fn drops_favicon_link() {
        let node = node_in_head(r#"<link rel="icon" href="/favicon.ico">"#);
        let opts = SlimDomOptions {
            head_favicon: true,
            ..SlimDomOptions::default()
        };
        assert!(is_slim_dom_dropped(&node, &opts, true));
    }

    #[test]
    fn drops_description_meta_only_with_keywords_flag() {
        let node = node_in_head(r#"<meta name="description" content="x">"#);
        let without = SlimDomOptions::all();
        assert!(!is_slim_dom_dropped(&node, &without, true));
        let with = SlimDomOptions::all_with_keywords();
        assert!(is_slim_dom_dropped(&node, &with, true));
    }

    #[test]
    fn drops_og_meta_when_social_enabled() {
        let node = node_in_head(r#"<meta property="og:title" content="x">"#);
        let opts = SlimDomOptions {
            head_meta_social: true,
            ..SlimDomOptions::default()
        };
        assert!(is_slim_dom_dropped(&node, &opts, true));
    }

    #[test]
    fn drops_bingbot_meta_when_robots_enabled() {
        let node = node_in_head(r#"<meta name="bingbot" content="noindex">"#);
        let opts = SlimDomOptions {
            head_meta_robots: true,
            ..SlimDomOptions::default()
        };
        assert!(is_slim_dom_dropped(&node, &opts, true));
    }

    #[test]
    fn drops_pinterest_meta_when_social_enabled() {
        let node = node_in_head(r#"<meta name="pinterest" content="nopin">"#);
        let opts = SlimDomOptions {
            head_meta_social: true,
            ..SlimDomOptions::default()
        };
        assert!(is_slim_dom_dropped(&node, &opts, true));
    }

    #[test]
    fn drops_article_property_meta_when_authorship_enabled() {
        let node = node_in_head(r#"<meta property="article:author" content="x">"#);
        let opts = SlimDomOptions {
            head_meta_authorship: true,
            ..SlimDomOptions::default()
        };
        assert!(is_slim_dom_dropped(&node, &opts, true));
    }

    #[test]
    fn drops_preload_as_script_link() {
        let node = node_in_head(r#"<link rel="preload" href="/app.js" as="script">"#);
        let opts = SlimDomOptions {
            script: true,
            ..SlimDomOptions::default()
        };
        assert!(is_slim_dom_dropped(&node, &opts, true));
    }

    #[test]
    fn drops_prefetch_js_link() {
        let node = node_in_head(r#"<link rel="prefetch" href="/chunk.js">"#);
        let opts = SlimDomOptions {
            script: true,
            ..SlimDomOptions::default()
        };
        assert!(is_slim_dom_dropped(&node, &opts, true));
    }

    #[test]
    fn keeps_preload_css_link() {
        let node = node_in_head(r#"<link rel="preload" href="/app.css" as="style">"#);
        let opts = SlimDomOptions {
            script: true,
            ..SlimDomOptions::default()
        };
        assert!(!is_slim_dom_dropped(&node, &opts, true));
    }

    #[test]
    fn script_dropped_outside_head_too() {
        let doc = kuchikiki::parse_html().one("<html><body><script>1</script></body></html>");
        let node = doc
            .descendants()
            .find(|n| {
                n.as_element()
                    .map(|e| e.name.local.to_string() == "script")
                    .unwrap_or(false)
            })
            .unwrap();
        let opts = SlimDomOptions {
            script: true,
            ..SlimDomOptions::default()
        };
        assert!(is_slim_dom_dropped(&node, &opts, false));
    }
}
