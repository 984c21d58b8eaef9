// snapper::policy
//
// Mask/block policy evaluation (spec.md §4.2). Blocking and text-masking
// are both "does this element or an ancestor match" checks, but with
// different propagation rules: a blocked ancestor blocks every
// descendant unconditionally, while masking is determined once per
// subtree and then inherited downward without being re-evaluated node
// by node (spec.md §4.2, "Once true for a subtree root, stays true for
// all descendants").

use kuchikiki::NodeRef;
use tracing::trace;

use crate::options::{ClassMatcher, SimpleSelector};

fn element_classes(node: &NodeRef) -> Vec<String> {
    let Some(el) = node.as_element() else {
        return Vec::new();
    };
    let attrs = el.attributes.borrow();
    attrs
        .get("class")
        .map(|c| c.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn element_attrs(node: &NodeRef) -> Vec<(String, String)> {
    let Some(el) = node.as_element() else {
        return Vec::new();
    };
    let attrs = el.attributes.borrow();
    attrs
        .map
        .iter()
        .map(|(name, attr)| (name.local.to_string(), attr.value.to_string()))
        .collect()
}

fn matches_class_or_selector(
    node: &NodeRef,
    class_matcher: &ClassMatcher,
    selector: Option<&SimpleSelector>,
) -> bool {
    let Some(el) = node.as_element() else {
        return false;
    };
    let tag_name = el.name.local.to_string();
    let classes = element_classes(node);
    if classes.iter().any(|c| class_matcher.matches(c)) {
        return true;
    }
    if let Some(selector) = selector {
        let attrs = element_attrs(node);
        let attrs_ref: Vec<(&str, &str)> = attrs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let class_refs: Vec<&str> = classes.iter().map(String::as_str).collect();
        let id = el.attributes.borrow().get("id").map(str::to_string);
        if selector.matches(&tag_name, id.as_deref(), &class_refs, &attrs_ref) {
            return true;
        }
    }
    false
}

/// `isBlockedElement` (spec.md §4.2): does this element's own class or
/// selector match the block policy? Ancestor-walking is the caller's
/// responsibility (the walker already carries `needBlock` status down
/// through recursion; re-checking it here per node would duplicate that
/// walk).
pub fn is_blocked_element(
    node: &NodeRef,
    block_class: &ClassMatcher,
    block_selector: Option<&SimpleSelector>,
) -> bool {
    let blocked = matches_class_or_selector(node, block_class, block_selector);
    if blocked {
        if let Some(el) = node.as_element() {
            trace!(tag = %el.name.local, "element blocked by policy");
        }
    }
    blocked
}

/// `needsMasking` (spec.md §4.2): does this element's own class or
/// selector match the text-mask policy? Like blocking, inheritance down
/// the subtree is the walker's job; this only answers for one node.
pub fn needs_masking_text(
    node: &NodeRef,
    mask_text_class: &ClassMatcher,
    mask_text_selector: Option<&SimpleSelector>,
) -> bool {
    matches_class_or_selector(node, mask_text_class, mask_text_selector)
}

/// `needMaskingText(node, ..., checkAncestors=true)` (spec.md §4.7 step
/// 1): the walk's entry node has no inherited verdict from a caller, so
/// it must walk up the live ancestor chain itself (`closest`-equivalent)
/// rather than only consulting its own class/selector, matching what a
/// node serialized mid-document (not from the document root) would
/// inherit from its real parents.
pub fn needs_masking_text_checking_ancestors(
    node: &NodeRef,
    mask_text_class: &ClassMatcher,
    mask_text_selector: Option<&SimpleSelector>,
) -> bool {
    let mut current = Some(node.clone());
    while let Some(n) = current {
        if matches_class_or_selector(&n, mask_text_class, mask_text_selector) {
            return true;
        }
        current = n.parent();
    }
    false
}

/// Mask the visible text of a text node. Whitespace is preserved (so
/// line-wrapping in replay doesn't shift), every non-whitespace
/// character becomes `*`, unless a custom `mask_text_fn` is supplied, in
/// which case it's used verbatim (spec.md §4.2).
pub fn mask_text(
    text: &str,
    parent_tag_name: Option<&str>,
    mask_text_fn: Option<&dyn Fn(&str, Option<&str>) -> String>,
) -> String {
    if let Some(f) = mask_text_fn {
        return f(text, parent_tag_name);
    }
    text.chars()
        .map(|c| if c.is_whitespace() { c } else { '*' })
        .collect()
}

/// Mask an `<input>`/`<textarea>`/`<select>` value per spec.md §4.2's
/// per-type rules: radio/checkbox/submit/button/image inputs are never
/// masked (their "value" is just a label, not user-entered data); a
/// `mask_input_fn` override takes priority otherwise; the fallback is
/// the same "preserve whitespace, `*` the rest" transform as text.
pub fn mask_input_value(
    value: &str,
    input_type: &str,
    mask_input_fn: Option<&dyn Fn(&str) -> String>,
) -> String {
    if matches!(
        input_type,
        "radio" | "checkbox" | "submit" | "button" | "image" | "reset"
    ) {
        return value.to_string();
    }
    if let Some(f) = mask_input_fn {
        return f(value);
    }
    value
        .chars()
        .map(|c| if c.is_whitespace() { c } else { '*' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuchikiki::traits::TendrilSink;

    fn first_element(html: &str) -> NodeRef {
        let doc = kuchikiki::parse_html().one(html);
        doc.descendants()
            .elements()
            .next()
            .unwrap()
            .as_node()
            .clone()
    }

    #[test]
    fn blocks_by_class() {
        let node = first_element(r#"<div class="rr-block other"></div>"#);
        let matcher = ClassMatcher::Literal("rr-block".into());
        assert!(is_blocked_element(&node, &matcher, None));
    }

    #[test]
    fn does_not_block_unrelated_class() {
        let node = first_element(r#"<div class="other"></div>"#);
        let matcher = ClassMatcher::Literal("rr-block".into());
        assert!(!is_blocked_element(&node, &matcher, None));
    }

    #[test]
    fn blocks_by_selector() {
        let node = first_element(r#"<div data-private="yes"></div>"#);
        let matcher = ClassMatcher::Literal("rr-block".into());
        let selector = SimpleSelector::parse("[data-private]");
        assert!(is_blocked_element(&node, &matcher, Some(&selector)));
    }

    #[test]
    fn masks_by_class() {
        let node = first_element(r#"<span class="rr-mask"></span>"#);
        let matcher = ClassMatcher::Literal("rr-mask".into());
        assert!(needs_masking_text(&node, &matcher, None));
    }

    #[test]
    fn ancestor_check_finds_masked_parent() {
        let doc = kuchikiki::parse_html()
            .one(r#"<div class="rr-mask"><p>inside</p></div>"#);
        let p = doc
            .descendants()
            .elements()
            .find(|e| e.name.local.to_string() == "p")
            .unwrap()
            .as_node()
            .clone();
        let matcher = ClassMatcher::Literal("rr-mask".into());
        assert!(!needs_masking_text(&p, &matcher, None));
        assert!(needs_masking_text_checking_ancestors(&p, &matcher, None));
    }

    #[test]
    fn mask_text_preserves_whitespace() {
        assert_eq!(mask_text("hi there", None, None), "** *****");
    }

    #[test]
    fn mask_input_skips_radio_and_checkbox() {
        assert_eq!(mask_input_value("on", "checkbox", None), "on");
        assert_eq!(mask_input_value("yes", "radio", None), "yes");
    }

    #[test]
    fn mask_input_masks_text_by_default() {
        assert_eq!(mask_input_value("secret", "text", None), "******");
    }

    #[test]
    fn mask_input_fn_overrides_default() {
        let f = |_: &str| "REDACTED".to_string();
        assert_eq!(mask_input_value("secret", "password", Some(&f)), "REDACTED");
    }
}
