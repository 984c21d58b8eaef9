// snapper::walk
//
// The tree walker (spec.md §4.7): `serialize_node_with_id` recurses
// children, shadow roots, and attached iframes, threading mask/block
// state down and assigning mirror ids as it goes. Everything here is
// orchestration: the actual per-node payload comes from `serialize.rs`,
// URL rewriting from `url.rs`, id bookkeeping from `mirror.rs`.
//
// None of this throws. A node `serialize.rs` can't classify is logged
// and dropped (spec.md §7); everything else degrades in place.

use std::time::Duration;

use kuchikiki::NodeRef;
use tracing::{debug, warn};
use url::Url;

use crate::async_hooks::{
    schedule_iframe_load, schedule_stylesheet_load, AsyncStylesheetLoader, LocalBoxFuture,
    NoAsyncStylesheets, NoSubDocuments, PendingResource, SubDocumentLoader,
};
use crate::mirror::{HashMirror, Mirror, NodeHandle, IGNORED_NODE};
use crate::model::{NodeData, SerializedNodeWithId};
use crate::options::SnapshotOptions;
use crate::policy::{
    is_blocked_element, mask_text, needs_masking_text, needs_masking_text_checking_ancestors,
};
use crate::serialize::{
    serialize_node, style_text_replacement, CanvasSnapshotter, CustomElementRegistry,
    ElementGeometry, MediaStateReader, NoCanvas, NoCustomElements, NoGeometry, NoMedia,
    SerializeContext, SCRIPT_PLACEHOLDER,
};
use crate::slimdom::is_slim_dom_dropped;
use crate::stylesheet::{NoStylesheets, StylesheetTextSource};

/// Stands in for `customElements`/a browser clock: hands back a future
/// that resolves after `dur`. The async resource hooks (spec.md §4.8)
/// are a race between a `ready` future and this deadline; this crate
/// owns the race (`first_wins`), the embedder owns the clock, since no
/// executor is assumed (SPEC_FULL.md §4.8).
pub trait Clock {
    fn sleep(&self, dur: Duration) -> LocalBoxFuture<'static, ()>;
}

/// No deadline is ever reached: every async hook behaves as though its
/// timeout were infinite. Useful when the embedder has no clock wired
/// up yet and would rather wait forever than false-negative.
pub struct NoClock;

impl Clock for NoClock {
    fn sleep(&self, _dur: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(std::future::pending())
    }
}

/// Shadow DOM seam (spec.md §4.7 steps 9-10). `kuchikiki` has no notion
/// of shadow roots, so this is purely a trait the embedder can implement
/// if it tracks shadow trees out of band; the default never reports one.
pub trait ShadowHost {
    /// Children of `host`'s shadow root, in source order, or `None` if
    /// `host` isn't a shadow host.
    fn shadow_children(&self, host: &NodeRef) -> Option<Vec<NodeRef>>;

    /// Whether `host`'s shadow root is native (vs. a polyfill) — gates
    /// whether children are marked `isShadow: true` (spec.md §4.7 step 9).
    fn is_native(&self, host: &NodeRef) -> bool;
}

pub struct NoShadowRoots;

impl ShadowHost for NoShadowRoots {
    fn shadow_children(&self, _host: &NodeRef) -> Option<Vec<NodeRef>> {
        None
    }
    fn is_native(&self, _host: &NodeRef) -> bool {
        true
    }
}

/// Observational hooks the walker fires but never acts on the result of
/// (spec.md §6): `onSerialize` sees every live node visited;
/// `onAssetDetected` sees every asset-cacheable element's absolutized
/// URLs (spec.md §4.7 step 13).
#[derive(Default)]
pub struct WalkCallbacks<'a> {
    pub on_serialize: Option<&'a dyn Fn(&NodeRef)>,
    pub on_asset_detected: Option<&'a dyn Fn(&NodeRef, &[String])>,
}

/// Everything the walker needs beyond the live tree and base URL: the
/// resolved options, the mirror, and every trait-seam collaborator
/// (spec.md §1's "host-independent core, thin host-integration seams").
pub struct WalkContext<'a> {
    pub options: &'a SnapshotOptions,
    pub mirror: &'a HashMirror,
    pub canvas: &'a dyn CanvasSnapshotter,
    pub media: &'a dyn MediaStateReader,
    pub geometry: &'a dyn ElementGeometry,
    pub custom_elements: &'a dyn CustomElementRegistry,
    pub stylesheets: &'a dyn StylesheetTextSource,
    pub shadow_roots: &'a dyn ShadowHost,
    pub subdocuments: &'a dyn SubDocumentLoader,
    pub async_stylesheets: &'a dyn AsyncStylesheetLoader,
    pub clock: &'a dyn Clock,
    pub callbacks: WalkCallbacks<'a>,
}

impl<'a> WalkContext<'a> {
    /// A context with every trait seam defaulted to "nothing available"
    /// — enough to exercise the pure traversal/masking/id logic without
    /// wiring up a real host integration.
    pub fn headless(options: &'a SnapshotOptions, mirror: &'a HashMirror) -> Self {
        WalkContext {
            options,
            mirror,
            canvas: &NoCanvas,
            media: &NoMedia,
            geometry: &NoGeometry,
            custom_elements: &NoCustomElements,
            stylesheets: &NoStylesheets,
            shadow_roots: &NoShadowRoots,
            subdocuments: &NoSubDocuments,
            async_stylesheets: &NoAsyncStylesheets,
            clock: &NoClock,
            callbacks: WalkCallbacks::default(),
        }
    }
}

const ASSET_URL_TAGS: &[&str] = &["img", "video", "audio", "source", "track", "embed"];

fn element_tag<'d>(data: &'d NodeData) -> Option<&'d str> {
    data.tag_name()
}

fn parent_tag(node: &NodeRef) -> Option<String> {
    node.parent()
        .and_then(|p| p.as_element().map(|e| e.name.local.to_string()))
}

/// Collect the asset-cacheable URLs this element references (spec.md
/// §4.7 step 13): `src` plus every distinct URL in `srcset`, already
/// absolutized since `serialize_node` ran `transformAttribute` first.
fn asset_urls(data: &NodeData) -> Vec<String> {
    let Some(attrs) = (match data {
        NodeData::Element { attributes, .. } => Some(attributes),
        _ => None,
    }) else {
        return Vec::new();
    };
    let mut urls = Vec::new();
    if let Some(crate::model::AttributeValue::String(s)) = attrs.get("src") {
        if !s.is_empty() {
            urls.push(s.clone());
        }
    }
    if let Some(crate::model::AttributeValue::String(s)) = attrs.get("srcset") {
        for piece in s.split(',') {
            if let Some(url) = piece.trim().split_whitespace().next() {
                if !url.is_empty() {
                    urls.push(url.to_string());
                }
            }
        }
    }
    urls
}

/// Entry point for one tree (spec.md §4.7). `root_id` is `None` for the
/// top document (ID 1 per spec.md §3) and `Some(doc_id)` when walking an
/// iframe's content document, where every descendant's `rootId` is that
/// document's own mirror id.
pub fn serialize_node_with_id(
    node: &NodeRef,
    base_url: &Url,
    root_id: Option<i64>,
    wctx: &WalkContext<'_>,
    pending: &mut Vec<PendingResource>,
) -> Option<SerializedNodeWithId> {
    walk_inner(node, base_url, root_id, None, false, wctx.options.preserve_white_space, wctx, pending)
}

fn walk_inner(
    node: &NodeRef,
    base_url: &Url,
    root_id: Option<i64>,
    mask_inherited: Option<bool>,
    in_head: bool,
    preserve_white_space: bool,
    wctx: &WalkContext<'_>,
    pending: &mut Vec<PendingResource>,
) -> Option<SerializedNodeWithId> {
    let handle = NodeHandle(node.clone());
    let slim_dom = wctx.options.slim_dom.resolve();

    // Step 1: a subtree is masked once any ancestor (or the node itself)
    // matches the policy; once true it stays true (spec.md §4.7 step 1,
    // "masking is inherited"). `mask_inherited` carries the ancestor
    // verdict down from a prior call in *this* walk; a `Some(true)`
    // short-circuits without re-checking, but `Some(false)` still
    // examines this node's own class/selector, since a masked ancestor
    // is not required for an element to start masking its own subtree.
    // `None` means this is the walk's entry node, which has no inherited
    // verdict to consult — per spec.md §4.7 step 1 ("checkAncestors=true"
    // for the initializing check), it walks its own live ancestor chain
    // instead, so a subtree root handed to `serialize_node_with_id`
    // mid-document still inherits a real `rr-mask` ancestor above it.
    let mask_active = match mask_inherited {
        Some(true) => true,
        Some(false) => needs_masking_text(
            node,
            &wctx.options.mask_text_class,
            wctx.options.mask_text_selector.as_ref(),
        ),
        None => needs_masking_text_checking_ancestors(
            node,
            &wctx.options.mask_text_class,
            wctx.options.mask_text_selector.as_ref(),
        ),
    };

    let is_blocked = is_blocked_element(
        node,
        &wctx.options.block_class,
        wctx.options.block_selector.as_ref(),
    );

    let serialize_ctx = SerializeContext {
        base_url,
        options: wctx.options,
        canvas: wctx.canvas,
        media: wctx.media,
        geometry: wctx.geometry,
        custom_elements: wctx.custom_elements,
        stylesheets: wctx.stylesheets,
        is_newly_added: false,
    };

    // Step 2: serialize this node in isolation.
    let mut data = match serialize_node(node, &serialize_ctx, is_blocked) {
        Ok(d) => d,
        Err(_) => {
            warn!("dropping node of unknown type during traversal");
            return None;
        }
    };

    let is_style_text = matches!(&data, NodeData::Text { .. })
        && parent_tag(node).as_deref() == Some("style");
    let is_script_text = matches!(&data, NodeData::Text { .. })
        && parent_tag(node).as_deref() == Some("script");

    if let NodeData::Text { text_content, is_style } = &mut data {
        *is_style = is_style_text;
        if is_script_text {
            *text_content = SCRIPT_PLACEHOLDER.to_string();
        } else if mask_active && !is_style_text {
            let parent = parent_tag(node);
            *text_content = mask_text(text_content, parent.as_deref(), wctx.options.mask_text_fn.as_deref());
        }
    }

    let is_whitespace_text = matches!(&data, NodeData::Text { text_content, is_style } if !*is_style && text_content.trim().is_empty());

    // Step 3: assign or reuse the id.
    let id = if wctx.mirror.has_node(&handle) {
        wctx.mirror.get_id(&handle)
    } else if is_slim_dom_dropped(node, &slim_dom, in_head) || (!preserve_white_space && is_whitespace_text)
    {
        IGNORED_NODE
    } else {
        wctx.mirror.allocator().alloc()
    };

    // Step 5/6 ahead of step 4's registration below: an ignored node is
    // still registered (so sibling traversal stays coherent) but never
    // returned, and never fires onSerialize.
    if id == IGNORED_NODE {
        wctx.mirror.add(handle, SerializedNodeWithId::new(IGNORED_NODE, root_id, data));
        return None;
    }

    if let Some(cb) = wctx.callbacks.on_serialize {
        cb(node);
    }

    let is_document_or_element = data.is_document() || data.is_element();
    let tag = element_tag(&data).map(str::to_string);
    let skip_child = is_blocked
        || (tag.as_deref() == Some("textarea")
            && matches!(&data, NodeData::Element { attributes, .. } if attributes.contains_key("value")));

    // Steps 8-9: recurse into ordinary children and shadow-root children.
    if is_document_or_element && !skip_child {
        let next_in_head = in_head || tag.as_deref() == Some("head");
        let next_preserve_ws = if tag.as_deref() == Some("head") && slim_dom.head_whitespace {
            false
        } else {
            preserve_white_space
        };

        let mut children = Vec::new();
        for child in node.children() {
            if let Some(serialized) = walk_inner(
                &child,
                base_url,
                root_id,
                Some(mask_active),
                next_in_head,
                next_preserve_ws,
                wctx,
                pending,
            ) {
                children.push(serialized);
            }
        }

        if let Some(shadow_kids) = wctx.shadow_roots.shadow_children(node) {
            if let NodeData::Element { is_shadow_host, .. } = &mut data {
                *is_shadow_host = true;
            }
            let native = wctx.shadow_roots.is_native(node);
            for child in shadow_kids {
                if let Some(mut serialized) = walk_inner(
                    &child,
                    base_url,
                    root_id,
                    Some(mask_active),
                    next_in_head,
                    next_preserve_ws,
                    wctx,
                    pending,
                ) {
                    if native {
                        if let NodeData::Element { is_shadow, .. } = &mut serialized.data {
                            *is_shadow = true;
                        }
                    }
                    children.push(serialized);
                }
            }
        }

        if let Some(slot) = data.child_nodes_mut() {
            *slot = children;
        }
    }

    // Step 10: mark as shadow content if our own parent is a native
    // shadow root (handled from the host-side call above for the common
    // case; this covers a node serialized as a fresh walk root whose
    // live parent already has a shadow root registered).
    if let Some(parent) = node.parent() {
        if wctx.shadow_roots.shadow_children(&parent).is_some() && wctx.shadow_roots.is_native(&parent) {
            if let NodeData::Element { is_shadow, .. } = &mut data {
                *is_shadow = true;
            }
        }
    }

    if !skip_child {
        if let NodeData::Element { tag_name, child_nodes, .. } = &mut data {
            if tag_name.as_str() == "style" {
                if let [only] = child_nodes.as_mut_slice() {
                    if let NodeData::Text { text_content, is_style } = &mut only.data {
                        *text_content = style_text_replacement(text_content, Some(base_url.as_str()));
                        *is_style = true;
                    }
                }
            }
        }
    }

    // Steps 11-12: schedule async re-capture for iframes and stylesheet
    // links that couldn't be resolved synchronously.
    if !is_blocked {
        if tag.as_deref() == Some("iframe") {
            schedule_iframe(id, node, wctx, pending);
        } else if tag.as_deref() == Some("link") && is_stylesheet_link(&data) {
            schedule_stylesheet(id, &data, wctx, pending);
        }
    }

    // Step 13: asset URL accumulation.
    if let Some(cb) = wctx.callbacks.on_asset_detected {
        if let Some(t) = &tag {
            if ASSET_URL_TAGS.contains(&t.as_str()) {
                let urls = asset_urls(&data);
                if !urls.is_empty() {
                    cb(node, &urls);
                }
            }
        }
    }

    let serialized = SerializedNodeWithId::new(id, root_id, data);
    wctx.mirror.add(handle, serialized.clone());
    Some(serialized)
}

/// spec.md §4.7 step 12: `<link rel=stylesheet>` and `<link rel=preload
/// href=*.css>` both get scheduled for async stylesheet capture (the
/// preload case covers a sheet fetched ahead of use that hasn't applied
/// yet — by the time it fires, the link's role is stylesheet-like).
fn is_stylesheet_link(data: &NodeData) -> bool {
    let NodeData::Element { attributes, .. } = data else {
        return false;
    };
    let rel = attributes.get("rel").and_then(|v| match v {
        crate::model::AttributeValue::String(s) => Some(s.to_ascii_lowercase()),
        _ => None,
    });
    match rel.as_deref() {
        Some("stylesheet") => true,
        Some("preload") => attributes
            .get("href")
            .map(|v| matches!(v, crate::model::AttributeValue::String(s) if s.to_ascii_lowercase().ends_with(".css")))
            .unwrap_or(false),
        _ => false,
    }
}

fn schedule_iframe(owner_id: i64, node: &NodeRef, wctx: &WalkContext<'_>, pending: &mut Vec<PendingResource>) {
    if wctx.subdocuments.try_now(node).is_some() {
        debug!("iframe content already reachable synchronously");
        return;
    }
    let timeout = wctx.clock.sleep(wctx.options.iframe_load_timeout);
    pending.push(schedule_iframe_load(owner_id, wctx.subdocuments, node, timeout));
}

fn schedule_stylesheet(owner_id: i64, data: &NodeData, wctx: &WalkContext<'_>, pending: &mut Vec<PendingResource>) {
    if let NodeData::Element { attributes, .. } = data {
        if attributes.contains_key(crate::model::ATTR_CSS_TEXT) {
            return;
        }
        if let Some(crate::model::AttributeValue::String(href)) = attributes.get("href") {
            let timeout = wctx.clock.sleep(wctx.options.stylesheet_load_timeout);
            pending.push(schedule_stylesheet_load(owner_id, wctx.async_stylesheets, href, timeout));
        }
    }
}

/// Re-serialize an iframe's content document once it has loaded (spec.md
/// §4.7 step 11 / §6 `onIframeLoad`). The returned tree's own document
/// node becomes its own `rootId` — every descendant inside the iframe is
/// tagged as belonging to that sub-document.
pub fn serialize_iframe_document(
    content_document: &NodeRef,
    base_url: &Url,
    wctx: &WalkContext<'_>,
    pending: &mut Vec<PendingResource>,
) -> Option<SerializedNodeWithId> {
    let handle = NodeHandle(content_document.clone());
    let doc_id = if wctx.mirror.has_node(&handle) {
        wctx.mirror.get_id(&handle)
    } else {
        wctx.mirror.allocator().alloc()
    };
    walk_inner(
        content_document,
        base_url,
        Some(doc_id),
        Some(false),
        false,
        wctx.options.preserve_white_space,
        wctx,
        pending,
    )
}

/// Re-serialize a `<link rel=stylesheet>` node after its text became
/// available (spec.md §4.7 step 12 / §6 `onStylesheetLoad`). Returns
/// `None` if the live node is no longer reachable or isn't an element.
pub fn serialize_loaded_stylesheet_link(
    link: &NodeRef,
    base_url: &Url,
    wctx: &WalkContext<'_>,
    pending: &mut Vec<PendingResource>,
) -> Option<SerializedNodeWithId> {
    let root_id = NodeHandle(link.clone());
    let existing_root_id = wctx.mirror.get_serialized(&root_id).and_then(|s| s.root_id);
    walk_inner(
        link,
        base_url,
        existing_root_id,
        Some(false),
        false,
        wctx.options.preserve_white_space,
        wctx,
        pending,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuchikiki::traits::TendrilSink;

    fn base() -> Url {
        Url::parse("http://h/a/b/c.html").unwrap()
    }

    fn walk_doc(html: &str, options: &SnapshotOptions) -> (Option<SerializedNodeWithId>, HashMirror) {
        let doc = kuchikiki::parse_html().one(html);
        let mirror = HashMirror::new();
        let wctx = WalkContext::headless(options, &mirror);
        let mut pending = Vec::new();
        let result = serialize_node_with_id(&doc, &base(), None, &wctx, &mut pending);
        (result, mirror)
    }

    fn find_tag<'a>(node: &'a SerializedNodeWithId, tag: &str) -> Option<&'a SerializedNodeWithId> {
        if node.data.tag_name() == Some(tag) {
            return Some(node);
        }
        if let NodeData::Element { child_nodes, .. } = &node.data {
            for c in child_nodes {
                if let Some(found) = find_tag(c, tag) {
                    return Some(found);
                }
            }
        }
        None
    }

    #[test]
    fn s1_simple_element() {
        let opts = SnapshotOptions::default();
        let (result, _mirror) = walk_doc(r#"<html><body><div class="a" data-x="1">hi</div></body></html>"#, &opts);
        let root = result.expect("document should serialize");
        assert_eq!(root.id, 1);
        let div = find_tag(&root, "div").expect("div present");
        match &div.data {
            NodeData::Element { attributes, child_nodes, .. } => {
                assert_eq!(
                    attributes.get("class"),
                    Some(&crate::model::AttributeValue::from("a"))
                );
                assert_eq!(
                    attributes.get("data-x"),
                    Some(&crate::model::AttributeValue::from("1"))
                );
                match &child_nodes[0].data {
                    NodeData::Text { text_content, .. } => assert_eq!(text_content, "hi"),
                    _ => panic!("expected text child"),
                }
            }
            _ => panic!("expected element"),
        }
    }

    #[test]
    fn s2_blocked_element_has_no_children() {
        let opts = SnapshotOptions::default();
        let (result, _mirror) = walk_doc(
            r#"<html><body><div class="rr-block"><span>secret</span></div></body></html>"#,
            &opts,
        );
        let root = result.unwrap();
        let div = find_tag(&root, "div").unwrap();
        match &div.data {
            NodeData::Element { need_block, child_nodes, attributes, .. } => {
                assert!(need_block);
                assert!(child_nodes.is_empty());
                assert!(attributes.contains_key("class"));
                assert!(!attributes.contains_key("id"));
            }
            _ => panic!("expected element"),
        }
    }

    #[test]
    fn s3_masked_text() {
        let opts = SnapshotOptions::default();
        let (result, _mirror) = walk_doc(r#"<html><body><p class="rr-mask">Secret</p></body></html>"#, &opts);
        let root = result.unwrap();
        let p = find_tag(&root, "p").unwrap();
        match &p.data {
            NodeData::Element { child_nodes, .. } => match &child_nodes[0].data {
                NodeData::Text { text_content, .. } => assert_eq!(text_content, "******"),
                _ => panic!("expected text"),
            },
            _ => panic!("expected element"),
        }
    }

    #[test]
    fn s4_style_absolutization() {
        let opts = SnapshotOptions::default();
        let (result, _mirror) = walk_doc(
            r#"<html><head><style>.a{background:url(img/x.png)}</style></head><body></body></html>"#,
            &opts,
        );
        let root = result.unwrap();
        let style = find_tag(&root, "style").unwrap();
        match &style.data {
            NodeData::Element { child_nodes, .. } => match &child_nodes[0].data {
                NodeData::Text { text_content, is_style } => {
                    assert!(*is_style);
                    assert!(text_content.contains("url(http://h/a/b/img/x.png)"));
                }
                _ => panic!("expected text"),
            },
            _ => panic!("expected element"),
        }
    }

    #[test]
    fn script_text_replaced_with_placeholder() {
        let opts = SnapshotOptions::default();
        let (result, _mirror) = walk_doc(
            r#"<html><body><script>alert(document.cookie)</script></body></html>"#,
            &opts,
        );
        let root = result.unwrap();
        let script = find_tag(&root, "script").unwrap();
        match &script.data {
            NodeData::Element { child_nodes, .. } => match &child_nodes[0].data {
                NodeData::Text { text_content, .. } => assert_eq!(text_content, SCRIPT_PLACEHOLDER),
                _ => panic!("expected text"),
            },
            _ => panic!("expected element"),
        }
    }

    #[test]
    fn nested_mask_class_is_honored_under_unmasked_ancestors() {
        // Regression: a masked element nested several levels under an
        // otherwise-unmasked document must still mask its own text; the
        // ancestor chain being unmasked must not shadow the node's own
        // class (spec.md §4.7 step 1, "masking is inherited" applies
        // only to the `true` case).
        let opts = SnapshotOptions::default();
        let (result, _mirror) = walk_doc(
            r#"<html><body><div><section><p class="rr-mask">Secret</p></section></div></body></html>"#,
            &opts,
        );
        let root = result.unwrap();
        let p = find_tag(&root, "p").unwrap();
        match &p.data {
            NodeData::Element { child_nodes, .. } => match &child_nodes[0].data {
                NodeData::Text { text_content, .. } => assert_eq!(text_content, "******"),
                _ => panic!("expected text"),
            },
            _ => panic!("expected element"),
        }
    }

    #[test]
    fn reserializing_same_node_reuses_id() {
        let doc = kuchikiki::parse_html().one(r#"<html><body><div id="x">hi</div></body></html>"#);
        let mirror = HashMirror::new();
        let opts = SnapshotOptions::default();
        let wctx = WalkContext::headless(&opts, &mirror);
        let mut pending = Vec::new();

        let first = serialize_node_with_id(&doc, &base(), None, &wctx, &mut pending).unwrap();
        let second = serialize_node_with_id(&doc, &base(), None, &wctx, &mut pending).unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn ids_are_unique_and_positive() {
        let opts = SnapshotOptions::default();
        let (result, _mirror) = walk_doc(
            r#"<html><body><div>a</div><div>b</div><div>c</div></body></html>"#,
            &opts,
        );
        let root = result.unwrap();
        let mut ids = Vec::new();
        fn collect(node: &SerializedNodeWithId, ids: &mut Vec<i64>) {
            ids.push(node.id);
            if let NodeData::Element { child_nodes, .. } = &node.data {
                for c in child_nodes {
                    collect(c, ids);
                }
            }
        }
        collect(&root, &mut ids);
        assert!(ids.iter().all(|id| *id > 0));
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
    }

    #[test]
    fn whitespace_only_text_is_ignored_when_not_preserved() {
        let opts = SnapshotOptionsBuilderTestExt::no_whitespace();
        let (result, _mirror) = walk_doc("<html><body><div>   </div></body></html>", &opts);
        let root = result.unwrap();
        let div = find_tag(&root, "div").unwrap();
        match &div.data {
            NodeData::Element { child_nodes, .. } => assert!(child_nodes.is_empty()),
            _ => panic!("expected element"),
        }
    }

    trait SnapshotOptionsBuilderTestExt {
        fn no_whitespace() -> SnapshotOptions;
    }

    impl SnapshotOptionsBuilderTestExt for SnapshotOptions {
        fn no_whitespace() -> SnapshotOptions {
            SnapshotOptions::builder().preserve_white_space(false).build()
        }
    }
}
