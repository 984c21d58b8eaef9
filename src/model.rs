// snapper::model
//
// The tagged union of serialized node kinds (DESIGN NOTES §9: "encode as
// a sum type with a discriminant field; avoid dynamic property probing").
// Element-specific fields live only on `NodeData::Element`.

use std::collections::BTreeMap;

use serde::Serialize;

/// Sentinel id for slim-DOM-filtered / whitespace-only text nodes. They
/// are registered in the mirror (so sibling traversal stays coherent)
/// but never appear in the returned tree.
pub const IGNORED_NODE: i64 = -2;

/// A single attribute value. HTML attributes are always strings on the
/// wire, but a handful of synthetic `rr_*` keys carry booleans/numbers
/// (e.g. `checked: true`, `rr_mediaVolume: 0.5`), so the value is a
/// small closed union rather than a bare `String`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Bool(bool),
    Number(f64),
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Number(n)
    }
}

/// Reserved synthetic attribute keys, writable only by this crate
/// (spec.md §6, "Reserved attribute namespace").
pub const ATTR_CSS_TEXT: &str = "_cssText";
pub const ATTR_RR_DATA_URL: &str = "rr_dataURL";
pub const ATTR_RR_SRC: &str = "rr_src";
pub const ATTR_RR_WIDTH: &str = "rr_width";
pub const ATTR_RR_HEIGHT: &str = "rr_height";
pub const ATTR_RR_SCROLL_LEFT: &str = "rr_scrollLeft";
pub const ATTR_RR_SCROLL_TOP: &str = "rr_scrollTop";
pub const ATTR_RR_MEDIA_STATE: &str = "rr_mediaState";
pub const ATTR_RR_MEDIA_CURRENT_TIME: &str = "rr_mediaCurrentTime";
pub const ATTR_RR_MEDIA_PLAYBACK_RATE: &str = "rr_mediaPlaybackRate";
pub const ATTR_RR_MEDIA_MUTED: &str = "rr_mediaMuted";
pub const ATTR_RR_MEDIA_LOOP: &str = "rr_mediaLoop";
pub const ATTR_RR_MEDIA_VOLUME: &str = "rr_mediaVolume";

/// Ordered attribute map. A `BTreeMap` would reorder keys; source
/// document order matters for replay fidelity, so this wraps a
/// `Vec<(String, AttributeValue)>` with map-like helpers instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AttributeMap(Vec<(String, AttributeValue)>);

impl AttributeMap {
    pub fn new() -> Self {
        AttributeMap(Vec::new())
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        let idx = self.0.iter().position(|(k, _)| k == name)?;
        Some(self.0.remove(idx).1)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.iter().any(|(k, _)| k == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reduce this map to only the keys in `keep`, preserving order.
    /// Used to implement the `needBlock` attribute-stripping invariant
    /// (spec.md §3: "attributes are reduced to {class, rr_width, rr_height}").
    pub fn retain_only(&mut self, keep: &[&str]) {
        self.0.retain(|(k, _)| keep.contains(&k.as_str()));
    }

    /// Write a reserved `rr_*`/`_cssText` key. The only sanctioned way to
    /// set these, so every call site is easy to audit against spec.md §6.
    pub fn set_reserved(&mut self, name: &'static str, value: impl Into<AttributeValue>) {
        self.insert(name, value);
    }
}

impl<'a> IntoIterator for &'a AttributeMap {
    type Item = (&'a str, &'a AttributeValue);
    type IntoIter = std::vec::IntoIter<(&'a str, &'a AttributeValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect::<Vec<_>>()
            .into_iter()
    }
}

/// The per-kind payload of a serialized node (spec.md §3's "tagged
/// union"). `rootId` and `id` live on the wrapping `SerializedNodeWithId`
/// rather than here, since every kind carries them uniformly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum NodeData {
    Document {
        #[serde(skip_serializing_if = "Option::is_none")]
        compat_mode: Option<String>,
        #[serde(rename = "childNodes")]
        child_nodes: Vec<SerializedNodeWithId>,
    },
    DocumentType {
        name: String,
        #[serde(rename = "publicId")]
        public_id: String,
        #[serde(rename = "systemId")]
        system_id: String,
    },
    Element {
        #[serde(rename = "tagName")]
        tag_name: String,
        attributes: AttributeMap,
        #[serde(rename = "childNodes")]
        child_nodes: Vec<SerializedNodeWithId>,
        #[serde(skip_serializing_if = "is_false")]
        #[serde(rename = "isSVG")]
        is_svg: bool,
        #[serde(skip_serializing_if = "is_false")]
        #[serde(rename = "needBlock")]
        need_block: bool,
        #[serde(skip_serializing_if = "is_false")]
        #[serde(rename = "isShadowHost")]
        is_shadow_host: bool,
        #[serde(skip_serializing_if = "is_false")]
        #[serde(rename = "isShadow")]
        is_shadow: bool,
        #[serde(skip_serializing_if = "is_false")]
        #[serde(rename = "isCustom")]
        is_custom: bool,
    },
    Text {
        #[serde(rename = "textContent")]
        text_content: String,
        #[serde(skip_serializing_if = "is_false")]
        #[serde(rename = "isStyle")]
        is_style: bool,
    },
    #[serde(rename = "CDATA")]
    CData {
        #[serde(rename = "textContent")]
        text_content: String,
    },
    Comment {
        #[serde(rename = "textContent")]
        text_content: String,
    },
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl NodeData {
    /// Children, for the kinds that have them. `Element`'s children are
    /// the only mutable slot the walker appends into after serializing
    /// the node in isolation (spec.md §4.7 step 2 vs step 8).
    pub fn child_nodes_mut(&mut self) -> Option<&mut Vec<SerializedNodeWithId>> {
        match self {
            NodeData::Element { child_nodes, .. } => Some(child_nodes),
            NodeData::Document { child_nodes, .. } => Some(child_nodes),
            _ => None,
        }
    }

    pub fn attributes_mut(&mut self) -> Option<&mut AttributeMap> {
        match self {
            NodeData::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn tag_name(&self) -> Option<&str> {
        match self {
            NodeData::Element { tag_name, .. } => Some(tag_name.as_str()),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, NodeData::Element { .. })
    }

    pub fn is_document(&self) -> bool {
        matches!(self, NodeData::Document { .. })
    }
}

/// One node in the output tree: spec.md §3's `SerializedNodeWithId`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerializedNodeWithId {
    pub id: i64,
    #[serde(rename = "rootId", skip_serializing_if = "Option::is_none")]
    pub root_id: Option<i64>,
    #[serde(flatten)]
    pub data: NodeData,
}

impl SerializedNodeWithId {
    pub fn new(id: i64, root_id: Option<i64>, data: NodeData) -> Self {
        SerializedNodeWithId { id, root_id, data }
    }
}

/// Used only by tests and the element-regex check in `serialize.rs`; a
/// small typed summary of attribute diagnostics isn't needed elsewhere,
/// so this stays a `BTreeMap` scratch structure local to test fixtures.
#[allow(dead_code)]
pub(crate) type DebugAttrs = BTreeMap<String, String>;
