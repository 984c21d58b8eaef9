// snapper
//
// A DOM snapshot serializer (spec.md §1): walks a document tree and
// produces a self-contained, replay-ready, JSON-serializable tree of
// `SerializedNodeWithId` records with stable integer node identities.
//
// The crate is a library, not a service. It borrows a tree built on
// `kuchikiki`/`html5ever` and never touches the network or a browser
// engine directly — everything a live browser would give it for free
// (canvas pixels, media playback state, iframe `contentDocument`,
// layout geometry) is expressed as a trait seam in `serialize.rs` /
// `walk.rs` that the embedder implements.

pub mod async_hooks;
pub mod error;
pub mod mirror;
pub mod model;
pub mod options;
pub mod policy;
pub mod serialize;
pub mod slimdom;
pub mod stylesheet;
pub mod url;
pub mod walk;

use kuchikiki::NodeRef;
use tracing::info_span;
use ::url::Url;

use crate::async_hooks::PendingResource;
use crate::mirror::HashMirror;
use crate::model::SerializedNodeWithId;
use crate::options::SnapshotOptions;
use crate::walk::WalkContext;

pub use crate::error::SnapshotError;
pub use crate::mirror::{Mirror, NodeHandle, IGNORED_NODE};
pub use crate::model::{AttributeMap, AttributeValue, NodeData};
pub use crate::options::{
    ClassMatcher, MaskInputOptions, MaskInputsSetting, SimpleSelector, SlimDomOptions,
    SlimDomSetting, SnapshotOptions,
};
pub use crate::walk::{Clock, NoClock, ShadowHost, WalkCallbacks};

/// `snapshot(document, options)` (spec.md §4.9): the crate's one public
/// entry point. Applies the defaults described in spec.md §4.9 (already
/// baked into `SnapshotOptions::default()`) and walks `document`.
///
/// Returns `None` only if `document` itself is of an unknown node kind
/// (spec.md §7: "unknown node types ... return null; a console warning
/// is emitted" — here, a `tracing::warn!` inside the walker).
pub fn snapshot(
    document: &NodeRef,
    base_url: &Url,
    options: &SnapshotOptions,
    mirror: &HashMirror,
) -> (Option<SerializedNodeWithId>, Vec<PendingResource>) {
    let _span = info_span!("snapshot").entered();
    let wctx = WalkContext::headless(options, mirror);
    let mut pending = Vec::new();
    let root = walk::serialize_node_with_id(document, base_url, None, &wctx, &mut pending);
    (root, pending)
}

/// Same as [`snapshot`], but with every host trait seam supplied
/// explicitly (canvas capture, media state, layout geometry, custom
/// element registry, stylesheet text, shadow roots, iframe/stylesheet
/// async loaders, a clock, and observational callbacks) rather than the
/// all-absent [`WalkContext::headless`] defaults.
pub fn snapshot_with_context(
    document: &NodeRef,
    base_url: &Url,
    wctx: &WalkContext<'_>,
) -> (Option<SerializedNodeWithId>, Vec<PendingResource>) {
    let _span = info_span!("snapshot").entered();
    let mut pending = Vec::new();
    let root = walk::serialize_node_with_id(document, base_url, None, wctx, &mut pending);
    (root, pending)
}
