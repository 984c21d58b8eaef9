// snapper::async_hooks
//
// `onceIframeLoaded`/`onceStylesheetLoaded` (spec.md §4.8), re-expressed
// per DESIGN NOTES §9 as a future/promise abstraction rather than
// event-listener + timer callbacks: the walker hands back a synchronous
// tree plus a list of `PendingResource`s, and whoever owns an executor
// drives each one to completion with whatever timeout policy it likes.
// This crate supplies the race itself (`first_wins`); it does not own an
// executor, so the "ready" and "timeout" futures are both supplied by
// the caller (matching spec.md §5: "single-threaded cooperative", and
// this crate stays executor-agnostic per SPEC_FULL.md §4.8).

use std::future::Future;
use std::pin::Pin;

use futures_util::future::{select, Either};
use kuchikiki::NodeRef;

/// A node tree isn't `Send` (it's `Rc`-backed), and traversal is
/// single-threaded cooperative anyway (spec.md §5), so pending resources
/// are driven on a single-threaded/local executor.
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Stands in for `contentDocument` + the `load` event race (spec.md
/// §4.8). `try_now` covers "already complete" (spec.md: `readyState ===
/// 'complete'` and not the `about:blank`-not-yet-navigated case);
/// `on_load` covers "arm a `load` listener for the eventual navigation".
pub trait SubDocumentLoader {
    fn try_now(&self, iframe: &NodeRef) -> Option<NodeRef>;
    fn on_load(&self, iframe: &NodeRef) -> LocalBoxFuture<'static, Option<NodeRef>>;
}

/// No embedder-supplied iframe loading: `<iframe>` content is never
/// inlined, matching the "cross-origin, unreachable" disposition.
pub struct NoSubDocuments;

impl SubDocumentLoader for NoSubDocuments {
    fn try_now(&self, _iframe: &NodeRef) -> Option<NodeRef> {
        None
    }

    fn on_load(&self, _iframe: &NodeRef) -> LocalBoxFuture<'static, Option<NodeRef>> {
        Box::pin(std::future::pending())
    }
}

/// Stands in for `link.sheet` becoming populated (spec.md §4.8's
/// `onceStylesheetLoaded`).
pub trait AsyncStylesheetLoader {
    fn on_load(&self, href: &str) -> LocalBoxFuture<'static, Option<String>>;
}

pub struct NoAsyncStylesheets;

impl AsyncStylesheetLoader for NoAsyncStylesheets {
    fn on_load(&self, _href: &str) -> LocalBoxFuture<'static, Option<String>> {
        Box::pin(std::future::pending())
    }
}

/// What a pending resource resolves to once it's ready.
pub enum ResourceOutcome {
    IframeDocument(NodeRef),
    StylesheetText(String),
}

pub enum ResourceKind {
    Iframe,
    Stylesheet,
}

/// One resource the walker couldn't resolve synchronously. `owner_id` is
/// the mirror ID of the `<iframe>`/`<link>` element that requested it, so
/// the consumer knows where to splice the eventual result back in
/// (spec.md §4.7 steps 11-12: `onIframeLoad`/`onStylesheetLoad` receive
/// the owning element alongside the re-serialized payload).
pub struct PendingResource {
    pub owner_id: i64,
    pub kind: ResourceKind,
    pub future: LocalBoxFuture<'static, Option<ResourceOutcome>>,
}

/// Race `ready` against `timeout`; first to resolve wins (spec.md §4.8:
/// "first-wins between the event and the timer"). A timeout win yields
/// `None` — "the listener is invoked with whatever state is currently
/// observable; no error is surfaced" (spec.md §7) becomes "the pending
/// resource silently has no outcome".
pub async fn first_wins<T>(
    ready: impl Future<Output = T>,
    timeout: impl Future<Output = ()>,
) -> Option<T> {
    futures_util::pin_mut!(ready);
    futures_util::pin_mut!(timeout);
    match select(ready, timeout).await {
        Either::Left((value, _)) => Some(value),
        Either::Right(_) => None,
    }
}

/// Build the `PendingResource` for an `<iframe>` that couldn't be
/// inlined synchronously (spec.md §4.7 step 11 / §4.8). `timeout` is the
/// caller's deadline future (e.g. `tokio::time::sleep(iframe_load_timeout)`
/// in an integration that has an executor); this crate does not start a
/// clock itself.
pub fn schedule_iframe_load(
    owner_id: i64,
    loader: &dyn SubDocumentLoader,
    iframe: &NodeRef,
    timeout: impl Future<Output = ()> + 'static,
) -> PendingResource {
    let ready = loader.on_load(iframe);
    let future: LocalBoxFuture<'static, Option<ResourceOutcome>> = Box::pin(async move {
        first_wins(ready, timeout)
            .await
            .flatten()
            .map(ResourceOutcome::IframeDocument)
    });
    PendingResource {
        owner_id,
        kind: ResourceKind::Iframe,
        future,
    }
}

/// Build the `PendingResource` for a `<link rel=stylesheet>` whose text
/// wasn't available synchronously (spec.md §4.7 step 12 / §4.8).
pub fn schedule_stylesheet_load(
    owner_id: i64,
    loader: &dyn AsyncStylesheetLoader,
    href: &str,
    timeout: impl Future<Output = ()> + 'static,
) -> PendingResource {
    let ready = loader.on_load(href);
    let future: LocalBoxFuture<'static, Option<ResourceOutcome>> = Box::pin(async move {
        first_wins(ready, timeout)
            .await
            .flatten()
            .map(ResourceOutcome::StylesheetText)
    });
    PendingResource {
        owner_id,
        kind: ResourceKind::Stylesheet,
        future,
    }
}
