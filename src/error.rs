// snapper::error
//
// Every failure mode the walker can hit internally. None of these cross
// the `snapshot()` boundary (see module docs on `walk`): each swallow
// site logs one of these through `tracing` and falls back to a degraded
// record, per the error-handling design in SPEC_FULL.md §7.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("unknown node type encountered during traversal")]
    UnknownNodeType,

    #[error("base URL could not be parsed: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("stylesheet source unavailable for {href}")]
    StylesheetUnavailable { href: String },

    #[error("canvas capture failed: {0}")]
    CanvasCaptureFailed(String),
}
