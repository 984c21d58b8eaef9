// snapper::stylesheet
//
// Stylesheet text extraction (spec.md §4.3). There is no live
// `CSSStyleSheet` object in a headless context, so "access may throw"
// becomes "the embedder's `StylesheetTextSource` returns `None`"; the
// disposition is identical either way — treat it as "no inline capture
// possible" and leave the `<link>` intact.

use kuchikiki::NodeRef;
use tracing::debug;

use crate::error::SnapshotError;
use crate::url::absolutize_stylesheet;

/// Supplies stylesheet text for a `<link rel=stylesheet href=...>`,
/// standing in for `CSSStyleSheet.cssRules` (spec.md §4.3's "Access may
/// throw (cross-origin sheets)"). A `None` return is the "couldn't
/// access it" case; implementors should not panic.
pub trait StylesheetTextSource {
    fn stylesheet_text(&self, href: &str) -> Option<String>;

    /// Text for an empty `<style>` element whose `sheet` was populated
    /// dynamically (spec.md §4.3: "For empty `<style>` elements whose
    /// `sheet` is populated ... capture `sheet` and set `_cssText`").
    /// There is no `href` to key on here, so the embedder is handed the
    /// live node itself. Defaults to "nothing available" so embedders
    /// that only ever fetch by `href` don't need to implement this.
    fn dynamic_style_text(&self, _style_element: &NodeRef) -> Option<String> {
        None
    }
}

/// A source that never has anything cached — used when the caller has
/// no out-of-band way to fetch stylesheet text (the default; `<link>`
/// elements then stay un-inlined until `onceStylesheetLoaded` fires).
pub struct NoStylesheets;

impl StylesheetTextSource for NoStylesheets {
    fn stylesheet_text(&self, _href: &str) -> Option<String> {
        None
    }
}

/// `stringifyStylesheet`: absolutize every `url(...)` in `css_text`
/// against `href` and return the result. Concatenation of per-rule
/// `cssText` is the embedder's job (it owns the live stylesheet object);
/// this crate only normalizes what it's handed.
pub fn stringify_stylesheet(css_text: &str, href: &str) -> String {
    absolutize_stylesheet(css_text, href)
}

/// Try to inline a `<link rel=stylesheet>`'s text via `source`. Returns
/// `None` if unavailable — the caller should leave `rel`/`href` as-is in
/// that case (spec.md §4.3).
pub fn try_inline_link_stylesheet(
    source: &dyn StylesheetTextSource,
    href: &str,
) -> Option<String> {
    let Some(text) = source.stylesheet_text(href) else {
        let err = SnapshotError::StylesheetUnavailable { href: href.to_string() };
        debug!(error = %err, "leaving link stylesheet un-inlined");
        return None;
    };
    Some(stringify_stylesheet(&text, href))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);
    impl StylesheetTextSource for Fixed {
        fn stylesheet_text(&self, _href: &str) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[test]
    fn inlines_when_source_available() {
        let src = Fixed(".a{background:url(img/x.png)}");
        let result =
            try_inline_link_stylesheet(&src, "http://h/a/b/c.html").expect("should inline");
        assert_eq!(result, ".a{background:url(http://h/a/b/img/x.png)}");
    }

    #[test]
    fn no_source_returns_none() {
        assert!(try_inline_link_stylesheet(&NoStylesheets, "http://h/a/b/c.css").is_none());
    }
}
