// snapper::options
//
// The Rust encoding of spec.md §4.9's options object. A typed,
// `Default`-implementing struct rather than a stringly-typed map,
// matching this corpus's preference for validated options structs
// (SPEC_FULL.md "Configuration / options").

use std::time::Duration;

use regex::Regex;

/// Either a literal class name or a regex, matching spec.md §4.2's
/// `blockClass`/`maskTextClass: string | regex`. Resolved once at
/// `snapshot()` entry (DESIGN NOTES §9: "variant selection at
/// construction time") rather than re-dispatched per node.
#[derive(Clone)]
pub enum ClassMatcher {
    Literal(String),
    Regex(Regex),
}

impl ClassMatcher {
    pub fn matches(&self, class: &str) -> bool {
        match self {
            ClassMatcher::Literal(s) => s == class,
            ClassMatcher::Regex(re) => re.is_match(class),
        }
    }
}

impl Default for ClassMatcher {
    fn default() -> Self {
        ClassMatcher::Literal(String::new())
    }
}

impl std::fmt::Debug for ClassMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassMatcher::Literal(s) => write!(f, "ClassMatcher::Literal({s:?})"),
            ClassMatcher::Regex(re) => write!(f, "ClassMatcher::Regex({})", re.as_str()),
        }
    }
}

/// A simple selector, supporting the subset this crate's block/mask
/// policies actually need: a tag name, `.class`, `#id`, and
/// `[attr]`/`[attr=value]` predicates, comma-separated as alternatives.
/// Full CSS combinators (descendant, child, sibling) are out of scope —
/// spec.md's `blockSelector`/`maskTextSelector` are typically a single
/// class or attribute selector in practice, and a hand-rolled full CSS
/// selector engine is not worth the weight here (see DESIGN.md).
#[derive(Debug, Clone)]
pub struct SimpleSelector(Vec<CompoundSelector>);

#[derive(Debug, Clone, Default)]
struct CompoundSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl SimpleSelector {
    pub fn parse(selector: &str) -> Self {
        let compounds = selector
            .split(',')
            .map(|part| Self::parse_compound(part.trim()))
            .collect();
        SimpleSelector(compounds)
    }

    fn parse_compound(part: &str) -> CompoundSelector {
        let mut compound = CompoundSelector::default();
        let mut chars = part.char_indices().peekable();
        let mut current = String::new();
        let mut mode = ' ';

        let flush = |mode: char, current: &mut String, compound: &mut CompoundSelector| {
            if current.is_empty() {
                return;
            }
            match mode {
                ' ' => compound.tag = Some(current.to_ascii_lowercase()),
                '.' => compound.classes.push(std::mem::take(current)),
                '#' => compound.id = Some(std::mem::take(current)),
                _ => {}
            }
            current.clear();
        };

        while let Some((i, c)) = chars.next() {
            match c {
                '.' | '#' => {
                    flush(mode, &mut current, &mut compound);
                    mode = c;
                }
                '[' => {
                    flush(mode, &mut current, &mut compound);
                    let rest = &part[i + 1..];
                    if let Some(end) = rest.find(']') {
                        let attr_expr = &rest[..end];
                        if let Some(eq) = attr_expr.find('=') {
                            let name = attr_expr[..eq].trim().to_string();
                            let value = attr_expr[eq + 1..]
                                .trim()
                                .trim_matches(|c| c == '"' || c == '\'')
                                .to_string();
                            compound.attrs.push((name, Some(value)));
                        } else {
                            compound.attrs.push((attr_expr.trim().to_string(), None));
                        }
                        for _ in 0..=end {
                            chars.next();
                        }
                    }
                    mode = ' ';
                }
                _ => current.push(c),
            }
        }
        flush(mode, &mut current, &mut compound);
        compound
    }

    /// Does `(tag, id, classes, attrs)` satisfy any compound alternative?
    pub fn matches(
        &self,
        tag_name: &str,
        id: Option<&str>,
        classes: &[&str],
        attrs: &[(&str, &str)],
    ) -> bool {
        self.0.iter().any(|compound| {
            if let Some(want_tag) = &compound.tag {
                if want_tag != tag_name {
                    return false;
                }
            }
            if let Some(want_id) = &compound.id {
                if id != Some(want_id.as_str()) {
                    return false;
                }
            }
            if !compound
                .classes
                .iter()
                .all(|c| classes.contains(&c.as_str()))
            {
                return false;
            }
            compound.attrs.iter().all(|(name, value)| {
                attrs.iter().any(|(an, av)| {
                    an == name
                        && match value {
                            Some(v) => av == v,
                            None => true,
                        }
                })
            })
        })
    }
}

/// Per-input-type masking flags (spec.md §4.9's `maskAllInputs`).
#[derive(Debug, Clone)]
pub struct MaskInputOptions {
    pub color: bool,
    pub date: bool,
    pub datetime_local: bool,
    pub email: bool,
    pub month: bool,
    pub number: bool,
    pub range: bool,
    pub search: bool,
    pub tel: bool,
    pub text: bool,
    pub time: bool,
    pub url: bool,
    pub week: bool,
    pub textarea: bool,
    pub select: bool,
    pub password: bool,
}

impl MaskInputOptions {
    /// `maskAllInputs=false`: only `password` is masked.
    pub fn password_only() -> Self {
        MaskInputOptions {
            color: false,
            date: false,
            datetime_local: false,
            email: false,
            month: false,
            number: false,
            range: false,
            search: false,
            tel: false,
            text: false,
            time: false,
            url: false,
            week: false,
            textarea: false,
            select: false,
            password: true,
        }
    }

    /// `maskAllInputs=true`: every input type is masked.
    pub fn all() -> Self {
        MaskInputOptions {
            color: true,
            date: true,
            datetime_local: true,
            email: true,
            month: true,
            number: true,
            range: true,
            search: true,
            tel: true,
            text: true,
            time: true,
            url: true,
            week: true,
            textarea: true,
            select: true,
            password: true,
        }
    }

    pub fn is_masked(&self, input_type: &str) -> bool {
        match input_type {
            "color" => self.color,
            "date" => self.date,
            "datetime-local" => self.datetime_local,
            "email" => self.email,
            "month" => self.month,
            "number" => self.number,
            "range" => self.range,
            "search" => self.search,
            "tel" => self.tel,
            "text" | "" => self.text,
            "time" => self.time,
            "url" => self.url,
            "week" => self.week,
            "textarea" => self.textarea,
            "select" => self.select,
            "password" => self.password,
            _ => self.text,
        }
    }
}

impl Default for MaskInputOptions {
    fn default() -> Self {
        Self::password_only()
    }
}

/// Slim-DOM category flags (spec.md §4.4). `all()` enables every
/// category; `all_with_keywords()` additionally enables
/// `headMetaDescKeywords` (spec.md §4.9: `'all'` vs plain `true`).
#[derive(Debug, Clone, Default)]
pub struct SlimDomOptions {
    pub comment: bool,
    pub script: bool,
    pub head_favicon: bool,
    pub head_whitespace: bool,
    pub head_meta_desc_keywords: bool,
    pub head_meta_social: bool,
    pub head_meta_robots: bool,
    pub head_meta_http_equiv: bool,
    pub head_meta_authorship: bool,
    pub head_meta_verification: bool,
}

impl SlimDomOptions {
    pub fn all() -> Self {
        SlimDomOptions {
            comment: true,
            script: true,
            head_favicon: true,
            head_whitespace: true,
            head_meta_desc_keywords: false,
            head_meta_social: true,
            head_meta_robots: true,
            head_meta_http_equiv: true,
            head_meta_authorship: true,
            head_meta_verification: true,
        }
    }

    pub fn all_with_keywords() -> Self {
        SlimDomOptions {
            head_meta_desc_keywords: true,
            ..Self::all()
        }
    }

    pub fn none() -> Self {
        SlimDomOptions::default()
    }
}

/// `slimDOM` option: `true`/`'all'` expand to a preset, `false` expands
/// to "nothing filtered", otherwise the caller's literal choice is used
/// verbatim (spec.md §4.9).
#[derive(Debug, Clone)]
pub enum SlimDomSetting {
    Enabled,
    EnabledAll,
    Disabled,
    Custom(SlimDomOptions),
}

impl SlimDomSetting {
    pub fn resolve(&self) -> SlimDomOptions {
        match self {
            SlimDomSetting::Enabled => SlimDomOptions::all(),
            SlimDomSetting::EnabledAll => SlimDomOptions::all_with_keywords(),
            SlimDomSetting::Disabled => SlimDomOptions::none(),
            SlimDomSetting::Custom(opts) => opts.clone(),
        }
    }
}

/// `maskAllInputs` option: boolean shorthand or a literal
/// `MaskInputOptions` (spec.md §4.9).
#[derive(Debug, Clone)]
pub enum MaskInputsSetting {
    All,
    PasswordOnly,
    Custom(MaskInputOptions),
}

impl MaskInputsSetting {
    pub fn resolve(&self) -> MaskInputOptions {
        match self {
            MaskInputsSetting::All => MaskInputOptions::all(),
            MaskInputsSetting::PasswordOnly => MaskInputOptions::password_only(),
            MaskInputsSetting::Custom(opts) => opts.clone(),
        }
    }
}

type MaskTextFn = Box<dyn Fn(&str, Option<&str>) -> String>;
type MaskInputFn = Box<dyn Fn(&str) -> String>;
type KeepIframeSrcFn = Box<dyn Fn(&str) -> bool>;

/// The full options surface for `snapshot()` (spec.md §4.9).
pub struct SnapshotOptions {
    pub block_class: ClassMatcher,
    pub block_selector: Option<SimpleSelector>,
    pub mask_text_class: ClassMatcher,
    pub mask_text_selector: Option<SimpleSelector>,
    pub inline_stylesheet: bool,
    pub inline_images: bool,
    pub record_canvas: bool,
    pub iframe_load_timeout: Duration,
    pub stylesheet_load_timeout: Duration,
    pub keep_iframe_src_fn: KeepIframeSrcFn,
    pub mask_all_inputs: MaskInputsSetting,
    pub slim_dom: SlimDomSetting,
    pub preserve_white_space: bool,
    pub mask_text_fn: Option<MaskTextFn>,
    pub mask_input_fn: Option<MaskInputFn>,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        SnapshotOptions {
            block_class: ClassMatcher::Literal("rr-block".to_string()),
            block_selector: None,
            mask_text_class: ClassMatcher::Literal("rr-mask".to_string()),
            mask_text_selector: None,
            inline_stylesheet: true,
            inline_images: false,
            record_canvas: false,
            iframe_load_timeout: Duration::from_millis(5000),
            stylesheet_load_timeout: Duration::from_millis(5000),
            keep_iframe_src_fn: Box::new(|_| false),
            mask_all_inputs: MaskInputsSetting::PasswordOnly,
            slim_dom: SlimDomSetting::Disabled,
            preserve_white_space: true,
            mask_text_fn: None,
            mask_input_fn: None,
        }
    }
}

impl SnapshotOptions {
    pub fn builder() -> SnapshotOptionsBuilder {
        SnapshotOptionsBuilder(SnapshotOptions::default())
    }
}

/// Builder for `SnapshotOptions`, since the struct mixes plain data with
/// non-`Clone`/non-`Debug` closures that would be awkward to construct
/// with struct-update syntax everywhere.
pub struct SnapshotOptionsBuilder(SnapshotOptions);

impl SnapshotOptionsBuilder {
    pub fn block_class(mut self, matcher: ClassMatcher) -> Self {
        self.0.block_class = matcher;
        self
    }

    pub fn block_selector(mut self, selector: &str) -> Self {
        self.0.block_selector = Some(SimpleSelector::parse(selector));
        self
    }

    pub fn mask_text_class(mut self, matcher: ClassMatcher) -> Self {
        self.0.mask_text_class = matcher;
        self
    }

    pub fn mask_text_selector(mut self, selector: &str) -> Self {
        self.0.mask_text_selector = Some(SimpleSelector::parse(selector));
        self
    }

    pub fn inline_stylesheet(mut self, value: bool) -> Self {
        self.0.inline_stylesheet = value;
        self
    }

    pub fn inline_images(mut self, value: bool) -> Self {
        self.0.inline_images = value;
        self
    }

    pub fn record_canvas(mut self, value: bool) -> Self {
        self.0.record_canvas = value;
        self
    }

    pub fn iframe_load_timeout(mut self, timeout: Duration) -> Self {
        self.0.iframe_load_timeout = timeout;
        self
    }

    pub fn stylesheet_load_timeout(mut self, timeout: Duration) -> Self {
        self.0.stylesheet_load_timeout = timeout;
        self
    }

    pub fn keep_iframe_src_fn(mut self, f: impl Fn(&str) -> bool + 'static) -> Self {
        self.0.keep_iframe_src_fn = Box::new(f);
        self
    }

    pub fn mask_all_inputs(mut self, setting: MaskInputsSetting) -> Self {
        self.0.mask_all_inputs = setting;
        self
    }

    pub fn slim_dom(mut self, setting: SlimDomSetting) -> Self {
        self.0.slim_dom = setting;
        self
    }

    pub fn preserve_white_space(mut self, value: bool) -> Self {
        self.0.preserve_white_space = value;
        self
    }

    pub fn mask_text_fn(mut self, f: impl Fn(&str, Option<&str>) -> String + 'static) -> Self {
        self.0.mask_text_fn = Some(Box::new(f));
        self
    }

    pub fn mask_input_fn(mut self, f: impl Fn(&str) -> String + 'static) -> Self {
        self.0.mask_input_fn = Some(Box::new(f));
        self
    }

    pub fn build(self) -> SnapshotOptions {
        self.0
    }
}
