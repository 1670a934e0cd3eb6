//! Count extraction from a profile page.
//!
//! The page is parsed once into a [`PageDocument`]; independent
//! [`CountExtractor`] strategies then look at it in priority order
//! (structured data, embedded script payloads, meta tags, visible text) and
//! the first one that finds a positive follower count wins.

mod jsonld;
mod meta;
mod script;
mod visible_text;

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

pub use jsonld::JsonLdExtractor;
pub use meta::MetaTagExtractor;
pub use script::EmbeddedScriptExtractor;
pub use visible_text::VisibleTextExtractor;

static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid regex"));
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z][a-z0-9:_-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});
static LD_JSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid regex")
});
static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>|<style\b[^>]*>.*?</style>|<!--.*?-->")
        .expect("valid regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// What a strategy managed to read off the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedProfile {
    pub followers: u64,
    pub following: u64,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    pub profile_pic_url: Option<String>,
}

/// A profile page parsed once for all extractors.
#[derive(Debug, Clone)]
pub struct PageDocument {
    html: String,
    meta: HashMap<String, String>,
    ld_json: Vec<serde_json::Value>,
    text: String,
}

impl PageDocument {
    #[must_use]
    pub fn parse(html: impl Into<String>) -> Self {
        let html = html.into();
        let meta = parse_meta_tags(&html);
        let ld_json = LD_JSON_RE
            .captures_iter(&html)
            .filter_map(|cap| cap.get(1))
            .filter_map(|m| serde_json::from_str(m.as_str().trim()).ok())
            .collect();
        let text = visible_text(&html);
        Self {
            html,
            meta,
            ld_json,
            text,
        }
    }

    /// The raw markup, including inline scripts.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Content of the first `<meta>` whose `property` or `name` equals `key`
    /// (case-insensitive), entity-decoded.
    #[must_use]
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    /// Every `application/ld+json` block that parsed as JSON.
    #[must_use]
    pub fn ld_json(&self) -> &[serde_json::Value] {
        &self.ld_json
    }

    /// Text a reader would see: scripts, styles, comments, and tags removed,
    /// entities decoded, whitespace collapsed.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One heuristic for reading counts off a [`PageDocument`].
pub trait CountExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Some` only when a positive follower count was found.
    fn extract(&self, doc: &PageDocument) -> Option<ExtractedProfile>;
}

/// The strategies in the order they should be tried.
#[must_use]
pub fn default_extractors() -> Vec<Box<dyn CountExtractor>> {
    vec![
        Box::new(JsonLdExtractor),
        Box::new(EmbeddedScriptExtractor),
        Box::new(MetaTagExtractor),
        Box::new(VisibleTextExtractor),
    ]
}

/// Runs `extractors` in order; the first positive follower count wins.
#[must_use]
pub fn extract_first(
    extractors: &[Box<dyn CountExtractor>],
    doc: &PageDocument,
) -> Option<(&'static str, ExtractedProfile)> {
    extractors.iter().find_map(|extractor| {
        let found = extractor.extract(doc).filter(|p| p.followers > 0)?;
        tracing::debug!(
            extractor = extractor.name(),
            followers = found.followers,
            "page extractor matched"
        );
        Some((extractor.name(), found))
    })
}

fn parse_meta_tags(html: &str) -> HashMap<String, String> {
    let mut meta = HashMap::new();
    for tag in META_TAG_RE.find_iter(html) {
        let mut key = None;
        let mut content = None;
        for attr in ATTR_RE.captures_iter(tag.as_str()) {
            let name = attr[1].to_ascii_lowercase();
            let value = attr
                .get(2)
                .or_else(|| attr.get(3))
                .map_or("", |m| m.as_str());
            match name.as_str() {
                "property" | "name" if key.is_none() => key = Some(value.to_ascii_lowercase()),
                "content" => content = Some(html_escape::decode_html_entities(value).into_owned()),
                _ => {}
            }
        }
        if let (Some(key), Some(content)) = (key, content) {
            meta.entry(key).or_insert(content);
        }
    }
    meta
}

fn visible_text(html: &str) -> String {
    let without_code = SCRIPT_STYLE_RE.replace_all(html, " ");
    let without_tags = TAG_RE.replace_all(&without_code, " ");
    let decoded = html_escape::decode_html_entities(&without_tags);
    WHITESPACE_RE.replace_all(decoded.trim(), " ").into_owned()
}

/// Pattern shared by the text-based extractors: a count such as `1,234`,
/// `12.5K`, or `3M`.
pub(crate) const COUNT_PATTERN: &str = r"(\d[\d.,]*\s?[KkMmBb]?)";

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
