//! Strategy 2: JSON fragments embedded in inline scripts
//! (`"edge_followed_by":{"count":N}`, `"follower_count":N`, ...).

use std::sync::LazyLock;

use regex::Regex;

use super::{non_empty, CountExtractor, ExtractedProfile, PageDocument};

static FOLLOWERS_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r#""edge_followed_by"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#).expect("valid regex"),
        Regex::new(r#""follower_count"\s*:\s*(\d+)"#).expect("valid regex"),
        Regex::new(r#""followers_count"\s*:\s*(\d+)"#).expect("valid regex"),
    ]
});
static FOLLOWING_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r#""edge_follow"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#).expect("valid regex"),
        Regex::new(r#""following_count"\s*:\s*(\d+)"#).expect("valid regex"),
    ]
});
static FULL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""full_name"\s*:\s*("(?:[^"\\]|\\.)*")"#).expect("valid regex"));
static BIOGRAPHY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""biography"\s*:\s*("(?:[^"\\]|\\.)*")"#).expect("valid regex"));
static PROFILE_PIC_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r#""profile_pic_url_hd"\s*:\s*("(?:[^"\\]|\\.)*")"#).expect("valid regex"),
        Regex::new(r#""profile_pic_url"\s*:\s*("(?:[^"\\]|\\.)*")"#).expect("valid regex"),
    ]
});

pub struct EmbeddedScriptExtractor;

impl CountExtractor for EmbeddedScriptExtractor {
    fn name(&self) -> &'static str {
        "embedded-script"
    }

    fn extract(&self, doc: &PageDocument) -> Option<ExtractedProfile> {
        let html = doc.html();
        let followers = first_number(&FOLLOWERS_RES, html)?;
        Some(ExtractedProfile {
            followers,
            following: first_number(&FOLLOWING_RES, html).unwrap_or(0),
            full_name: json_string(&FULL_NAME_RE, html),
            biography: json_string(&BIOGRAPHY_RE, html),
            profile_pic_url: PROFILE_PIC_RES.iter().find_map(|re| json_string(re, html)),
        })
    }
}

/// First positive count across all matches; `0` placeholders in preloaded
/// state are skipped.
fn first_number(patterns: &[Regex], html: &str) -> Option<u64> {
    patterns
        .iter()
        .flat_map(|re| re.captures_iter(html))
        .filter_map(|cap| cap[1].parse::<u64>().ok())
        .find(|n| *n > 0)
}

/// Captures a JSON string literal and unescapes it (`é`, `\/`, ...).
fn json_string(re: &Regex, html: &str) -> Option<String> {
    let literal = re.captures(html)?.get(1)?.as_str();
    let value: String = serde_json::from_str(literal).ok()?;
    non_empty(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_graphql_edges() {
        let doc = PageDocument::parse(
            r#"<script>window._sharedData = {"entry_data":{"ProfilePage":[{"graphql":{"user":{
                "biography":"Café owner","full_name":"Alice A.",
                "edge_followed_by":{"count":98765},"edge_follow":{"count":321},
                "profile_pic_url":"https:\/\/cdn.example.com\/small.jpg",
                "profile_pic_url_hd":"https:\/\/cdn.example.com\/hd.jpg"}}}]}};</script>"#,
        );
        let found = EmbeddedScriptExtractor.extract(&doc).unwrap();
        assert_eq!(found.followers, 98_765);
        assert_eq!(found.following, 321);
        assert_eq!(found.full_name.as_deref(), Some("Alice A."));
        assert_eq!(found.biography.as_deref(), Some("Café owner"));
        assert_eq!(
            found.profile_pic_url.as_deref(),
            Some("https://cdn.example.com/hd.jpg")
        );
    }

    #[test]
    fn reads_flat_api_style_fields() {
        let doc = PageDocument::parse(
            r#"<script type="application/json">{"user":{"follower_count":1500,"following_count":20}}</script>"#,
        );
        let found = EmbeddedScriptExtractor.extract(&doc).unwrap();
        assert_eq!(found.followers, 1_500);
        assert_eq!(found.following, 20);
        assert!(found.full_name.is_none());
    }

    #[test]
    fn zero_placeholder_does_not_hide_real_count() {
        let doc = PageDocument::parse(
            r#"<script>{"follower_count":0,"edge_followed_by":{"count":500}}</script>"#,
        );
        let found = EmbeddedScriptExtractor.extract(&doc).unwrap();
        assert_eq!(found.followers, 500);
    }

    #[test]
    fn missing_follower_field_yields_none() {
        let doc = PageDocument::parse(r#"<script>{"following_count":20}</script>"#);
        assert!(EmbeddedScriptExtractor.extract(&doc).is_none());
    }
}
