//! Strategy 4: last resort, "N followers" anywhere in the rendered text.

use std::sync::LazyLock;

use regex::Regex;

use super::{CountExtractor, ExtractedProfile, PageDocument, COUNT_PATTERN};
use crate::counts::parse_count;

static FOLLOWERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i){COUNT_PATTERN}\s*followers\b")).expect("valid regex")
});
static FOLLOWING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i){COUNT_PATTERN}\s*following\b")).expect("valid regex")
});

pub struct VisibleTextExtractor;

impl CountExtractor for VisibleTextExtractor {
    fn name(&self) -> &'static str {
        "visible-text"
    }

    fn extract(&self, doc: &PageDocument) -> Option<ExtractedProfile> {
        let text = doc.text();
        let followers = FOLLOWERS_RE
            .captures_iter(text)
            .find_map(|cap| parse_count(&cap[1]))?;
        let following = FOLLOWING_RE
            .captures_iter(text)
            .find_map(|cap| parse_count(&cap[1]))
            .unwrap_or(0);
        Some(ExtractedProfile {
            followers,
            following,
            ..ExtractedProfile::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_header_counters() {
        let doc = PageDocument::parse(
            "<ul><li><span>42</span> posts</li><li><span title=\"9,876\">9.8K</span> followers</li><li><span>123</span> following</li></ul>",
        );
        let found = VisibleTextExtractor.extract(&doc).unwrap();
        assert_eq!(found.followers, 9_800);
        assert_eq!(found.following, 123);
    }

    #[test]
    fn ignores_counts_inside_scripts() {
        let doc = PageDocument::parse("<script>var s = '500 followers';</script><p>No data</p>");
        assert!(VisibleTextExtractor.extract(&doc).is_none());
    }
}
