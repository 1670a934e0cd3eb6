//! Strategy 3: the share-preview meta tags, e.g.
//! `og:description = "1,234 Followers, 56 Following, 7 Posts - See Instagram photos and videos from Alice (@alice)"`.

use std::sync::LazyLock;

use regex::Regex;

use super::{non_empty, CountExtractor, ExtractedProfile, PageDocument, COUNT_PATTERN};
use crate::counts::parse_count;

static COUNTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i){COUNT_PATTERN}\s+Followers?\s*,\s*{COUNT_PATTERN}\s+Following"
    ))
    .expect("valid regex")
});
static FOLLOWERS_ONLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i){COUNT_PATTERN}\s+Followers?\b")).expect("valid regex")
});
static TITLE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*\(@[^)]*\)").expect("valid regex"));

const DESCRIPTION_KEYS: [&str; 3] = ["og:description", "description", "twitter:description"];

pub struct MetaTagExtractor;

impl CountExtractor for MetaTagExtractor {
    fn name(&self) -> &'static str {
        "meta-tags"
    }

    fn extract(&self, doc: &PageDocument) -> Option<ExtractedProfile> {
        let (followers, following) = DESCRIPTION_KEYS
            .iter()
            .filter_map(|key| doc.meta(key))
            .find_map(counts_from_description)?;

        let full_name = doc
            .meta("og:title")
            .or_else(|| doc.meta("twitter:title"))
            .and_then(|title| TITLE_NAME_RE.captures(title))
            .and_then(|cap| non_empty(&cap[1]));

        Some(ExtractedProfile {
            followers,
            following,
            full_name,
            biography: None,
            profile_pic_url: doc.meta("og:image").and_then(non_empty),
        })
    }
}

fn counts_from_description(description: &str) -> Option<(u64, u64)> {
    if let Some(cap) = COUNTS_RE.captures(description) {
        let followers = parse_count(&cap[1])?;
        return Some((followers, parse_count(&cap[2]).unwrap_or(0)));
    }
    let cap = FOLLOWERS_ONLY_RE.captures(description)?;
    Some((parse_count(&cap[1])?, 0))
}
