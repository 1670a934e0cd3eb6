//! Strategy 1: schema.org structured data.
//!
//! Profile pages have shipped a `Person` (or `ProfilePage` wrapping one)
//! whose `interactionStatistic` lists a `FollowAction` with the follower
//! count in `userInteractionCount`.

use serde_json::Value;

use super::{non_empty, CountExtractor, ExtractedProfile, PageDocument};
use crate::counts::count_from_value;

/// Nesting depth searched for `interactionStatistic` below each block.
const MAX_DEPTH: usize = 4;

pub struct JsonLdExtractor;

impl CountExtractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "json-ld"
    }

    fn extract(&self, doc: &PageDocument) -> Option<ExtractedProfile> {
        doc.ld_json().iter().find_map(|block| {
            let mut candidates = vec![block];
            if let Some(items) = block.as_array() {
                candidates.extend(items);
            }
            if let Some(graph) = block.get("@graph").and_then(Value::as_array) {
                candidates.extend(graph);
            }
            candidates
                .into_iter()
                .find_map(|item| profile_from_item(item, MAX_DEPTH))
        })
    }
}

fn profile_from_item(item: &Value, depth: usize) -> Option<ExtractedProfile> {
    let object = item.as_object()?;

    if let Some(followers) = object.get("interactionStatistic").and_then(follow_count) {
        return Some(ExtractedProfile {
            followers,
            following: 0,
            full_name: object.get("name").and_then(Value::as_str).and_then(non_empty),
            biography: object
                .get("description")
                .and_then(Value::as_str)
                .and_then(non_empty),
            profile_pic_url: image_url(object.get("image")),
        });
    }

    if depth == 0 {
        return None;
    }

    // `mainEntity` / `mainEntityofPage` / `author` wrappers: the statistics
    // live on the nested object but the name may only be on the outer one.
    object.values().find_map(|child| {
        let mut found = profile_from_item(child, depth - 1)?;
        if found.full_name.is_none() {
            found.full_name = object.get("name").and_then(Value::as_str).and_then(non_empty);
        }
        Some(found)
    })
}

fn follow_count(stats: &Value) -> Option<u64> {
    let entries: Vec<&Value> = match stats {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    entries
        .into_iter()
        .filter(|entry| is_follow_action(entry.get("interactionType")))
        .find_map(|entry| entry.get("userInteractionCount").and_then(count_from_value))
}

fn is_follow_action(kind: Option<&Value>) -> bool {
    match kind {
        Some(Value::String(s)) => s.ends_with("FollowAction"),
        Some(Value::Object(o)) => o
            .get("@type")
            .and_then(Value::as_str)
            .is_some_and(|s| s.ends_with("FollowAction")),
        _ => false,
    }
}

fn image_url(image: Option<&Value>) -> Option<String> {
    match image? {
        Value::String(s) => non_empty(s),
        Value::Object(o) => o.get("url").and_then(Value::as_str).and_then(non_empty),
        Value::Array(items) => items.first().and_then(|first| image_url(Some(first))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(ld: &str) -> PageDocument {
        PageDocument::parse(format!(
            r#"<html><head><script type="application/ld+json">{ld}</script></head></html>"#
        ))
    }

    #[test]
    fn reads_person_with_statistic_array() {
        let doc = page(
            r#"{"@type":"Person","name":"Alice","description":"Bio here","image":"https://cdn.example.com/a.jpg",
                "interactionStatistic":[
                  {"@type":"InteractionCounter","interactionType":"http://schema.org/WriteAction","userInteractionCount":7},
                  {"@type":"InteractionCounter","interactionType":"http://schema.org/FollowAction","userInteractionCount":"1234"}
                ]}"#,
        );
        let found = JsonLdExtractor.extract(&doc).unwrap();
        assert_eq!(found.followers, 1_234);
        assert_eq!(found.full_name.as_deref(), Some("Alice"));
        assert_eq!(found.biography.as_deref(), Some("Bio here"));
        assert_eq!(
            found.profile_pic_url.as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
    }

    #[test]
    fn reads_nested_main_entity_of_page() {
        let doc = page(
            r#"{"@type":"ProfilePage","name":"Bob (@bob)",
                "mainEntityofPage":{"@type":"ProfilePage",
                  "interactionStatistic":{"@type":"InteractionCounter",
                    "interactionType":{"@type":"FollowAction"},"userInteractionCount":1000}}}"#,
        );
        let found = JsonLdExtractor.extract(&doc).unwrap();
        assert_eq!(found.followers, 1_000);
        assert_eq!(found.full_name.as_deref(), Some("Bob (@bob)"));
    }

    #[test]
    fn reads_graph_container() {
        let doc = page(
            r#"{"@graph":[{"@type":"WebSite"},{"@type":"Person","interactionStatistic":
                [{"interactionType":"https://schema.org/FollowAction","userInteractionCount":42}]}]}"#,
        );
        assert_eq!(JsonLdExtractor.extract(&doc).unwrap().followers, 42);
    }

    #[test]
    fn ignores_blocks_without_follow_statistics() {
        let doc = page(r#"{"@type":"Organization","name":"Instagram"}"#);
        assert!(JsonLdExtractor.extract(&doc).is_none());
    }
}
