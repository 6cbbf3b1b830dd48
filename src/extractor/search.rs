use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::quality::quality_label;
use super::types::VideoSource;

/// Levels past this are not searched. The wire format is undocumented
/// and has looked arbitrarily deep in the wild; this keeps traversal
/// bounded either way.
pub const MAX_DEPTH: usize = 10;

const MEDIA_DOMAIN: &str = "googlevideo.com";

fn mp4_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https?://.+\.mp4").unwrap())
}

/// A matched leaf plus the value duplicates should be collapsed on:
/// the raw format id where the leaf carried one, the label otherwise.
#[derive(Debug, Clone)]
pub struct FoundSource {
    pub source: VideoSource,
    pub quality_id: String,
}

/// Searches an arbitrarily nested array payload for video entries.
///
/// Three leaf shapes are recognized:
///  (a) an object with `play_url` (and optionally `format_id`),
///  (b) a `[url, quality]` pair where the url is on the media domain,
///  (c) a `[url, quality]` pair where the url is any `.mp4` link.
///
/// Matches at the shallowest level win; deeper levels are only visited
/// when the current one yields nothing.
pub fn find_sources(data: &Value) -> Vec<FoundSource> {
    find_at_depth(data, 0)
}

fn find_at_depth(data: &Value, depth: usize) -> Vec<FoundSource> {
    if depth > MAX_DEPTH {
        return Vec::new();
    }
    let Some(items) = data.as_array() else {
        return Vec::new();
    };

    let mut sources = Vec::new();
    for item in items {
        if let Some(source) = match_leaf(item) {
            sources.push(source);
        }
    }
    if !sources.is_empty() {
        return sources;
    }

    for item in items {
        if item.is_array() {
            let found = find_at_depth(item, depth + 1);
            if !found.is_empty() {
                return found;
            }
        }
    }

    Vec::new()
}

fn match_leaf(item: &Value) -> Option<FoundSource> {
    if let Some(obj) = item.as_object() {
        let url = obj.get("play_url").and_then(|v| v.as_str())?;
        let format_id = match obj.get("format_id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        let label = quality_label(&format_id);
        let quality_id = if format_id.is_empty() {
            label.to_string()
        } else {
            format_id
        };
        return Some(FoundSource {
            source: VideoSource::mp4(url, label),
            quality_id,
        });
    }

    let pair = item.as_array()?;
    let url = pair.first().and_then(|v| v.as_str())?;
    if !url.contains(MEDIA_DOMAIN) && !mp4_url_re().is_match(url) {
        return None;
    }

    let label = pair
        .get(1)
        .and_then(|v| v.as_str())
        .unwrap_or("Auto");
    Some(FoundSource {
        source: VideoSource::mp4(url, label),
        quality_id: label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_object_leaf_with_quality_lookup() {
        let data = json!([{"play_url": "https://x/v.mp4", "format_id": "22"}]);
        let found = find_sources(&data);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source.label, "720p");
    }

    #[test]
    fn finds_media_domain_pair() {
        let data = json!([["https://r3---sn.googlevideo.com/videoplayback?itag=18", "360p"]]);
        let found = find_sources(&data);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source.label, "360p");
    }

    #[test]
    fn finds_plain_mp4_pair_with_auto_fallback() {
        let data = json!([["https://cdn.example.com/clip.mp4", 7]]);
        let found = find_sources(&data);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source.label, "Auto");
    }

    #[test]
    fn deep_match_wins_over_shallow_decoys() {
        // Depth-1 entries are not recognizable shapes; the only real
        // entry sits three levels down.
        let data = json!([
            ["not-a-url", "decoy"],
            [42, "also-decoy"],
            [[[{"play_url": "https://x/deep.mp4", "format_id": "37"}]]]
        ]);
        let found = find_sources(&data);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source.file, "https://x/deep.mp4");
        assert_eq!(found[0].source.label, "1080p");
    }

    #[test]
    fn shallowest_match_shadows_deeper_ones() {
        let data = json!([
            ["https://shallow.googlevideo.com/v?itag=18", "360p"],
            [["https://deep.googlevideo.com/v?itag=22", "720p"]]
        ]);
        let found = find_sources(&data);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source.file, "https://shallow.googlevideo.com/v?itag=18");
    }

    #[test]
    fn traversal_is_depth_bounded() {
        let mut data = json!([{"play_url": "https://x/v.mp4", "format_id": "22"}]);
        for _ in 0..(MAX_DEPTH + 2) {
            data = json!([data]);
        }
        assert!(find_sources(&data).is_empty());
    }

    #[test]
    fn leaves_carry_their_dedup_key() {
        let data = json!([
            {"play_url": "https://x/a.mp4", "format_id": "18"},
            ["https://g.googlevideo.com/v?itag=22", "720p"]
        ]);
        let found = find_sources(&data);
        assert_eq!(found[0].quality_id, "18");
        assert_eq!(found[1].quality_id, "720p");
    }

    #[test]
    fn non_array_input_yields_nothing() {
        assert!(find_sources(&json!({"play_url": "https://x/v.mp4"})).is_empty());
        assert!(find_sources(&json!("https://x/v.mp4")).is_empty());
        assert!(find_sources(&json!(null)).is_empty());
    }
}
