use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::quality::quality_label;
use super::types::{Extraction, VideoSource};
use super::{ExtractionContext, ExtractionStrategy};

const MARKER: &str = "VIDEO_CONFIG";
const CONFIG_PREFIX: &str = "VIDEO_CONFIG =";
const SCRIPT_END: &str = "</script>";

/// Oldest response format: the page itself embeds a `VIDEO_CONFIG`
/// JSON blob. Still served for some tokens, and free to check since the
/// HTML is already in hand.
pub struct LegacyConfigStrategy;

/// Pulls the config blob out of the page, or None when the marker is
/// missing, the JSON is broken, or the stream list is empty. All three
/// just mean "not this format", never an error.
pub fn parse_video_config(html: &str) -> Option<Extraction> {
    if !html.contains(MARKER) {
        return None;
    }

    let raw = html
        .split(CONFIG_PREFIX)
        .nth(1)?
        .split(SCRIPT_END)
        .next()?
        .trim();

    // The blob arrives with JSON-escaped '&' and '=' inside URLs.
    let unescaped = raw.replace("\\u0026", "&").replace("\\u003d", "=");
    let decoded: Value = serde_json::from_str(&unescaped).ok()?;

    let streams = decoded.get("streams")?.as_array()?;
    if streams.is_empty() {
        return None;
    }

    let sources: Vec<VideoSource> = streams
        .iter()
        .filter_map(|stream| {
            let url = stream.get("play_url")?.as_str()?;
            let format_id = match stream.get("format_id") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => String::new(),
            };
            Some(VideoSource::mp4(url, quality_label(&format_id)))
        })
        .collect();

    if sources.is_empty() {
        return None;
    }

    let image = decoded
        .get("thumbnail")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    Some(Extraction { sources, image })
}

#[async_trait]
impl ExtractionStrategy for LegacyConfigStrategy {
    fn name(&self) -> &str {
        "legacy-config"
    }

    async fn attempt(&self, ctx: &ExtractionContext) -> Option<Extraction> {
        let extraction = parse_video_config(&ctx.html);
        if extraction.is_none() {
            debug!("No usable VIDEO_CONFIG in page");
        }
        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_embedded_config() {
        let html = r#"<html><script>var VIDEO_CONFIG = {"streams":[{"play_url":"https://x/y.mp4","format_id":"22"}],"thumbnail":"https://x/t.jpg"}</script></html>"#;
        let extraction = parse_video_config(html).unwrap();
        assert_eq!(extraction.sources.len(), 1);
        assert_eq!(extraction.sources[0].file, "https://x/y.mp4");
        assert_eq!(extraction.sources[0].label, "720p");
        assert_eq!(extraction.sources[0].mime, "video/mp4");
        assert_eq!(extraction.image, "https://x/t.jpg");
    }

    #[test]
    fn unescapes_ampersand_and_equals() {
        let html = r#"<script>VIDEO_CONFIG = {"streams":[{"play_url":"https://v.example/play?id=1&itag=18","format_id":"18"}]}</script>"#;
        let extraction = parse_video_config(html).unwrap();
        assert_eq!(
            extraction.sources[0].file,
            "https://v.example/play?id=1&itag=18"
        );
        assert_eq!(extraction.sources[0].label, "360p");
        assert_eq!(extraction.image, "");
    }

    #[test]
    fn missing_marker_is_not_applicable() {
        assert!(parse_video_config("<html>no config here</html>").is_none());
    }

    #[test]
    fn broken_json_is_not_applicable() {
        let html = "<script>VIDEO_CONFIG = {not json</script>";
        assert!(parse_video_config(html).is_none());
    }

    #[test]
    fn empty_stream_list_is_not_applicable() {
        let html = r#"<script>VIDEO_CONFIG = {"streams":[]}</script>"#;
        assert!(parse_video_config(html).is_none());
    }

    #[test]
    fn unknown_format_id_labels_auto() {
        let html = r#"<script>VIDEO_CONFIG = {"streams":[{"play_url":"https://x/y.mp4","format_id":"999"}]}</script>"#;
        let extraction = parse_video_config(html).unwrap();
        assert_eq!(extraction.sources[0].label, "Auto");
    }
}
