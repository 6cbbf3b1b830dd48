use serde::Serialize;

/// One playable stream variant.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VideoSource {
    pub file: String,
    pub label: String,
    #[serde(rename = "type")]
    pub mime: String,
}

impl VideoSource {
    /// Blogger only ever serves mp4 variants.
    pub fn mp4(file: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            label: label.into(),
            mime: "video/mp4".to_string(),
        }
    }
}

/// What a single strategy hands back when it wins.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub sources: Vec<VideoSource>,
    pub image: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Ok,
    Fail,
}

/// Terminal artifact of the pipeline, serialized into the `data` field
/// of the response envelope.
#[derive(Debug, Serialize)]
pub struct ExtractionResult {
    pub status: ExtractionStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<VideoSource>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn ok(extraction: Extraction) -> Self {
        Self {
            status: ExtractionStatus::Ok,
            sources: extraction.sources,
            image: extraction.image,
            error: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: ExtractionStatus::Fail,
            sources: Vec::new(),
            image: String::new(),
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_serializes_wire_shape() {
        let result = ExtractionResult::ok(Extraction {
            sources: vec![VideoSource::mp4("https://x/y.mp4", "720p")],
            image: "https://x/t.jpg".to_string(),
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["sources"][0]["file"], "https://x/y.mp4");
        assert_eq!(json["sources"][0]["type"], "video/mp4");
        assert_eq!(json["image"], "https://x/t.jpg");
        assert!(json.get("error").is_none());

        let failed = serde_json::to_value(ExtractionResult::fail("Video config not found")).unwrap();
        assert_eq!(failed["status"], "fail");
        assert_eq!(failed["error"], "Video config not found");
        assert!(failed.get("sources").is_none());
    }
}
