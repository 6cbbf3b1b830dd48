/// Maps a Blogger/YouTube format id (itag) to a resolution label.
/// Total: anything unrecognized is "Auto".
pub fn quality_label(format_id: &str) -> &'static str {
    match format_id {
        "17" | "132" => "144p",
        "5" | "36" | "133" => "240p",
        "18" | "34" | "43" | "134" => "360p",
        "35" | "44" | "59" | "135" => "480p",
        "22" | "45" | "136" => "720p",
        "37" | "46" | "137" => "1080p",
        "38" => "Original",
        _ => "Auto",
    }
}

/// Rough numeric rank for ordering labels, highest quality first.
pub fn quality_rank(label: &str) -> u32 {
    if label == "Original" {
        return 10_000;
    }
    label
        .trim_end_matches('p')
        .parse::<u32>()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_itags_map_to_labels() {
        assert_eq!(quality_label("22"), "720p");
        assert_eq!(quality_label("18"), "360p");
        assert_eq!(quality_label("37"), "1080p");
        assert_eq!(quality_label("38"), "Original");
        assert_eq!(quality_label("137"), "1080p");
    }

    #[test]
    fn lookup_is_total() {
        assert_eq!(quality_label("999"), "Auto");
        assert_eq!(quality_label(""), "Auto");
        assert_eq!(quality_label("not-a-number"), "Auto");
    }

    #[test]
    fn rank_orders_labels() {
        assert!(quality_rank("Original") > quality_rank("1080p"));
        assert!(quality_rank("1080p") > quality_rank("720p"));
        assert!(quality_rank("720p") > quality_rank("Auto"));
        assert_eq!(quality_rank("Auto"), 0);
    }
}
