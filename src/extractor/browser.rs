use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::quality::{quality_label, quality_rank};
use super::types::{Extraction, VideoSource};
use super::{ExtractionContext, ExtractionStrategy};

/// How long the probe is allowed to watch the page's network traffic.
pub const OBSERVATION_WINDOW: Duration = Duration::from_secs(12);

/// One media URL seen on the wire, with the itag pulled from it.
#[derive(Debug, Clone)]
pub struct Observation {
    pub url: String,
    pub itag: String,
}

/// External headless-browser capability. Implementations load the page
/// under the given User-Agent, watch requests and responses for the
/// window, and report media URLs found either as direct requests or by
/// text-scanning response bodies. The session behind a call must be
/// released before `observe` returns, on every exit path.
#[async_trait]
pub trait BrowserProbe: Send + Sync {
    async fn observe(
        &self,
        page_url: &str,
        user_agent: &str,
        window: Duration,
    ) -> Result<Vec<Observation>, String>;
}

/// Stand-in wired when no browser runtime exists in the environment.
pub struct UnavailableProbe;

#[async_trait]
impl BrowserProbe for UnavailableProbe {
    async fn observe(
        &self,
        _page_url: &str,
        _user_agent: &str,
        _window: Duration,
    ) -> Result<Vec<Observation>, String> {
        Err("browser capability not available".to_string())
    }
}

/// Last-resort strategy: let a real browser load the player and watch
/// what it fetches. Anything going wrong on the probe side just makes
/// this strategy inapplicable.
pub struct BrowserObservationStrategy {
    probe: Arc<dyn BrowserProbe>,
    user_agent: String,
    window: Duration,
}

impl BrowserObservationStrategy {
    pub fn new(probe: Arc<dyn BrowserProbe>, user_agent: String) -> Self {
        Self {
            probe,
            user_agent,
            window: OBSERVATION_WINDOW,
        }
    }
}

/// Dedups observations by itag (first seen wins), labels them, and
/// orders them best quality first.
pub fn collate_observations(observations: Vec<Observation>) -> Vec<VideoSource> {
    let mut seen: Vec<String> = Vec::new();
    let mut sources: Vec<VideoSource> = Vec::new();
    for obs in observations {
        if seen.iter().any(|t| *t == obs.itag) {
            continue;
        }
        seen.push(obs.itag.clone());
        sources.push(VideoSource::mp4(obs.url, quality_label(&obs.itag)));
    }
    sources.sort_by(|a, b| quality_rank(&b.label).cmp(&quality_rank(&a.label)));
    sources
}

#[async_trait]
impl ExtractionStrategy for BrowserObservationStrategy {
    fn name(&self) -> &str {
        "browser-observation"
    }

    async fn attempt(&self, ctx: &ExtractionContext) -> Option<Extraction> {
        let observations = match self
            .probe
            .observe(&ctx.page_url, &self.user_agent, self.window)
            .await
        {
            Ok(obs) => obs,
            Err(e) => {
                debug!("Browser probe unavailable or failed: {}", e);
                return None;
            }
        };

        let sources = collate_observations(observations);
        if sources.is_empty() {
            debug!("Browser probe observed no media URLs");
            return None;
        }

        Some(Extraction {
            sources,
            image: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::session::SessionContext;

    struct FixedProbe(Vec<Observation>);

    #[async_trait]
    impl BrowserProbe for FixedProbe {
        async fn observe(
            &self,
            _page_url: &str,
            _user_agent: &str,
            _window: Duration,
        ) -> Result<Vec<Observation>, String> {
            Ok(self.0.clone())
        }
    }

    fn ctx() -> ExtractionContext {
        ExtractionContext {
            token: "t".to_string(),
            page_url: "https://www.blogger.com/video.g?token=t".to_string(),
            html: String::new(),
            session: SessionContext {
                cookies: String::new(),
                build_label: "bl".to_string(),
                at_token: None,
            },
        }
    }

    fn obs(url: &str, itag: &str) -> Observation {
        Observation {
            url: url.to_string(),
            itag: itag.to_string(),
        }
    }

    #[test]
    fn collation_dedups_by_itag_and_sorts_descending() {
        let sources = collate_observations(vec![
            obs("https://g/v?itag=18", "18"),
            obs("https://g/v?itag=22", "22"),
            obs("https://g/v?itag=18&dup=1", "18"),
            obs("https://g/v?itag=37", "37"),
        ]);
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].label, "1080p");
        assert_eq!(sources[1].label, "720p");
        assert_eq!(sources[2].label, "360p");
        // First-seen URL kept for the duplicated itag.
        assert_eq!(sources[2].file, "https://g/v?itag=18");
    }

    #[tokio::test]
    async fn unavailable_probe_is_inapplicable() {
        let strategy = BrowserObservationStrategy::new(
            Arc::new(UnavailableProbe),
            "ua".to_string(),
        );
        assert!(strategy.attempt(&ctx()).await.is_none());
    }

    #[tokio::test]
    async fn zero_observations_is_inapplicable() {
        let strategy =
            BrowserObservationStrategy::new(Arc::new(FixedProbe(Vec::new())), "ua".to_string());
        assert!(strategy.attempt(&ctx()).await.is_none());
    }

    #[tokio::test]
    async fn observations_become_sorted_sources() {
        let strategy = BrowserObservationStrategy::new(
            Arc::new(FixedProbe(vec![
                obs("https://g/v?itag=18", "18"),
                obs("https://g/v?itag=22", "22"),
            ])),
            "ua".to_string(),
        );
        let extraction = strategy.attempt(&ctx()).await.unwrap();
        assert_eq!(extraction.sources[0].label, "720p");
        assert_eq!(extraction.sources[1].label, "360p");
        assert_eq!(extraction.image, "");
    }
}
