pub mod browser;
pub mod legacy;
pub mod quality;
pub mod rpc;
pub mod search;
pub mod session;
pub mod transport;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::common::ExtractError;
use crate::config::ExtractorConfig;

use browser::{BrowserObservationStrategy, BrowserProbe, UnavailableProbe};
use legacy::LegacyConfigStrategy;
use rpc::RpcStrategy;
use session::SessionContext;
use transport::Transport;
use types::{Extraction, ExtractionResult};

const PAGE_URL_BASE: &str = "https://www.blogger.com/video.g?token=";

/// Everything a strategy gets to work with: the token, the fetched
/// page, and the session scraped from it. Built once per request.
pub struct ExtractionContext {
    pub token: String,
    pub page_url: String,
    pub html: String,
    pub session: SessionContext,
}

/// One way of getting sources out of the provider. `None` covers both
/// "not applicable here" and "tried and failed" — either way the
/// pipeline moves on to the next strategy.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &str;

    async fn attempt(&self, ctx: &ExtractionContext) -> Option<Extraction>;
}

pub type BoxedStrategy = Box<dyn ExtractionStrategy>;

/// The extraction pipeline: one page fetch, then strategies in fixed
/// priority order, cheapest first, stopping at the first one that
/// yields sources.
pub struct Extractor {
    transport: Arc<Transport>,
    strategies: Vec<BoxedStrategy>,
}

impl Extractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self, reqwest::Error> {
        Self::with_probe(config, Arc::new(UnavailableProbe))
    }

    /// Same as `new` but with a caller-supplied browser capability.
    pub fn with_probe(
        config: &ExtractorConfig,
        probe: Arc<dyn BrowserProbe>,
    ) -> Result<Self, reqwest::Error> {
        let transport = Arc::new(Transport::new(Duration::from_secs(config.timeout_secs))?);

        let mut strategies: Vec<BoxedStrategy> = vec![
            Box::new(LegacyConfigStrategy),
            Box::new(RpcStrategy::new(
                transport.clone(),
                config.rpc_arg_variants.clone(),
            )),
        ];
        if config.browser {
            strategies.push(Box::new(BrowserObservationStrategy::new(
                probe,
                transport.user_agent().to_string(),
            )));
        }

        Ok(Self {
            transport,
            strategies,
        })
    }

    /// Bypasses the built-in strategy list; used by tests to drive the
    /// pipeline with synthetic strategies.
    pub fn with_strategies(transport: Arc<Transport>, strategies: Vec<BoxedStrategy>) -> Self {
        Self {
            transport,
            strategies,
        }
    }

    /// Runs the whole pipeline for one token.
    ///
    /// Only two things escalate as `Err`: an empty token and a transport
    /// failure on the initial page fetch. Every later fault is absorbed
    /// into the strategy chain and lands in the returned result.
    pub async fn extract(&self, token: &str) -> Result<ExtractionResult, ExtractError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ExtractError::EmptyToken);
        }

        let page_url = format!("{}{}", PAGE_URL_BASE, urlencoding::encode(token));
        let page = self.transport.get_page(&page_url).await?;
        let session = session::build(&page.body, &page.set_cookie);

        let ctx = ExtractionContext {
            token: token.to_string(),
            page_url,
            html: page.body,
            session,
        };

        Ok(self.run_strategies(&ctx).await)
    }

    /// Strategy loop, separated from the page fetch so it can run
    /// against a pre-built context.
    pub async fn run_strategies(&self, ctx: &ExtractionContext) -> ExtractionResult {
        for strategy in &self.strategies {
            debug!("Attempting strategy: {}", strategy.name());
            if let Some(extraction) = strategy.attempt(ctx).await {
                if !extraction.sources.is_empty() {
                    info!(
                        "Extraction succeeded via {} ({} source(s))",
                        strategy.name(),
                        extraction.sources.len()
                    );
                    return ExtractionResult::ok(extraction);
                }
            }
        }

        debug!("All strategies exhausted for token");
        ExtractionResult::fail("Video config not found")
    }
}
