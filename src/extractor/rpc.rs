use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, trace};

use super::search::{FoundSource, find_sources};
use super::transport::Transport;
use super::types::{Extraction, VideoSource};
use super::{ExtractionContext, ExtractionStrategy};

const RPC_ID: &str = "W8PsLe";
const ORIGIN: &str = "https://www.blogger.com";
const XSSI_PREFIX: &str = ")]}'";
/// Envelope entries carrying an actual response payload.
const RESPONSE_FRAGMENT_TAG: &str = "wrb.fr";

/// Emulates the batchexecute call the player UI makes. The argument
/// shape is reverse-engineered and has drifted across provider builds,
/// so several candidate encodings are tried in order; each candidate is
/// an independent request, not a repeat of the previous one.
pub struct RpcStrategy {
    transport: Arc<Transport>,
    /// `%TOKEN%` templates from config, overriding the built-in list.
    arg_templates: Option<Vec<String>>,
    origin: String,
}

impl RpcStrategy {
    pub fn new(transport: Arc<Transport>, arg_templates: Option<Vec<String>>) -> Self {
        Self {
            transport,
            arg_templates,
            origin: ORIGIN.to_string(),
        }
    }

    /// Points the strategy at a different host. Used by tests; also the
    /// hook for fronting the provider with a proxy.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    fn rpc_url(&self, build_label: &str) -> String {
        format!(
            "{}/_/BloggerVideoPlayerUi/data?rpcids={RPC_ID}&source-path={}&bl={}&hl=en&soc-app=1&soc-platform=1&soc-device=1&_reqid=12345&rt=c",
            self.origin,
            urlencoding::encode("/video.g"),
            urlencoding::encode(build_label),
        )
    }

    /// Candidate argument encodings, most likely first. Variant A is
    /// what the page's `data-p` attribute describes; the rest have been
    /// seen on other provider builds.
    pub fn candidate_args(&self, token: &str) -> Vec<String> {
        if let Some(templates) = &self.arg_templates {
            return templates
                .iter()
                .map(|t| t.replace("%TOKEN%", token))
                .collect();
        }
        vec![
            json!([token, "", false, false]).to_string(),
            json!([token, "", [false], [false, 1]]).to_string(),
            json!([Value::Null, token, "", false, false]).to_string(),
            json!([token, "", [[false]], [false, 1]]).to_string(),
        ]
    }
}

pub fn encode_envelope(args: &str) -> String {
    json!([[[RPC_ID, args, Value::Null, "generic"]]]).to_string()
}

pub fn encode_body(envelope: &str, at_token: Option<&str>) -> String {
    let mut body = format!("f.req={}", urlencoding::encode(envelope));
    if let Some(at) = at_token {
        body.push_str(&format!("&at={}", urlencoding::encode(at)));
    }
    body
}

/// Drops the anti-hijacking literal the provider prepends to every
/// batchexecute response.
pub fn strip_xssi(body: &str) -> &str {
    body.strip_prefix(XSSI_PREFIX)
        .map(|rest| rest.strip_prefix('\n').unwrap_or(rest))
        .unwrap_or(body)
        .trim_start()
}

/// Parses a batchexecute response into the inner payloads of its
/// `wrb.fr` fragments. Each payload is itself a JSON string, re-parsed
/// here. Anything malformed is simply skipped.
pub fn decode_payloads(body: &str) -> Vec<Value> {
    let clean = strip_xssi(body);
    let Ok(outer) = serde_json::from_str::<Value>(clean) else {
        return Vec::new();
    };
    let Some(entries) = outer.as_array() else {
        return Vec::new();
    };

    let mut payloads = Vec::new();
    for entry in entries {
        let Some(item) = entry.as_array() else {
            continue;
        };
        if item.first().and_then(|v| v.as_str()) != Some(RESPONSE_FRAGMENT_TAG) {
            continue;
        }
        let Some(inner_raw) = item.get(2).and_then(|v| v.as_str()) else {
            continue;
        };
        if let Ok(inner) = serde_json::from_str::<Value>(inner_raw) {
            if inner.is_array() {
                payloads.push(inner);
            }
        }
    }
    payloads
}

/// Collapses duplicate stream variants by their quality identifier
/// (raw format id where the payload carried one, label otherwise),
/// keeping the first seen. Distinct format ids sharing a label are
/// both kept.
pub fn dedup_by_quality_id(found: Vec<FoundSource>) -> Vec<VideoSource> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::with_capacity(found.len());
    for f in found {
        if seen.iter().any(|id| *id == f.quality_id) {
            continue;
        }
        seen.push(f.quality_id);
        out.push(f.source);
    }
    out
}

#[async_trait]
impl ExtractionStrategy for RpcStrategy {
    fn name(&self) -> &str {
        "batchexecute-rpc"
    }

    async fn attempt(&self, ctx: &ExtractionContext) -> Option<Extraction> {
        let url = self.rpc_url(&ctx.session.build_label);
        let candidates = self.candidate_args(&ctx.token);

        for (i, args) in candidates.iter().enumerate() {
            let envelope = encode_envelope(args);
            let body = encode_body(&envelope, ctx.session.at_token.as_deref());

            let headers = [
                ("Origin", ORIGIN),
                ("Referer", ctx.page_url.as_str()),
                ("X-Same-Domain", "1"),
                ("Cookie", ctx.session.cookies.as_str()),
            ];

            let (status, text) = match self.transport.post_form(&url, &headers, body).await {
                Ok(resp) => resp,
                Err(e) => {
                    debug!("RPC candidate {} transport failure: {}", i + 1, e);
                    continue;
                }
            };

            if !(200..300).contains(&status) {
                debug!("RPC candidate {} returned status {}", i + 1, status);
                continue;
            }

            for payload in decode_payloads(&text) {
                let found = find_sources(&payload);
                if !found.is_empty() {
                    trace!("RPC candidate {} produced {} source(s)", i + 1, found.len());
                    return Some(Extraction {
                        sources: dedup_by_quality_id(found),
                        image: String::new(),
                    });
                }
            }
            debug!("RPC candidate {} parsed but held no sources", i + 1);
        }

        None
    }
}
