use std::time::Duration;

use reqwest::header::SET_COOKIE;

use crate::common::{ExtractError, HttpClient};

/// Raw result of the initial page fetch. Set-cookie values are kept
/// uninterpreted; flattening them is the session builder's job.
#[derive(Debug)]
pub struct PageResponse {
    pub body: String,
    pub set_cookie: Vec<String>,
}

/// One exchange with the provider, no retries. Two clients because the
/// page fetch must follow redirects while RPC calls must not.
pub struct Transport {
    page: reqwest::Client,
    rpc: reqwest::Client,
    user_agent: String,
}

impl Transport {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            page: HttpClient::page_client(timeout)?,
            rpc: HttpClient::rpc_client(timeout)?,
            user_agent: HttpClient::default_user_agent(),
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// GET the provider page with realistic navigation headers.
    pub async fn get_page(&self, url: &str) -> Result<PageResponse, ExtractError> {
        let resp = self
            .page
            .get(url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Cache-Control", "no-cache")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await?;

        let set_cookie = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(|v| v.to_string())
            .collect();

        let body = resp.text().await?;

        Ok(PageResponse { body, set_cookie })
    }

    /// POST a form-encoded body with caller-supplied headers. Returns the
    /// status and raw body; interpreting either is up to the caller.
    pub async fn post_form(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: String,
    ) -> Result<(u16, String), ExtractError> {
        let mut req = self
            .rpc
            .post(url)
            .header("Accept", "*/*")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Content-Type", "application/x-www-form-urlencoded");

        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let resp = req.body(body).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;

        Ok((status, body))
    }
}
