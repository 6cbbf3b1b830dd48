use std::time::Duration;

use reqwest::{Client, Error, redirect};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 25;

pub struct HttpClient;

impl HttpClient {
  pub fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
  }

  /// Client for the initial page fetch. Follows redirects like a browser would.
  pub fn page_client(timeout: Duration) -> Result<Client, Error> {
    Client::builder()
      .user_agent(Self::default_user_agent())
      .timeout(timeout)
      .build()
  }

  /// Client for batchexecute calls. The caller supplies an explicit path,
  /// so redirects are never followed here.
  pub fn rpc_client(timeout: Duration) -> Result<Client, Error> {
    Client::builder()
      .user_agent(Self::default_user_agent())
      .redirect(redirect::Policy::none())
      .timeout(timeout)
      .build()
  }
}
