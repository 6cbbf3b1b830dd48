use thiserror::Error;

/// Errors that escalate out of the extraction pipeline.
///
/// Everything else (bad RPC candidates, unparseable payloads, missing
/// markers) is absorbed inside the strategy chain and ends up as the
/// in-band `status: "fail"` result instead.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The request carried no token at all.
    #[error("No token")]
    EmptyToken,

    /// The initial page fetch failed. Without it there is no session
    /// context to build, so nothing downstream can run.
    #[error("page fetch failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
