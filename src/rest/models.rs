use serde::Serialize;

use crate::extractor::types::ExtractionResult;

/// Outer response envelope. `success` reflects whether the request
/// itself was serviceable; an exhausted pipeline is still `true` with
/// `data.status == "fail"`.
#[derive(Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: ExtractionResult,
}

impl ApiResponse {
    pub fn ok(data: ExtractionResult) -> Self {
        Self {
            success: true,
            data,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: ExtractionResult::fail(message),
        }
    }
}
