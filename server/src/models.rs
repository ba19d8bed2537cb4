use serde::{Deserialize, Serialize};

/// Outcome of shortening one long URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrlResult {
    pub short_url: String,
    /// `true` when the mapping already existed and the provider was not called.
    pub cache_hit: bool,
}

/// Query string of `GET /geturl`. `url` stays optional so a missing parameter
/// reaches the handler instead of being rejected by the extractor.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GetUrlParams {
    pub url: Option<String>,
}

impl GetUrlParams {
    /// Build from decoded query pairs. A repeated `url` keeps its first value.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            url: pairs
                .into_iter()
                .find(|(key, _)| key == "url")
                .map(|(_, value)| value),
        }
    }
}

/// Success body: `{"data": "<short url>"}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse {
    pub data: String,
}

/// Error body: `{"message": "<description>"}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
