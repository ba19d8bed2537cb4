use crate::{
    error::AppError,
    models::ShortUrlResult,
    provider::Shortener,
    store::MappingStore,
};
use std::sync::Arc;

/// Resolves a long URL to its short form: stored mapping first, the external
/// provider only on a miss. Successful provider answers are persisted before
/// being returned.
#[derive(Clone)]
pub struct UrlService {
    store: Arc<dyn MappingStore>,
    shortener: Arc<dyn Shortener>,
}

impl UrlService {
    pub fn new(store: Arc<dyn MappingStore>, shortener: Arc<dyn Shortener>) -> Self {
        Self { store, shortener }
    }

    /// The long URL is used as the key exactly as given; only an empty value
    /// is rejected, before anything is read or called.
    pub async fn handle(&self, long_url: &str) -> Result<ShortUrlResult, AppError> {
        if long_url.is_empty() {
            return Err(AppError::InvalidInput);
        }

        if let Some(short_url) = self.store.lookup(long_url).await? {
            return Ok(ShortUrlResult {
                short_url,
                cache_hit: true,
            });
        }

        tracing::debug!("Cache miss for {}, calling shortening provider", long_url);
        let short_url = self.shortener.shorten(long_url).await?;
        self.store.save(long_url, &short_url).await?;
        tracing::info!("Shortened {} -> {}", long_url, short_url);

        Ok(ShortUrlResult {
            short_url,
            cache_hit: false,
        })
    }
}
