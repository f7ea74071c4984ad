use crate::fetcher::{DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT};
use crate::{
    is_amazon_url, AmazonExtractor, ExtractError, ExtractionResult, Fetcher, FetcherConfig,
    MetadataExtractor, MetadataSource, ProductMetadata,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Knobs for one deployment of the service. Both deployment environments run
/// the same orchestrator; only these values differ.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub timeout: Duration,
    pub vendor_overlays_enabled: bool,
    pub max_redirects: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            vendor_overlays_enabled: true,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

/// The composed extraction pipeline: validate, fetch, overlay, generic
/// fallback, assemble. Stateless across calls apart from the fetcher's
/// connection pool.
#[derive(Clone)]
pub struct ExtractionService {
    fetcher: Fetcher,
    generic: MetadataExtractor,
    amazon: AmazonExtractor,
    vendor_overlays_enabled: bool,
}

impl Default for ExtractionService {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionService {
    pub fn new() -> Self {
        Self::new_with_config(ExtractionConfig::default())
    }

    pub fn new_with_config(config: ExtractionConfig) -> Self {
        let fetcher = Fetcher::new_with_config(FetcherConfig {
            timeout: config.timeout,
            max_redirects: config.max_redirects,
            ..FetcherConfig::default()
        });
        Self::new_with_fetcher(fetcher, config.vendor_overlays_enabled)
    }

    pub fn new_with_fetcher(fetcher: Fetcher, vendor_overlays_enabled: bool) -> Self {
        Self {
            fetcher,
            generic: MetadataExtractor::new(),
            amazon: AmazonExtractor::new(),
            vendor_overlays_enabled,
        }
    }

    /// Syntactic and scheme validation; runs before any network call.
    fn validate_url(url: &str) -> Result<Url, ExtractError> {
        let parsed = Url::parse(url)?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(ExtractError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Like [`MetadataSource::extract`] but carries the failure kind, so the
    /// transport layer can map timeouts and bad input to distinct statuses.
    #[instrument(level = "debug", skip(self))]
    pub async fn try_extract(&self, url: &str) -> Result<ExtractionResult, ExtractError> {
        Self::validate_url(url)?;

        let html = self.fetcher.fetch(url).await?;

        let mut metadata = if self.vendor_overlays_enabled && is_amazon_url(url) {
            debug!(url = %url, "Recognized amazon URL, running vendor overlay");
            self.amazon.extract(&html)
        } else {
            ProductMetadata::default()
        };

        // Generic extractors fill whatever the overlay left unresolved. An
        // all-absent outcome is valid; the page simply had no recognizable
        // metadata.
        let generic = self.generic.extract(&html);
        metadata.title = metadata.title.or(generic.title);
        metadata.image_url = metadata.image_url.or(generic.image_url);
        metadata.price = metadata.price.or(generic.price);
        metadata.description = metadata.description.or(generic.description);

        Ok(ExtractionResult {
            success: true,
            metadata,
        })
    }
}

#[async_trait]
impl MetadataSource for ExtractionService {
    /// Best-effort extraction that never fails past its boundary: any fetch
    /// or validation error collapses to the all-absent failure shape.
    async fn extract(&self, url: &str) -> ExtractionResult {
        match self.try_extract(url).await {
            Ok(result) => result,
            Err(e) => {
                e.log();
                ExtractionResult::failed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_schemes() {
        assert!(ExtractionService::validate_url("https://example.com").is_ok());
        assert!(ExtractionService::validate_url("http://example.com").is_ok());
        assert!(matches!(
            ExtractionService::validate_url("ftp://example.com"),
            Err(ExtractError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            ExtractionService::validate_url("not a url"),
            Err(ExtractError::InvalidUrl(_))
        ));
    }
}
