use async_trait::async_trait;

mod amazon;
mod error;
mod extractor;
mod fetcher;
mod logging;
mod server;
mod service;
mod structured;

pub use amazon::AmazonExtractor;
pub use error::ExtractError;
pub use extractor::MetadataExtractor;
pub use fetcher::{Fetcher, FetcherConfig};
pub use logging::{setup_logging, LogConfig};
pub use server::{build_router, AppState};
pub use service::{ExtractionConfig, ExtractionService};

/// Metadata fields harvested from a product page. Every field is
/// independently optional; a page with none of them is still a valid
/// extraction.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProductMetadata {
    pub title: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

/// Outcome of one extraction attempt. `success` reflects only whether the
/// page was fetched; sparse metadata is normal, not a failure.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExtractionResult {
    pub success: bool,
    pub metadata: ProductMetadata,
}

impl ExtractionResult {
    pub fn failed() -> Self {
        Self {
            success: false,
            metadata: ProductMetadata::default(),
        }
    }
}

#[async_trait]
pub trait MetadataSource {
    async fn extract(&self, url: &str) -> ExtractionResult;
}

pub fn is_amazon_url(url: &str) -> bool {
    url.contains("amazon.")
}
