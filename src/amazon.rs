use crate::{structured, ProductMetadata};
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

/// Price element selectors on amazon product pages, in priority order. The
/// layout varies across marketplaces and A/B buckets, so several are tried.
const PRICE_SELECTORS: [&str; 5] = [
    "#corePrice_feature_div .a-offscreen",
    ".a-price .a-offscreen",
    "#priceblock_ourprice",
    "#priceblock_dealprice",
    "#price_inside_buybox",
];

/// Extractor tuned for amazon product-page markup. Purely additive: any
/// field it cannot resolve is left absent for the generic extractor.
#[derive(Clone)]
pub struct AmazonExtractor;

impl Default for AmazonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl AmazonExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, html: &str) -> ProductMetadata {
        let document = Html::parse_document(html);
        let products = structured::product_nodes(html);

        let metadata = ProductMetadata {
            title: self.extract_title(&document, &products),
            image_url: self.extract_image(&document, &products),
            price: self.extract_price(&document, html),
            description: None,
        };

        debug!(
            title = ?metadata.title,
            price = ?metadata.price,
            "Amazon overlay extraction finished"
        );
        metadata
    }

    fn extract_title(&self, document: &Html, products: &[serde_json::Value]) -> Option<String> {
        let selector = Selector::parse("#productTitle").ok()?;

        document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| products.iter().find_map(structured::product_name))
    }

    fn extract_image(&self, document: &Html, products: &[serde_json::Value]) -> Option<String> {
        if let Some(url) = products.iter().find_map(structured::product_image) {
            return Some(url);
        }

        let selector = Selector::parse("#landingImage").ok()?;
        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("src"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn extract_price(&self, document: &Html, html: &str) -> Option<f64> {
        for selector_str in PRICE_SELECTORS {
            let Ok(selector) = Selector::parse(selector_str) else {
                continue;
            };
            for element in document.select(&selector) {
                let text = element.text().collect::<String>();
                if let Some(price) = parse_leading_price(&text) {
                    debug!(selector = selector_str, price, "Amazon price element matched");
                    return Some(price);
                }
            }
        }

        // Price data embedded in the buybox JSON blobs
        let re = Regex::new(r#""priceAmount"\s*:\s*"?(\d+(?:\.\d+)?)"#).ok()?;
        re.captures(html)
            .and_then(|cap| cap.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|p| *p > 0.0)
    }
}

/// Parse the leading decimal out of a price element's text, skipping
/// currency symbols and stripping thousands separators ("$1,299.00 with
/// coupon" parses as 1299.0).
fn parse_leading_price(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let number: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    number.parse::<f64>().ok().filter(|p| *p > 0.0)
}
