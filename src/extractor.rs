use crate::{structured, ProductMetadata};
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

/// Generic metadata extractor, responsible for pulling product fields out of
/// arbitrary page markup. Every strategy is best-effort: malformed or
/// truncated HTML yields absent fields, never an error.
#[derive(Clone)]
pub struct MetadataExtractor;

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, html: &str) -> ProductMetadata {
        let document = Html::parse_document(html);

        let metadata = ProductMetadata {
            title: self.extract_title(&document),
            image_url: self.extract_image(&document),
            price: self.extract_price(html),
            description: self.extract_description(&document),
        };

        debug!(
            title = ?metadata.title,
            price = ?metadata.price,
            "Generic extraction finished"
        );
        metadata
    }

    fn extract_title(&self, document: &Html) -> Option<String> {
        let og_title_selector = Selector::parse("meta[property='og:title']").ok()?;
        let title_selector = Selector::parse("title").ok()?;

        let og_title = document
            .select(&og_title_selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        // No (or empty) Open Graph title, fall back to the document title element
        og_title.or_else(|| {
            document
                .select(&title_selector)
                .next()
                .map(|el| el.text().collect::<String>())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
    }

    fn extract_image(&self, document: &Html) -> Option<String> {
        let og_image_selector = Selector::parse("meta[property='og:image']").ok()?;

        document
            .select(&og_image_selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn extract_description(&self, document: &Html) -> Option<String> {
        let og_desc_selector = Selector::parse("meta[property='og:description']").ok()?;

        document
            .select(&og_desc_selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Price strategies in fallback order: structured data first, then the
    /// common plain-text renderings. The first strictly positive parse wins.
    pub fn extract_price(&self, html: &str) -> Option<f64> {
        for node in structured::product_nodes(html) {
            if let Some(price) = structured::offer_price(&node) {
                debug!(price, "Price resolved from JSON-LD offers");
                return Some(price);
            }
        }
        self.extract_price_from_text(html)
    }

    fn extract_price_from_text(&self, html: &str) -> Option<f64> {
        let patterns = [
            // "price":"19.99" style key/value pairs in embedded JSON
            r#""price"\s*:\s*"?(\d+(?:\.\d+)?)"#,
            // bare currency-prefixed amount
            r"\$\s?(\d+(?:\.\d{1,2})?)",
            // the word "price" followed eventually by an amount
            r"(?is)price.{0,60}?\$?\s?(\d+(?:\.\d{1,2})?)",
        ];

        for pattern in patterns {
            let Ok(re) = Regex::new(pattern) else {
                continue;
            };
            for cap in re.captures_iter(html) {
                let Some(price) = cap.get(1).and_then(|m| m.as_str().parse::<f64>().ok())
                else {
                    continue;
                };
                // $0.00 placeholders from lazy-loaded price widgets
                if price > 0.0 {
                    return Some(price);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_og_title_both_attribute_orders() {
        let extractor = MetadataExtractor::new();

        let forward = r#"<meta property="og:title" content="Foo"/>"#;
        assert_eq!(extractor.extract(forward).title.as_deref(), Some("Foo"));

        let reversed = r#"<meta content="Bar" property="og:title"/>"#;
        assert_eq!(extractor.extract(reversed).title.as_deref(), Some("Bar"));
    }

    #[test]
    fn test_title_falls_back_to_title_element() {
        let extractor = MetadataExtractor::new();
        let html = "<html><head><title>  Widget  </title></head></html>";
        assert_eq!(extractor.extract(html).title.as_deref(), Some("Widget"));
    }

    #[test]
    fn test_empty_og_title_falls_back_to_title_element() {
        let extractor = MetadataExtractor::new();
        let html = r#"<html><head>
            <meta property="og:title" content=""/>
            <title>Fallback Widget</title>
        </head></html>"#;
        assert_eq!(
            extractor.extract(html).title.as_deref(),
            Some("Fallback Widget")
        );
    }

    #[test]
    fn test_image_and_description_have_no_fallback() {
        let extractor = MetadataExtractor::new();
        let html = r#"<html><head>
            <title>Page</title>
            <meta name="description" content="plain meta description">
        </head></html>"#;

        let metadata = extractor.extract(html);
        assert!(metadata.image_url.is_none());
        assert!(metadata.description.is_none());
    }

    #[test]
    fn test_structured_price_beats_text_price() {
        let extractor = MetadataExtractor::new();
        let html = r#"<html><body>
            <script type="application/ld+json">
                {"@type":"Product","offers":{"price":"19.99"}}
            </script>
            <span>$9.99</span>
        </body></html>"#;

        assert_eq!(extractor.extract(html).price, Some(19.99));
    }

    #[test]
    fn test_zero_dollar_placeholder_rejected() {
        let extractor = MetadataExtractor::new();
        let html = "<html><body><span class='price'>$0.00</span></body></html>";
        assert_eq!(extractor.extract(html).price, None);
    }

    #[test]
    fn test_text_price_patterns_in_order() {
        let extractor = MetadataExtractor::new();

        let keyed = r#"<script>{"price":"24.50"}</script>"#;
        assert_eq!(extractor.extract_price(keyed), Some(24.50));

        let bare = "<div>Only $12.34 today</div>";
        assert_eq!(extractor.extract_price(bare), Some(12.34));

        let worded = "<div>Price: <b>56.78</b></div>";
        assert_eq!(extractor.extract_price(worded), Some(56.78));
    }

    #[test]
    fn test_worded_price_without_trailing_cents() {
        let extractor = MetadataExtractor::new();
        assert_eq!(extractor.extract_price("<div>Price: 56</div>"), Some(56.0));
        assert_eq!(
            extractor.extract_price("<div>Price: 56.5</div>"),
            Some(56.5)
        );
    }

    #[test]
    fn test_unrecognizable_html_yields_all_absent() {
        let extractor = MetadataExtractor::new();
        let metadata = extractor.extract("<html><body><p>nothing here</p></body></html>");
        assert_eq!(metadata, ProductMetadata::default());
    }

    #[test]
    fn test_truncated_markup_does_not_panic() {
        let extractor = MetadataExtractor::new();
        let metadata = extractor.extract("<html><head><meta property=\"og:title");
        assert!(metadata.title.is_none());
    }
}
