//! schema.org Product decoding from embedded JSON-LD blocks.
//!
//! The decoded values are untrusted: every nested access is guarded and the
//! `@type` discriminator is checked before any field is read. Malformed JSON
//! in one block never aborts the scan, the block is skipped.

use scraper::{Html, Selector};
use serde_json::Value;

/// Collect every JSON-LD node in the document that declares itself a
/// schema.org Product, including nodes nested in `@graph` arrays.
pub fn product_nodes(html: &str) -> Vec<Value> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return Vec::new();
    };

    let mut nodes = Vec::new();
    for script in document.select(&selector) {
        let raw = script.text().collect::<String>();
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let Ok(value) = serde_json::from_str::<Value>(raw) else {
            continue;
        };
        collect_product_nodes(&value, &mut nodes);
    }
    nodes
}

fn collect_product_nodes(value: &Value, out: &mut Vec<Value>) {
    match value {
        Value::Object(map) => {
            if is_product_node(map.get("@type")) {
                out.push(value.clone());
            }
            for child in map.values() {
                collect_product_nodes(child, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_product_nodes(child, out);
            }
        }
        _ => {}
    }
}

fn is_product_node(node_type: Option<&Value>) -> bool {
    match node_type {
        Some(Value::String(s)) => s.eq_ignore_ascii_case("product"),
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .any(|s| s.eq_ignore_ascii_case("product")),
        _ => false,
    }
}

/// Price from a Product node's offers: either an offers object or the first
/// element of an offers array, with the price as a JSON string or number.
pub fn offer_price(node: &Value) -> Option<f64> {
    let offers = node.get("offers")?;
    let offer = match offers {
        Value::Array(items) => items.first()?,
        other => other,
    };
    parse_price_value(offer.get("price")?)
}

pub fn product_name(node: &Value) -> Option<String> {
    node.get("name")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Product image, tolerating the shapes seen in the wild: a bare string, an
/// array of strings/objects, or an ImageObject with a `url` field.
pub fn product_image(node: &Value) -> Option<String> {
    image_url_from(node.get("image")?)
}

fn image_url_from(image: &Value) -> Option<String> {
    match image {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => items.first().and_then(image_url_from),
        Value::Object(map) => map
            .get("url")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Zero and unparseable values are non-matches, not free prices. Placeholder
/// `0.00` prices show up on pages that fill the real price in lazily.
pub fn parse_price_value(value: &Value) -> Option<f64> {
    let price = match value {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    if price.is_finite() && price > 0.0 {
        Some(price)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_nodes_from_script_block() {
        let html = r#"<html><head>
            <script type="application/ld+json">
                {"@type":"Product","name":"Widget","offers":{"price":"19.99"}}
            </script>
        </head></html>"#;

        let nodes = product_nodes(html);
        assert_eq!(nodes.len(), 1);
        assert_eq!(product_name(&nodes[0]).as_deref(), Some("Widget"));
        assert_eq!(offer_price(&nodes[0]), Some(19.99));
    }

    #[test]
    fn test_malformed_block_is_skipped() {
        let html = r#"<html><head>
            <script type="application/ld+json">{not json at all</script>
            <script type="application/ld+json">
                {"@graph":[{"@type":"Product","offers":[{"price":42}]}]}
            </script>
        </head></html>"#;

        let nodes = product_nodes(html);
        assert_eq!(nodes.len(), 1);
        assert_eq!(offer_price(&nodes[0]), Some(42.0));
    }

    #[test]
    fn test_non_product_types_ignored() {
        let html = r#"<script type="application/ld+json">
            {"@type":"Article","headline":"Not a product"}
        </script>"#;
        assert!(product_nodes(html).is_empty());
    }

    #[test]
    fn test_type_array_discriminator() {
        let node = json!({"@type": ["Thing", "Product"], "name": "X"});
        let html = format!(
            r#"<script type="application/ld+json">{}</script>"#,
            node
        );
        assert_eq!(product_nodes(&html).len(), 1);
    }

    #[test]
    fn test_image_shapes() {
        let bare = json!({"image": "https://img/a.png"});
        let array = json!({"image": ["https://img/b.png", "https://img/c.png"]});
        let object = json!({"image": {"url": "https://img/d.png"}});

        assert_eq!(product_image(&bare).as_deref(), Some("https://img/a.png"));
        assert_eq!(product_image(&array).as_deref(), Some("https://img/b.png"));
        assert_eq!(product_image(&object).as_deref(), Some("https://img/d.png"));
    }

    #[test]
    fn test_zero_price_is_rejected() {
        assert_eq!(parse_price_value(&json!("0.00")), None);
        assert_eq!(parse_price_value(&json!(0)), None);
        assert_eq!(parse_price_value(&json!("not a number")), None);
        assert_eq!(parse_price_value(&json!(9.5)), Some(9.5));
    }
}
