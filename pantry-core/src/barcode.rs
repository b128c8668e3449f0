//! Product lookup by barcode against the Open Food Facts database.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::BarcodeError;
use crate::http::HttpClient;

pub const DEFAULT_OPENFOODFACTS_URL: &str = "https://world.openfoodfacts.org";

/// Product details as far as the database knows them.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BarcodeProduct {
    pub barcode: String,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    #[schema(value_type = Object)]
    pub nutrition_data: Value,
}

/// EAN-8 through GTIN-14, digits only.
pub fn validate_barcode(barcode: &str) -> Result<&str, BarcodeError> {
    let trimmed = barcode.trim();
    let valid = (8..=14).contains(&trimmed.len()) && trimmed.bytes().all(|b| b.is_ascii_digit());
    if valid {
        Ok(trimmed)
    } else {
        Err(BarcodeError::InvalidBarcode(barcode.to_string()))
    }
}

pub fn product_url(base_url: &str, barcode: &str) -> String {
    format!(
        "{}/api/v0/product/{}.json",
        base_url.trim_end_matches('/'),
        barcode
    )
}

fn non_empty(product: &Value, field: &str) -> Option<String> {
    product
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Map an Open Food Facts response. `None` when the product is unknown.
pub fn parse_product(barcode: &str, body: &Value) -> Option<BarcodeProduct> {
    if body.get("status").and_then(Value::as_i64) != Some(1) {
        return None;
    }
    let product = body.get("product")?;

    Some(BarcodeProduct {
        barcode: barcode.to_string(),
        name: non_empty(product, "product_name").unwrap_or_else(|| "Unknown Product".to_string()),
        brand: non_empty(product, "brands"),
        category: non_empty(product, "categories"),
        image_url: non_empty(product, "image_url"),
        nutrition_data: serde_json::json!({
            "nutrients": product.get("nutriments").cloned().unwrap_or(Value::Null),
            "ingredients": product.get("ingredients_text").cloned().unwrap_or(Value::Null),
            "allergens": product.get("allergens").cloned().unwrap_or(Value::Null),
        }),
    })
}

/// Look up a barcode. `Ok(None)` means the database has no such product.
pub async fn lookup_barcode(
    client: &dyn HttpClient,
    base_url: &str,
    barcode: &str,
) -> Result<Option<BarcodeProduct>, BarcodeError> {
    let barcode = validate_barcode(barcode)?;
    let body = client.fetch_json(&product_url(base_url, barcode)).await?;
    let product = parse_product(barcode, &body);

    tracing::debug!(barcode, found = product.is_some(), "Barcode lookup");
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockClient;

    const BASE: &str = "https://off.test";

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("3017620422003").is_ok());
        assert!(validate_barcode(" 12345678 ").is_ok());
        assert!(validate_barcode("1234567").is_err());
        assert!(validate_barcode("30176204220a3").is_err());
        assert!(validate_barcode("").is_err());
    }

    #[test]
    fn test_product_url() {
        assert_eq!(
            product_url("https://world.openfoodfacts.org/", "123"),
            "https://world.openfoodfacts.org/api/v0/product/123.json"
        );
    }

    #[test]
    fn test_parse_unknown_product() {
        let body = serde_json::json!({ "status": 0, "status_verbose": "product not found" });
        assert!(parse_product("12345678", &body).is_none());
    }

    #[test]
    fn test_parse_missing_name_defaults() {
        let body = serde_json::json!({ "status": 1, "product": { "brands": "" } });
        let product = parse_product("12345678", &body).unwrap();
        assert_eq!(product.name, "Unknown Product");
        assert!(product.brand.is_none());
    }

    #[tokio::test]
    async fn test_lookup_found() {
        let client = MockClient::new().with_json(
            &product_url(BASE, "3017620422003"),
            serde_json::json!({
                "status": 1,
                "product": {
                    "product_name": "Nutella",
                    "brands": "Ferrero",
                    "categories": "Spreads",
                    "image_url": "https://img.test/nutella.jpg",
                    "nutriments": { "energy-kcal_100g": 539 },
                    "allergens": "en:milk,en:nuts"
                }
            }),
        );

        let product = lookup_barcode(&client, BASE, "3017620422003")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.name, "Nutella");
        assert_eq!(product.brand.as_deref(), Some("Ferrero"));
        assert_eq!(product.nutrition_data["nutrients"]["energy-kcal_100g"], 539);
        assert_eq!(product.nutrition_data["allergens"], "en:milk,en:nuts");
    }

    #[tokio::test]
    async fn test_lookup_rejects_bad_barcode_without_fetching() {
        let client = MockClient::new();
        let err = lookup_barcode(&client, BASE, "abc").await.unwrap_err();
        assert!(matches!(err, BarcodeError::InvalidBarcode(_)));
    }

    #[tokio::test]
    async fn test_lookup_propagates_fetch_error() {
        let client = MockClient::new().with_error(&product_url(BASE, "12345678"), "offline");
        let err = lookup_barcode(&client, BASE, "12345678").await.unwrap_err();
        assert!(matches!(err, BarcodeError::Fetch(_)));
    }
}
