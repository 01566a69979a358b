//! Food items and their transcription from Open Food Facts product records.
//!
//! A [`FoodItem`] is a flat, immutable copy of the fields the dashboards need.
//! It is built per lookup and never stored by the proxy.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Source tag attached to every item transcribed from Open Food Facts.
pub const FOOD_SOURCE: &str = "openfoodfacts";

/// Nutrition record normalised from the food database.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    /// Product name
    pub name: String,
    /// Brand(s) as listed upstream
    pub brand: Option<String>,
    /// Energy per 100 g
    pub kcal_per_100g: Option<f64>,
    /// Protein per 100 g
    pub protein_per_100g: Option<f64>,
    /// Fat per 100 g
    pub fat_per_100g: Option<f64>,
    /// Carbohydrates per 100 g
    pub carbs_per_100g: Option<f64>,
    /// Front image
    pub image_url: Option<String>,
    /// Database the record came from
    pub source: &'static str,
    /// Barcode in the source database
    pub source_id: Option<String>,
}

/// Product record as returned by Open Food Facts. Only the fields we read are listed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OffProduct {
    /// Barcode
    #[serde(default)]
    pub code: Option<String>,
    /// Polish name, preferred when present
    #[serde(default)]
    pub product_name_pl: Option<String>,
    /// Default-language name
    #[serde(default)]
    pub product_name: Option<String>,
    /// Generic name, used as the last fallback
    #[serde(default)]
    pub generic_name: Option<String>,
    /// Comma separated brands
    #[serde(default)]
    pub brands: Option<String>,
    /// Front-of-pack image
    #[serde(default)]
    pub image_front_url: Option<String>,
    /// Any image
    #[serde(default)]
    pub image_url: Option<String>,
    /// Nutrient table keyed like `energy-kcal_100g`
    #[serde(default)]
    pub nutriments: Map<String, Value>,
}

/// Search endpoint payload
#[derive(Debug, Default, Deserialize)]
pub struct OffSearchResponse {
    /// Matching products
    #[serde(default)]
    pub products: Vec<OffProduct>,
}

/// Product endpoint payload
#[derive(Debug, Default, Deserialize)]
pub struct OffProductResponse {
    /// 1 when found, 0 when not
    #[serde(default)]
    pub status: Option<i64>,
    /// The product, when found
    #[serde(default)]
    pub product: Option<OffProduct>,
}

impl OffProduct {
    /// Transcribes the record into a [`FoodItem`], or `None` when it has no usable name.
    #[must_use]
    pub fn into_food_item(self) -> Option<FoodItem> {
        let name = [
            self.product_name_pl.as_deref(),
            self.product_name.as_deref(),
            self.generic_name.as_deref(),
        ]
        .into_iter()
        .find_map(|v| v.and_then(non_blank))?;

        Some(FoodItem {
            name,
            brand: self.brands.as_deref().and_then(non_blank),
            kcal_per_100g: nutrient(&self.nutriments, "energy-kcal_100g"),
            protein_per_100g: nutrient(&self.nutriments, "proteins_100g"),
            fat_per_100g: nutrient(&self.nutriments, "fat_100g"),
            carbs_per_100g: nutrient(&self.nutriments, "carbohydrates_100g"),
            image_url: self
                .image_front_url
                .as_deref()
                .and_then(non_blank)
                .or_else(|| self.image_url.as_deref().and_then(non_blank)),
            source: FOOD_SOURCE,
            source_id: self.code.as_deref().and_then(non_blank),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Reads a nutrient that upstream may send as a number or a numeric string.
fn nutrient(nutriments: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match nutriments.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Nutrients for a portion, scaled from the per-100 g values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Portion {
    /// Energy; zero when the item has no energy value
    pub kcal: f64,
    /// Protein
    pub protein: Option<f64>,
    /// Fat
    pub fat: Option<f64>,
    /// Carbohydrates
    pub carbs: Option<f64>,
}

impl FoodItem {
    /// Scales the per-100 g values to `grams`.
    #[must_use]
    pub fn portion(&self, grams: f64) -> Portion {
        let scale = |v: f64| v * grams / 100.0;
        Portion {
            kcal: self.kcal_per_100g.map_or(0.0, scale),
            protein: self.protein_per_100g.map(scale),
            fat: self.fat_per_100g.map(scale),
            carbs: self.carbs_per_100g.map(scale),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use serde_json::json;

    fn product(value: Value) -> OffProduct {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_maps_energy_kcal() {
        let item = product(json!({
            "code": "5900259000002",
            "product_name": "Czekolada mleczna",
            "brands": "Wedel",
            "image_front_url": "https://images.example/front.jpg",
            "nutriments": {
                "energy-kcal_100g": 250,
                "proteins_100g": 6.5,
                "fat_100g": 30,
                "carbohydrates_100g": 55.1
            }
        }))
        .into_food_item()
        .unwrap();

        assert_eq!(item.name, "Czekolada mleczna");
        assert_eq!(item.brand.as_deref(), Some("Wedel"));
        assert_eq!(item.kcal_per_100g, Some(250.0));
        assert_eq!(item.protein_per_100g, Some(6.5));
        assert_eq!(item.fat_per_100g, Some(30.0));
        assert_eq!(item.carbs_per_100g, Some(55.1));
        assert_eq!(
            item.image_url.as_deref(),
            Some("https://images.example/front.jpg")
        );
        assert_eq!(item.source, FOOD_SOURCE);
        assert_eq!(item.source_id.as_deref(), Some("5900259000002"));
    }

    #[test]
    fn test_name_fallback_order() {
        let item = product(json!({
            "product_name_pl": "Jogurt naturalny",
            "product_name": "Natural yoghurt"
        }))
        .into_food_item()
        .unwrap();
        assert_eq!(item.name, "Jogurt naturalny");

        let item = product(json!({ "product_name": "  ", "generic_name": "Mleko" }))
            .into_food_item()
            .unwrap();
        assert_eq!(item.name, "Mleko");
    }

    #[test]
    fn test_nameless_product_is_dropped() {
        assert!(product(json!({ "code": "123" })).into_food_item().is_none());
        assert!(
            product(json!({ "product_name": "", "brands": "Acme" }))
                .into_food_item()
                .is_none()
        );
    }

    #[test]
    fn test_blank_text_fields() {
        let item = product(json!({
            "code": "  ",
            "product_name": "  Kefir  ",
            "brands": " ",
            "image_front_url": "",
            "image_url": "https://images.example/kefir.jpg"
        }))
        .into_food_item()
        .unwrap();

        assert_eq!(item.name, "Kefir");
        assert_eq!(item.brand, None);
        assert_eq!(
            item.image_url.as_deref(),
            Some("https://images.example/kefir.jpg")
        );
        assert_eq!(item.source_id, None);
    }

    #[test]
    fn test_nutrient_strings_and_garbage() {
        let item = product(json!({
            "product_name": "Chleb",
            "nutriments": {
                "energy-kcal_100g": "247",
                "proteins_100g": -1,
                "fat_100g": "n/a",
                "carbohydrates_100g": null
            }
        }))
        .into_food_item()
        .unwrap();

        assert_eq!(item.kcal_per_100g, Some(247.0));
        assert_eq!(item.protein_per_100g, None);
        assert_eq!(item.fat_per_100g, None);
        assert_eq!(item.carbs_per_100g, None);
        assert_eq!(item.brand, None);
        assert_eq!(item.image_url, None);
    }

    #[test]
    fn test_serializes_camel_case() {
        let item = product(json!({
            "code": "1",
            "product_name": "Masło",
            "nutriments": { "energy-kcal_100g": 748 }
        }))
        .into_food_item()
        .unwrap();

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["kcalPer100g"], json!(748.0));
        assert_eq!(value["sourceId"], json!("1"));
        assert_eq!(value["source"], json!("openfoodfacts"));
        assert!(value.get("kcal_per_100g").is_none());
    }

    #[test]
    fn test_portion_scaling() {
        let item = product(json!({
            "product_name": "Ryż",
            "nutriments": { "energy-kcal_100g": 350, "proteins_100g": 7 }
        }))
        .into_food_item()
        .unwrap();

        let portion = item.portion(50.0);
        assert_eq!(portion.kcal, 175.0);
        assert_eq!(portion.protein, Some(3.5));
        assert_eq!(portion.fat, None);

        // 350 * 0.7 is 244.99999999999997
        assert_eq!(item.portion(70.0).kcal, 245.0);
    }
}
