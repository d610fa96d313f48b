use serde::{Deserialize, Serialize};

/// A sellable item held in the catalog.
///
/// The `id` is assigned by the store on creation and never changes; every other
/// field is overwritten as a whole by a full replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque unique identifier
    pub id: String,
    pub name: String,
    pub description: String,
    /// Unit price, always finite
    pub price: f64,
    /// Free-form category label, matched case-sensitively
    pub category: String,
    pub in_stock: bool,
}

/// The business fields of a product, without its identifier.
///
/// This is what clients send on create and full replace. Unknown fields in the
/// request (including a client-supplied `id`) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

impl Product {
    /// Build a product from its identifier and business fields.
    pub fn from_fields(id: impl Into<String>, fields: ProductFields) -> Self {
        Self {
            id: id.into(),
            name: fields.name,
            description: fields.description,
            price: fields.price,
            category: fields.category,
            in_stock: fields.in_stock,
        }
    }

    /// Overwrite every business field, keeping the identifier.
    pub fn replace_fields(&mut self, fields: ProductFields) {
        *self = Self::from_fields(std::mem::take(&mut self.id), fields);
    }

    /// Business fields of this product.
    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            category: self.category.clone(),
            in_stock: self.in_stock,
        }
    }
}

impl ProductFields {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        category: impl Into<String>,
        in_stock: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            category: category.into(),
            in_stock,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn laptop() -> ProductFields {
        ProductFields::new("Laptop", "A fast laptop", 1200.0, "electronics", true)
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let product = Product::from_fields("abc", laptop());
        let json = serde_json::to_value(&product).expect("Serialization should succeed");

        assert_eq!(json["id"], "abc");
        assert_eq!(json["inStock"], true);
        assert!(json.get("in_stock").is_none());
    }

    #[test]
    fn test_fields_ignore_client_id() {
        let json = r#"{
            "id": "client-chosen",
            "name": "Kettle",
            "description": "Boils water",
            "price": 25.5,
            "category": "kitchen",
            "inStock": false
        }"#;

        let fields: ProductFields = serde_json::from_str(json).expect("Deserialization failed");
        assert_eq!(fields.name, "Kettle");
        assert!(!fields.in_stock);
    }

    #[test]
    fn test_replace_fields_keeps_id() {
        let mut product = Product::from_fields("keep-me", laptop());
        product.replace_fields(ProductFields::new("Mixer", "Mixes", 80.0, "kitchen", false));

        assert_eq!(product.id, "keep-me");
        assert_eq!(product.name, "Mixer");
        assert_eq!(product.category, "kitchen");
        assert!(!product.in_stock);
    }

    #[test]
    fn test_fields_roundtrip_through_product() {
        let product = Product::from_fields("x", laptop());
        assert_eq!(product.fields(), laptop());
    }
}
