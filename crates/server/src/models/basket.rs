//! Basket aggregate: a basket with its line items.
//!
//! Field names serialize the way the shop's JSON API has always exposed them
//! (`UserId`, `Products`, `BasketItem`, camelCase timestamps).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use juice_shop_core::{BasketId, BasketItemId, ProductId, UserId};

/// A shopping basket together with every product in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Basket {
    pub id: BasketId,
    pub coupon: Option<String>,
    #[serde(rename = "UserId")]
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "Products")]
    pub products: Vec<BasketProduct>,
}

/// A product as it appears inside a basket.
///
/// Soft-deleted products are still listed; `deleted_at` tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub deluxe_price: Decimal,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(rename = "BasketItem")]
    pub basket_item: BasketItem,
}

/// Join row between a basket and a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketItem {
    pub id: BasketItemId,
    #[serde(rename = "ProductId")]
    pub product_id: ProductId,
    #[serde(rename = "BasketId")]
    pub basket_id: BasketId,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Basket {
    /// Rewrite every product name in place.
    pub fn rename_products(&mut self, mut rename: impl FnMut(&str) -> String) {
        for product in &mut self.products {
            product.name = rename(&product.name);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub fn sample_basket(id: i32, owner: i32, names: &[&str]) -> Basket {
        let now = Utc::now();
        let products = names
            .iter()
            .zip(1..)
            .map(|(name, n)| BasketProduct {
                id: ProductId::new(n),
                name: (*name).to_string(),
                description: String::new(),
                price: Decimal::new(199, 2),
                deluxe_price: Decimal::new(99, 2),
                image: "apple_juice.jpg".to_string(),
                created_at: now,
                updated_at: now,
                deleted_at: None,
                basket_item: BasketItem {
                    id: BasketItemId::new(n),
                    product_id: ProductId::new(n),
                    basket_id: BasketId::new(id),
                    quantity: 1,
                    created_at: now,
                    updated_at: now,
                },
            })
            .collect();

        Basket {
            id: BasketId::new(id),
            coupon: None,
            user_id: UserId::new(owner),
            created_at: now,
            updated_at: now,
            products,
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(sample_basket(3, 9, &["Apple Juice (1000ml)"])).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["UserId"], 9);
        assert!(json["createdAt"].is_string());
        let product = &json["Products"][0];
        assert_eq!(product["name"], "Apple Juice (1000ml)");
        assert_eq!(product["price"], 1.99);
        assert_eq!(product["deluxePrice"], 0.99);
        assert!(product["deletedAt"].is_null());
        assert_eq!(product["BasketItem"]["BasketId"], 3);
        assert_eq!(product["BasketItem"]["ProductId"], 1);
        assert_eq!(product["BasketItem"]["quantity"], 1);
    }

    #[test]
    fn test_rename_products_rewrites_every_name() {
        let mut basket = sample_basket(1, 1, &["Apple", "Banana"]);
        basket.rename_products(str::to_uppercase);

        let names: Vec<_> = basket.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["APPLE", "BANANA"]);
    }
}
