//! Basket repository.
//!
//! Basket lookups always pull in the basket's products, soft-deleted ones
//! included, so a basket keeps showing what the user put in it.

use std::future::Future;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use juice_shop_core::{BasketId, BasketItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Basket, BasketItem, BasketProduct};

/// Read access to basket aggregates.
///
/// The basket route is written against this trait so it can be exercised
/// without a database.
pub trait BasketStore: Sync {
    /// Find the basket `id` if it belongs to `owner`, with all its products.
    fn find_owned_with_products(
        &self,
        id: BasketId,
        owner: UserId,
    ) -> impl Future<Output = Result<Option<Basket>, RepositoryError>> + Send;
}

#[derive(sqlx::FromRow)]
struct BasketRow {
    id: BasketId,
    user_id: UserId,
    coupon: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct BasketProductRow {
    id: ProductId,
    name: String,
    description: String,
    price: Decimal,
    deluxe_price: Decimal,
    image: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    item_id: BasketItemId,
    basket_id: BasketId,
    quantity: i32,
    item_created_at: DateTime<Utc>,
    item_updated_at: DateTime<Utc>,
}

impl From<BasketProductRow> for BasketProduct {
    fn from(row: BasketProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            deluxe_price: row.deluxe_price,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
            basket_item: BasketItem {
                id: row.item_id,
                product_id: row.id,
                basket_id: row.basket_id,
                quantity: row.quantity,
                created_at: row.item_created_at,
                updated_at: row.item_updated_at,
            },
        }
    }
}

/// Repository for basket database operations.
pub struct BasketRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BasketRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Return the user's basket ID, creating an empty basket if they have none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn find_or_create_for_user(&self, owner: UserId) -> Result<BasketId, RepositoryError> {
        let existing = sqlx::query_scalar::<_, BasketId>(
            r"
            SELECT id FROM shop.basket
            WHERE user_id = $1
            ORDER BY id
            LIMIT 1
            ",
        )
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;

        match existing {
            Some(id) => Ok(id),
            None => self.create(owner).await,
        }
    }

    /// Create an empty basket for `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, owner: UserId) -> Result<BasketId, RepositoryError> {
        let id = sqlx::query_scalar::<_, BasketId>(
            "INSERT INTO shop.basket (user_id) VALUES ($1) RETURNING id",
        )
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Attach a coupon code to a basket.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_coupon(&self, id: BasketId, coupon: &str) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE shop.basket SET coupon = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(coupon)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Put `quantity` of a product into a basket, adding to any existing line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails (unknown basket
    /// or product, non-positive quantity).
    pub async fn add_item(
        &self,
        basket: BasketId,
        product: ProductId,
        quantity: i32,
    ) -> Result<BasketItemId, RepositoryError> {
        let id = sqlx::query_scalar::<_, BasketItemId>(
            r"
            INSERT INTO shop.basket_item (basket_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (basket_id, product_id)
            DO UPDATE SET quantity = shop.basket_item.quantity + EXCLUDED.quantity,
                          updated_at = now()
            RETURNING id
            ",
        )
        .bind(basket)
        .bind(product)
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }
}

impl BasketStore for BasketRepository<'_> {
    async fn find_owned_with_products(
        &self,
        id: BasketId,
        owner: UserId,
    ) -> Result<Option<Basket>, RepositoryError> {
        let Some(row) = sqlx::query_as::<_, BasketRow>(
            r"
            SELECT id, user_id, coupon, created_at, updated_at
            FROM shop.basket
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        // No `deleted_at` filter: soft-deleted products stay in the basket.
        let products = sqlx::query_as::<_, BasketProductRow>(
            r"
            SELECT p.id, p.name, p.description, p.price, p.deluxe_price, p.image,
                   p.created_at, p.updated_at, p.deleted_at,
                   bi.id AS item_id, bi.basket_id, bi.quantity,
                   bi.created_at AS item_created_at, bi.updated_at AS item_updated_at
            FROM shop.basket_item bi
            JOIN shop.product p ON p.id = bi.product_id
            WHERE bi.basket_id = $1
            ORDER BY bi.id
            ",
        )
        .bind(row.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(Basket {
            id: row.id,
            coupon: row.coupon,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            products: products.into_iter().map(BasketProduct::from).collect(),
        }))
    }
}
