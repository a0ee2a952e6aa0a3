//! Product repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use juice_shop_core::ProductId;

use super::RepositoryError;

/// Fields for inserting a product.
#[derive(Debug, Clone)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: Decimal,
    pub deluxe_price: Decimal,
    pub image: &'a str,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product and return its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct<'_>) -> Result<ProductId, RepositoryError> {
        let id = sqlx::query_scalar::<_, ProductId>(
            r"
            INSERT INTO shop.product (name, description, price, deluxe_price, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.deluxe_price)
        .bind(product.image)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Mark a product deleted without removing the row.
    ///
    /// Returns `false` if no live product had that ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn soft_delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shop.product
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
