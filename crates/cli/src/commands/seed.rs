//! Seed the shop database from a YAML fixture.
//!
//! # Usage
//!
//! ```bash
//! js-cli seed crates/cli/fixtures/demo.yaml
//! ```
//!
//! # Fixture Format
//!
//! ```yaml
//! users:
//!   - email: jim@juice-sh.op
//!     password: ncc-1701
//! products:
//!   - name: Apple Juice (1000ml)
//!     price: 1.99
//!     deluxe_price: 0.99
//!     image: apple_juice.jpg
//!   - name: Christmas Super-Surprise-Box (2014 Edition)
//!     price: 29.99
//!     deleted: true
//! baskets:
//!   - owner: jim@juice-sh.op
//!     items:
//!       - product: Apple Juice (1000ml)
//!         quantity: 2
//! ```
//!
//! Baskets refer to users by email and to products by name. The fixture is
//! validated as a whole before anything is written. Seeding is not
//! idempotent: run it against a freshly migrated database.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use juice_shop_core::{Email, ProductId, UserId};
use juice_shop_server::db::products::NewProduct;
use juice_shop_server::db::{BasketRepository, ProductRepository, RepositoryError};
use juice_shop_server::services::{AuthError, AuthService};

use super::CommandError;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),

    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("user {email}: {source}")]
    User {
        email: String,
        #[source]
        source: AuthError,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Top-level fixture document.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    #[serde(default)]
    pub users: Vec<UserFixture>,
    #[serde(default)]
    pub products: Vec<ProductFixture>,
    #[serde(default)]
    pub baskets: Vec<BasketFixture>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserFixture {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    /// Defaults to `price`.
    pub deluxe_price: Option<Decimal>,
    #[serde(default = "default_image")]
    pub image: String,
    /// Insert the product soft-deleted.
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BasketFixture {
    /// Email of a user declared in the same fixture.
    pub owner: String,
    #[serde(default)]
    pub coupon: Option<String>,
    #[serde(default)]
    pub items: Vec<ItemFixture>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemFixture {
    /// Name of a product declared in the same fixture.
    pub product: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_image() -> String {
    "undefined.png".to_string()
}

const fn default_quantity() -> i32 {
    1
}

/// Check cross references and values. Returns every problem found.
#[must_use]
pub fn validate(fixture: &Fixture) -> Vec<String> {
    let mut errors = Vec::new();

    let mut emails = HashSet::new();
    for user in &fixture.users {
        match Email::parse(&user.email) {
            Ok(email) => {
                if !emails.insert(email) {
                    errors.push(format!("duplicate user {}", user.email));
                }
            }
            Err(e) => errors.push(format!("user {}: {e}", user.email)),
        }
    }

    let mut names = HashSet::new();
    for product in &fixture.products {
        if !names.insert(product.name.as_str()) {
            errors.push(format!("duplicate product {}", product.name));
        }
        if product.price.is_sign_negative() {
            errors.push(format!("product {}: negative price", product.name));
        }
    }

    for basket in &fixture.baskets {
        let known_owner = Email::parse(&basket.owner).is_ok_and(|email| emails.contains(&email));
        if !known_owner {
            errors.push(format!("basket owner {} is not a fixture user", basket.owner));
        }
        for item in &basket.items {
            if !names.contains(item.product.as_str()) {
                errors.push(format!(
                    "basket of {}: unknown product {}",
                    basket.owner, item.product
                ));
            }
            if item.quantity <= 0 {
                errors.push(format!(
                    "basket of {}: quantity of {} must be positive",
                    basket.owner, item.product
                ));
            }
        }
    }

    errors
}

/// Seed the database from the fixture at `file_path`.
///
/// # Errors
///
/// Returns `SeedError` if the fixture cannot be read or fails validation,
/// or if any insert fails.
pub async fn run(file_path: &str) -> Result<(), SeedError> {
    let path = Path::new(file_path);
    info!(path = %path.display(), "Loading fixture");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Read {
            path: file_path.to_string(),
            source,
        })?;
    let fixture: Fixture = serde_yaml::from_str(&content)?;

    let errors = validate(&fixture);
    if !errors.is_empty() {
        error!("Fixture validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }

    let pool = super::connect().await?;
    let auth = AuthService::new(&pool);
    let products = ProductRepository::new(&pool);
    let baskets = BasketRepository::new(&pool);

    let mut user_ids: HashMap<Email, UserId> = HashMap::new();
    for user in &fixture.users {
        let created = auth
            .register(&user.email, &user.password)
            .await
            .map_err(|source| SeedError::User {
                email: user.email.clone(),
                source,
            })?;
        user_ids.insert(created.email, created.id);
    }
    info!(count = user_ids.len(), "Users created");

    let mut product_ids: HashMap<&str, ProductId> = HashMap::new();
    for product in &fixture.products {
        let id = products
            .create(&NewProduct {
                name: &product.name,
                description: &product.description,
                price: product.price,
                deluxe_price: product.deluxe_price.unwrap_or(product.price),
                image: &product.image,
            })
            .await?;
        if product.deleted {
            products.soft_delete(id).await?;
        }
        product_ids.insert(product.name.as_str(), id);
    }
    info!(count = product_ids.len(), "Products created");

    let mut item_count = 0;
    for basket in &fixture.baskets {
        // Validation guarantees both lookups succeed.
        let Some(owner) = Email::parse(&basket.owner)
            .ok()
            .and_then(|email| user_ids.get(&email).copied())
        else {
            continue;
        };

        let basket_id = baskets.create(owner).await?;
        if let Some(coupon) = &basket.coupon {
            baskets.set_coupon(basket_id, coupon).await?;
        }
        for item in &basket.items {
            if let Some(product_id) = product_ids.get(item.product.as_str()) {
                baskets.add_item(basket_id, *product_id, item.quantity).await?;
                item_count += 1;
            }
        }
    }
    info!(
        baskets = fixture.baskets.len(),
        items = item_count,
        "Baskets created"
    );

    info!("Seeding complete!");
    Ok(())
}
