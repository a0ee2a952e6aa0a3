//! User domain type.

use chrono::{DateTime, Utc};

use juice_shop_core::{Email, UserId};

/// A shop account. The password hash never leaves the repository layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
