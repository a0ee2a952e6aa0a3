//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use juice_shop_core::{BasketId, Email, UserId};

/// Session-stored identity of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    /// The basket assigned at login. `None` only for sessions written before
    /// the user owned a basket.
    pub bid: Option<BasketId>,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
