//! Domain models for the shop.

pub mod basket;
pub mod session;
pub mod user;

pub use basket::{Basket, BasketItem, BasketProduct};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
