//! Domain models for the admin API.

pub mod admin_user;
pub mod order;
pub mod product;
pub mod session;

pub use admin_user::AdminUser;
pub use order::{LineItem, Order};
pub use product::Product;
pub use session::CurrentAdmin;
