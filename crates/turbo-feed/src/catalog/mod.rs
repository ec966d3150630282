//! Product catalog module.
//!
//! Contains the product and creator types read from the backend and the
//! per-request feed view-model.

mod creator;
mod feed_product;
mod product;

pub use creator::Creator;
pub use feed_product::FeedProduct;
pub use product::{Product, ProductRow};
