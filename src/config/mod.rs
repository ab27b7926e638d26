//! Configuration for the tweetsent pipeline
//!
//! Settings live in `tweetsent.toml`; see [`loader::find_config`] for the
//! discovery order.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
