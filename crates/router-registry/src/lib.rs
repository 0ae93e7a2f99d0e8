//! Registries owned by the router engine.
//!
//! This crate holds the engine's persistent configuration state: the asset
//! registry, the route table and the vetted slippage table, together with
//! the secret-hash authorization policy that gates every mutation. All
//! tables support concurrent readers; mutations go through the governance
//! surface and are applied atomically per key.

pub mod assets;
pub mod auth;
pub mod routes;
pub mod slippage;

pub use assets::AssetRegistry;
pub use auth::{hash_secret, SecretHashPolicy};
pub use routes::RouteTable;
pub use slippage::SlippageTable;
