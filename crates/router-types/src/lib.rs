//! Shared types for the asset conversion router.
//!
//! This crate defines the domain model used across the router workspace:
//! asset classification, route configuration, execution strategies and
//! steps, quote results, authorization primitives, errors and events.

pub mod amounts;
pub mod assets;
pub mod auth;
pub mod errors;
pub mod events;
pub mod execution;
pub mod quotes;
pub mod routes;

pub use amounts::*;
pub use assets::*;
pub use auth::*;
pub use errors::*;
pub use events::*;
pub use execution::*;
pub use quotes::*;
pub use routes::*;
