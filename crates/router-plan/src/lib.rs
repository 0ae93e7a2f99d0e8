//! Instruction planning for resolved conversion paths.
//!
//! Turns priced legs into opaque venue calls the Executor replays, and
//! builds the continuation descriptors that drive composite conversions
//! one leg at a time.

pub mod abi;
pub mod builder;

pub use builder::PlanBuilder;
