//! Quoting for resolved conversion paths.
//!
//! Each leg is priced live against its venue when the venue answers with a
//! plausible figure, and otherwise falls back to a pure decimal conversion
//! under the pair's pre-vetted slippage tolerance. A missing tolerance on
//! the fallback path is a refusal, not a guess.

pub mod engine;
pub mod source;

pub use engine::QuoteEngine;
pub use source::{LiveQuoteSource, QuoteError, RpcQuoteSource};
