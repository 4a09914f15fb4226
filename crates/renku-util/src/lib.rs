//! renku-util - Shared foundation types for the Renku codecs.
//!
//! This crate provides the pieces both codec crates build on:
//! - `error` - The common error type and `Result` alias
//! - `lookahead` - A one-element-lookahead iterator adapter

pub mod error;
pub mod lookahead;

pub use error::{Error, Position, Result};
pub use lookahead::Lookahead;
