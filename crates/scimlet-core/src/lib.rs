//! Core types and trait definitions for the scimlet provisioning endpoint.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The protocol layer and the storage backends both depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod store;
pub mod user;

pub use error::StoreError;
