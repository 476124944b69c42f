//! Luxemarket Core - Shared domain types.
//!
//! This crate provides the types shared by the Luxemarket components:
//! - `store` - Client shopping state (cart, favorites, session, catalog pipeline)
//! - `cli` - Command-line driver for the persisted shopping state
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
