//! Famigo Core - Shared types library.
//!
//! This crate provides common types used across all Famigo client components:
//! - `client` - Store, storage adapter, and remote API client
//! - `cli` - Command-line consumer of the client library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, profile, favorites, and location types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
