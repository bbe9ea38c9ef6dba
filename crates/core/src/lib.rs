//! Mithai Core - Shared types library.
//!
//! This crate provides common types used across all Mithai Admin components:
//! - `admin` - JSON admin API (categories, products, orders, uploads, auth)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails
//! - [`catalog`] - Category catalog snapshot and property resolution

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;

pub use catalog::{Catalog, Category, PropertyDefinition, resolve_properties};
pub use types::*;
