//! Mithai admin library.
//!
//! JSON API for managing the Mithai catalog: categories with inheritable
//! custom properties, products, image uploads to object storage, and a
//! read-only order list. Sign-in is Google OAuth restricted to a configured
//! email allow-list.
//!
//! The binary in `main.rs` wires this library to a `PostgreSQL` pool,
//! sessions, tracing, and Sentry.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
