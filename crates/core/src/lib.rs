//! Veloport Core - Shared types library.
//!
//! This crate provides common types used across all Veloport components:
//! - `web` - The rental-fleet web application
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, usernames, roles, and
//!   transport enumerations
//! - [`policy`] - The pure access-control decision function

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod policy;
pub mod types;

pub use policy::*;
pub use types::*;
