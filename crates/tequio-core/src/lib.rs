//! Core types and trait definitions for the Tequio client.
//!
//! This crate is deliberately free of HTTP and UI dependencies.
//! All other crates depend on it; it depends on nothing heavier than serde.

pub mod directory;
pub mod id;
pub mod record;
