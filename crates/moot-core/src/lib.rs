//! Core types and trait definitions for the moot enrollment service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod meeting;
pub mod participant;
pub mod store;

pub use error::{Error, Result};
