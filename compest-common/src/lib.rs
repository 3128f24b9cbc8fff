//! # compest Common Library
//!
//! Shared code for the compest services including:
//! - Subject property, comp and estimate models with field validation
//! - Configuration loading (CLI > ENV > TOML > compiled defaults)
//! - Common error type
//! - Timestamp and identifier helpers

pub mod config;
pub mod error;
pub mod models;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
