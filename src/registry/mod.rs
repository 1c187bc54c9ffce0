//! npm registry access.
//!
//! This module provides the read-only HTTP client used to list an
//! organization's packages and fetch per-package metadata.

pub mod client;

pub use client::RegistryClient;
