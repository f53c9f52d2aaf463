//! Shared utilities and common types for the template service.
//!
//! This crate provides common functionality used across all other crates:
//! - Identity-based pagination primitives
//! - Access token hashing
//! - Common validation logic

pub mod crypto;
pub mod pagination;
pub mod validation;
