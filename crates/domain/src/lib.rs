//! Domain layer for the template service.
//!
//! This crate contains:
//! - Domain models (Template, FolderTarget, Field)
//! - Filtering, update, deletion and projection services
//! - Payload and attribute error types

pub mod models;
pub mod services;
