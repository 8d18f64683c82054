//! core
//!
//! Core domain types, path routing, and configuration for Vellum.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid, RefName, ObjectType
//! - [`paths`] - Centralized routing for control-directory storage
//! - [`config`] - Repository configuration schema and loading

pub mod config;
pub mod paths;
pub mod types;
