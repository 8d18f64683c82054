//! ui
//!
//! User-facing output utilities.
//!
//! # Design
//!
//! All terminal output goes through [`output`] so quiet and debug modes are
//! honored consistently across commands.

pub mod output;
