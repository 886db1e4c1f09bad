//! # Bootwire Support
//!
//! Shared utilities for the Bootwire bootstrap crates.
//!
//! This crate provides:
//! - Text rendering for error and diagnostic messages
//! - Logging initialisation for hosts and demos

pub mod logging;
pub mod rendering;
