//! Core bootstrap engine for Bootwire.
//!
//! Leaves first: [`key`] and [`registry`], the capabilities in
//! [`component`], [`provider`] and [`inject`], the two phases in
//! [`scanner`] and [`engine`], the advisory [`validate`] pass, and the
//! [`bootstrap`] orchestration tying them together.

pub mod bootstrap;
pub mod component;
pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod inject;
pub mod key;
pub mod provider;
pub mod registry;
pub mod scanner;
pub mod validate;

pub use bootstrap::{Injector, prelude, run_bootstrap, run_validation};
pub use error::{BootstrapError, Result};
pub use key::TypeKey;
