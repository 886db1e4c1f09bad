//! # Bootwire — one-shot dependency wiring for component runtimes
//!
//! Providers declare the values they supply, injectables declare the
//! members they need, and a single bootstrap pass wires the latter from
//! the former by type identity.

pub use bootwire_container::*;
pub use bootwire_container::component;
pub use bootwire_support::*;
