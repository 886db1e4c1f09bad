//! Provider capability — components that supply values to the registry.
//!
//! A provider declares zero-argument provide operations. Declaring an
//! operation does not run it: the provider scan invokes each operation
//! exactly once, while validation only reads the declared types.
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use bootwire_container::provider::{Provider, Provisions};
//!
//! struct HealthService;
//! struct WeaponService;
//!
//! struct GameProvider;
//!
//! impl Provider for GameProvider {
//!     fn provisions<'a>(&'a self, provisions: &mut Provisions<'a>) {
//!         provisions
//!             .provide_value("provide_health_service", || HealthService)
//!             .provide("provide_weapon_service", || Some(Arc::new(WeaponService)));
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::key::TypeKey;
use crate::registry::Instance;

type ProvideFn<'a> = Box<dyn FnOnce() -> Option<Instance> + 'a>;

/// A declared provide operation.
pub struct ProvideOp<'a> {
    name: &'static str,
    key: TypeKey,
    invoke: ProvideFn<'a>,
}

impl ProvideOp<'_> {
    /// Operation name as declared.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type this operation provides.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Runs the operation. `None` means it produced nothing.
    pub(crate) fn invoke(self) -> Option<Instance> {
        (self.invoke)()
    }
}

impl fmt::Debug for ProvideOp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvideOp")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish()
    }
}

/// The provide operations of one provider, in declaration order.
#[derive(Default)]
pub struct Provisions<'a> {
    ops: Vec<ProvideOp<'a>>,
}

impl<'a> Provisions<'a> {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Declares an operation providing a shared `T`.
    ///
    /// The provider keeps ownership of the `Arc` it returns; the registry
    /// only holds a clone.
    pub fn provide<T: Any + Send + Sync>(
        &mut self,
        name: &'static str,
        op: impl FnOnce() -> Option<Arc<T>> + 'a,
    ) -> &mut Self {
        self.ops.push(ProvideOp {
            name,
            key: TypeKey::of::<T>(),
            invoke: Box::new(move || op().map(|value| value as Instance)),
        });
        self
    }

    /// Declares an operation that always produces a fresh `T`.
    pub fn provide_value<T: Any + Send + Sync>(
        &mut self,
        name: &'static str,
        op: impl FnOnce() -> T + 'a,
    ) -> &mut Self {
        self.provide(name, move || Some(Arc::new(op())))
    }

    /// Declared types, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.ops.iter().map(|op| op.key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProvideOp<'a>> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub(crate) fn into_ops(self) -> Vec<ProvideOp<'a>> {
        self.ops
    }
}

/// A component that supplies values by type.
///
/// Implement this to group related provide operations; the Rust
/// counterpart of a module of marked factory methods.
pub trait Provider {
    /// Declares the provide operations of this provider.
    fn provisions<'a>(&'a self, provisions: &mut Provisions<'a>);
}

/// Collects the provide operations of `provider` in declaration order.
pub fn provisions(provider: &dyn Provider) -> Provisions<'_> {
    let mut provisions = Provisions::new();
    provider.provisions(&mut provisions);
    provisions
}
