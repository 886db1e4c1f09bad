//! Type registry — the provided instances of one bootstrap invocation.
//!
//! The registry maps [`TypeKey`] to exactly one shared [`Instance`].
//! It is filled by the provider scan through `&mut` access and then only
//! read through `&` during injection, so writes never interleave with reads.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bootwire_support::rendering::suggest_similar;
use tracing::{debug, trace};

use crate::error::{BootstrapError, DuplicateRegistrationError, Result, UnregisteredTypeError};
use crate::key::TypeKey;

/// A provided value, shared with the provider that created it.
///
/// The registry only holds a clone of the `Arc`; it never decides when the
/// value is dropped.
pub type Instance = Arc<dyn Any + Send + Sync>;

const MAX_SUGGESTIONS: usize = 3;

/// A registered instance and the provider it came from.
#[derive(Clone)]
pub struct RegistryEntry {
    pub key: TypeKey,
    pub instance: Instance,
    /// Type name of the registering provider, if known
    pub provider: Option<&'static str>,
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("key", &self.key)
            .field("provider", &self.provider)
            .finish()
    }
}

/// Mapping from type identity to exactly one provided instance.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use bootwire_container::key::TypeKey;
/// use bootwire_container::registry::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// registry.register(TypeKey::of::<u32>(), Arc::new(7u32)).unwrap();
///
/// assert!(registry.register(TypeKey::of::<u32>(), Arc::new(8u32)).is_err());
/// assert_eq!(*registry.resolve_as::<u32>().unwrap(), 7);
/// ```
#[derive(Default)]
pub struct TypeRegistry {
    entries: HashMap<TypeKey, RegistryEntry>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an instance under `key`.
    ///
    /// # Errors
    /// Returns [`BootstrapError::DuplicateRegistration`] if `key` is already
    /// present. The existing instance is left in place.
    pub fn register(&mut self, key: TypeKey, instance: Instance) -> Result<()> {
        self.insert(RegistryEntry {
            key,
            instance,
            provider: None,
        })
    }

    /// Registers an instance and records which provider supplied it.
    pub fn register_from(
        &mut self,
        provider: &'static str,
        key: TypeKey,
        instance: Instance,
    ) -> Result<()> {
        self.insert(RegistryEntry {
            key,
            instance,
            provider: Some(provider),
        })
    }

    fn insert(&mut self, entry: RegistryEntry) -> Result<()> {
        if let Some(existing) = self.entries.get(&entry.key) {
            return Err(BootstrapError::DuplicateRegistration(
                DuplicateRegistrationError {
                    key: entry.key,
                    existing: existing.provider,
                    rejected: entry.provider,
                },
            ));
        }

        debug!(key = %entry.key, provider = entry.provider, "Registered instance");
        self.entries.insert(entry.key, entry);
        Ok(())
    }

    /// Looks up the instance registered under `key`.
    ///
    /// # Errors
    /// Returns [`BootstrapError::UnregisteredType`] if nothing is registered.
    pub fn resolve(&self, key: &TypeKey) -> Result<Instance> {
        trace!(key = %key, "Resolving");
        self.entries
            .get(key)
            .map(|entry| entry.instance.clone())
            .ok_or_else(|| {
                BootstrapError::UnregisteredType(UnregisteredTypeError {
                    key: *key,
                    suggestions: self.suggestions_for(key),
                })
            })
    }

    /// Typed lookup.
    pub fn resolve_as<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
        let key = TypeKey::of::<T>();
        downcast::<T>(key, self.resolve(&key)?)
    }

    /// Returns the full entry for `key`, if registered.
    pub fn entry(&self, key: &TypeKey) -> Option<&RegistryEntry> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is registered.
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all registered keys, sorted by type name.
    pub fn keys(&self) -> Vec<TypeKey> {
        let mut keys: Vec<TypeKey> = self.entries.keys().copied().collect();
        keys.sort_by_key(|k| k.type_name());
        keys
    }

    /// Registered type names close to the name of `key`.
    pub fn suggestions_for(&self, key: &TypeKey) -> Vec<String> {
        let available: Vec<&str> = self.entries.keys().map(|k| k.type_name()).collect();
        suggest_similar(key.type_name(), &available, MAX_SUGGESTIONS)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("registered", &self.keys())
            .finish()
    }
}

/// Recovers the concrete type of an instance resolved for `key`.
pub(crate) fn downcast<T: Any + Send + Sync>(key: TypeKey, instance: Instance) -> Result<Arc<T>> {
    instance
        .downcast::<T>()
        .map_err(|_| BootstrapError::TypeMismatch {
            key,
            expected: type_name::<T>(),
        })
}
