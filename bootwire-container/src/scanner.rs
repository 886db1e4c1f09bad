//! Provider scan — the write phase of a bootstrap.
//!
//! Visits candidates in sequence order and, for every provider, invokes
//! each declared provide operation exactly once in declaration order,
//! registering the result under the operation's type.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::component::Component;
use crate::error::{BootstrapError, NullProvisionError, Result};
use crate::key::TypeKey;
use crate::provider::provisions;
use crate::registry::TypeRegistry;

/// Counts from one provider scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    /// Candidates with the provider capability
    pub providers: usize,
    /// Instances registered
    pub registered: usize,
}

/// Populates a registry from the providers among the candidates.
///
/// Holds the only mutable borrow of the registry; once the scanner is
/// dropped the registry can be shared read-only.
pub struct ProviderScanner<'r> {
    registry: &'r mut TypeRegistry,
}

impl<'r> ProviderScanner<'r> {
    pub fn new(registry: &'r mut TypeRegistry) -> Self {
        Self { registry }
    }

    /// Runs every provide operation of every provider.
    ///
    /// # Errors
    /// - [`BootstrapError::NullProvision`] — an operation produced nothing
    /// - [`BootstrapError::DuplicateRegistration`] — a type was provided twice
    ///
    /// Either one stops the scan immediately; what was registered so far
    /// stays in the registry.
    #[instrument(skip_all, name = "provider_scan", fields(candidates = candidates.len()))]
    pub fn scan(&mut self, candidates: &[Arc<dyn Component>]) -> Result<ScanSummary> {
        let mut summary = ScanSummary::default();

        for candidate in candidates {
            let Some(provider) = candidate.as_provider() else {
                continue;
            };
            let provider_name = candidate.type_name();
            summary.providers += 1;

            for op in provisions(provider).into_ops() {
                let (operation, key) = (op.name(), op.key());

                let Some(instance) = op.invoke() else {
                    warn!(provider = provider_name, operation, key = %key, "Provide operation returned nothing");
                    return Err(BootstrapError::NullProvision(NullProvisionError {
                        provider: provider_name,
                        operation,
                        key,
                    }));
                };

                self.registry.register_from(provider_name, key, instance)?;
                summary.registered += 1;
            }
        }

        debug!(
            providers = summary.providers,
            registered = summary.registered,
            "Provider scan finished"
        );
        Ok(summary)
    }
}

/// Types the candidates' providers declare, without invoking anything.
pub fn provided_keys(candidates: &[Arc<dyn Component>]) -> HashSet<TypeKey> {
    candidates
        .iter()
        .filter_map(|candidate| candidate.as_provider())
        .flat_map(|provider| provisions(provider).keys().collect::<Vec<_>>())
        .collect()
}
