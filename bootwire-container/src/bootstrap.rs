//! # The Injector — one bootstrap pass
//!
//! Sequences the two phases of a bootstrap over one candidate set:
//!
//! ```text
//! candidates ──scan──> TypeRegistry (&mut) ──freeze──> TypeRegistry (&)
//!                                                          │
//!                                                       inject
//!                                                          │
//!                                                          ▼
//!                                                   BootstrapReport
//! ```
//!
//! Every call builds a fresh registry; nothing is shared between runs.
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use bootwire_container::component;
//! use bootwire_container::prelude::*;
//!
//! struct HealthService;
//!
//! struct GameProvider;
//!
//! impl Provider for GameProvider {
//!     fn provisions<'a>(&'a self, provisions: &mut Provisions<'a>) {
//!         provisions.provide_value("provide_health_service", || HealthService);
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Enemy {
//!     health: Inject<HealthService>,
//! }
//!
//! impl Injectable for Enemy {
//!     fn injections<'a>(&'a self, points: &mut InjectionPoints<'a>) {
//!         points.field("health", &self.health);
//!     }
//! }
//!
//! component!(GameProvider: Provider);
//! component!(Enemy: Injectable);
//!
//! let enemy = Arc::new(Enemy::default());
//! let candidates: Vec<Arc<dyn Component>> = vec![Arc::new(GameProvider), enemy.clone()];
//!
//! Injector::new().run_bootstrap(&candidates).expect("bootstrap");
//! assert!(enemy.health.is_set());
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::component::{Component, ComponentLocator};
use crate::config::BootstrapConfig;
use crate::diagnostic::{Collector, Diagnostic};
use crate::engine::{InjectionEngine, InjectionSummary};
use crate::error::Result;
use crate::registry::TypeRegistry;
use crate::scanner::{ProviderScanner, ScanSummary};
use crate::validate::{ValidationReport, Validator};

// ═══════════════════════════════════════════
// BootstrapReport
// ═══════════════════════════════════════════

/// Outcome of a successful bootstrap.
///
/// Owns the registry built for this run. The registry is never handed
/// back to another bootstrap.
pub struct BootstrapReport {
    registry: TypeRegistry,
    diagnostics: Vec<Diagnostic>,
    scan: ScanSummary,
    injection: InjectionSummary,
    validation: Option<ValidationReport>,
}

impl BootstrapReport {
    /// The frozen registry of this run.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Diagnostics recorded during injection (and validation, if enabled).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn scan(&self) -> ScanSummary {
        self.scan
    }

    pub fn injection(&self) -> InjectionSummary {
        self.injection
    }

    /// Present when `validate_after_bootstrap` is enabled.
    pub fn validation(&self) -> Option<&ValidationReport> {
        self.validation.as_ref()
    }

    pub fn into_registry(self) -> TypeRegistry {
        self.registry
    }
}

impl fmt::Debug for BootstrapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapReport")
            .field("registered", &self.registry.len())
            .field("scan", &self.scan)
            .field("injection", &self.injection)
            .field("diagnostics", &self.diagnostics.len())
            .field("validated", &self.validation.is_some())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Injector
// ═══════════════════════════════════════════

/// Runs bootstraps and validations under one [`BootstrapConfig`].
///
/// The injector holds configuration only; it keeps no state between
/// calls, so independent injectors (or independent calls) never interfere.
#[derive(Debug, Clone, Default)]
pub struct Injector {
    config: BootstrapConfig,
}

impl Injector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BootstrapConfig) -> Self {
        Self { config }
    }

    /// Replace already set fields and properties instead of skipping them.
    pub fn overwrite_existing(mut self, overwrite: bool) -> Self {
        self.config.overwrite_existing = overwrite;
        self
    }

    /// Run the validator after every successful bootstrap.
    pub fn validate_after_bootstrap(mut self, validate: bool) -> Self {
        self.config.validate_after_bootstrap = validate;
        self
    }

    /// Mirror diagnostics to `tracing`.
    pub fn log_diagnostics(mut self, log: bool) -> Self {
        self.config.log_diagnostics = log;
        self
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Scans providers, then injects every injectable candidate.
    ///
    /// Stops at the first fatal error and returns it unchanged. Members
    /// injected before the failure are not rolled back.
    ///
    /// # Errors
    /// - [`BootstrapError::NullProvision`](crate::error::BootstrapError::NullProvision)
    /// - [`BootstrapError::DuplicateRegistration`](crate::error::BootstrapError::DuplicateRegistration)
    /// - [`BootstrapError::UnresolvedDependency`](crate::error::BootstrapError::UnresolvedDependency)
    #[instrument(skip_all, name = "bootstrap", fields(candidates = candidates.len()))]
    pub fn run_bootstrap(&self, candidates: &[Arc<dyn Component>]) -> Result<BootstrapReport> {
        info!("Starting bootstrap");

        self.bootstrap_phases(candidates)
            .inspect(|report| {
                info!(
                    registered = report.registry.len(),
                    injected = report.injection.injected,
                    skipped = report.injection.skipped,
                    "Bootstrap completed ✓"
                );
            })
            .inspect_err(|err| error!(error = %err, "Bootstrap failed"))
    }

    fn bootstrap_phases(&self, candidates: &[Arc<dyn Component>]) -> Result<BootstrapReport> {
        let (registry, scan) = scan_providers(candidates)?;
        let mut collector = Collector::new(self.config.log_diagnostics);

        let injection = InjectionEngine::new(&registry)
            .overwrite_existing(self.config.overwrite_existing)
            .inject_all(candidates, &mut collector)?;

        let validation = self.config.validate_after_bootstrap.then(|| {
            let report = Validator::from_registry(&registry).validate(candidates);
            report.emit_to(&mut collector);
            report
        });

        Ok(BootstrapReport {
            registry,
            diagnostics: collector.into_diagnostics(),
            scan,
            injection,
            validation,
        })
    }

    /// Checks coverage of every injectable field and property.
    ///
    /// Independent of [`run_bootstrap`](Self::run_bootstrap): coverage is
    /// recomputed from the providers' declarations, nothing is invoked or
    /// written.
    pub fn run_validation(&self, candidates: &[Arc<dyn Component>]) -> ValidationReport {
        let report = Validator::from_providers(candidates).validate(candidates);
        if self.config.log_diagnostics {
            for diagnostic in report.diagnostics() {
                diagnostic.log();
            }
        }
        report
    }

    /// Asks `locator` for the candidates once, then bootstraps them.
    pub fn bootstrap_from(&self, locator: &dyn ComponentLocator) -> Result<BootstrapReport> {
        self.run_bootstrap(&locator.find_all())
    }

    /// Asks `locator` for the candidates once, then validates them.
    pub fn validate_from(&self, locator: &dyn ComponentLocator) -> ValidationReport {
        self.run_validation(&locator.find_all())
    }
}

/// Builds a fresh registry; the caller only ever sees it frozen.
fn scan_providers(candidates: &[Arc<dyn Component>]) -> Result<(TypeRegistry, ScanSummary)> {
    let mut registry = TypeRegistry::new();
    let scan = ProviderScanner::new(&mut registry).scan(candidates)?;
    Ok((registry, scan))
}

/// Bootstraps `candidates` with the default configuration.
pub fn run_bootstrap(candidates: &[Arc<dyn Component>]) -> Result<BootstrapReport> {
    Injector::new().run_bootstrap(candidates)
}

/// Validates `candidates` with the default configuration.
pub fn run_validation(candidates: &[Arc<dyn Component>]) -> ValidationReport {
    Injector::new().run_validation(candidates)
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{BootstrapReport, Injector, run_bootstrap, run_validation};
    pub use crate::component::{Component, ComponentLocator};
    pub use crate::config::BootstrapConfig;
    pub use crate::diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
    pub use crate::error::{BootstrapError, Result};
    pub use crate::inject::{Inject, Injectable, InjectionPoints, MemberKind};
    pub use crate::key::TypeKey;
    pub use crate::provider::{Provider, Provisions};
    pub use crate::validate::ValidationReport;
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
