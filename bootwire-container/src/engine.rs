//! Injection engine — the read phase of a bootstrap.
//!
//! Visits candidates in sequence order and processes the injection points
//! of every injectable in declaration order against a frozen registry.
//!
//! # Policy
//! - A field or property that already holds a value is skipped with an
//!   `AlreadySet` warning, unless `overwrite_existing` is enabled.
//! - A method is called only when every parameter resolves, and then
//!   exactly once.
//! - The first unresolved member aborts the whole run. Members injected
//!   before it keep their values.

use std::sync::Arc;

use bootwire_support::rendering::shorten_type_name;
use tracing::{debug, instrument, warn};

use crate::component::Component;
use crate::diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSink};
use crate::error::{BootstrapError, Result, UnresolvedDependencyError};
use crate::inject::{InjectionPoint, injection_points};
use crate::key::TypeKey;
use crate::registry::TypeRegistry;

/// Counts from one injection run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InjectionSummary {
    /// Injectable candidates visited
    pub candidates: usize,
    /// Members written or methods invoked
    pub injected: usize,
    /// Members left untouched because they were already set
    pub skipped: usize,
    /// Already set members replaced under `overwrite_existing`
    pub overwritten: usize,
}

/// Wires injectable candidates from a read-only registry.
pub struct InjectionEngine<'r> {
    registry: &'r TypeRegistry,
    overwrite_existing: bool,
}

impl<'r> InjectionEngine<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            overwrite_existing: false,
        }
    }

    /// Replace already set fields and properties instead of skipping them.
    pub fn overwrite_existing(mut self, overwrite: bool) -> Self {
        self.overwrite_existing = overwrite;
        self
    }

    /// Injects every injectable candidate.
    ///
    /// # Errors
    /// [`BootstrapError::UnresolvedDependency`] for the first member whose
    /// required type is not registered. Later members and candidates are
    /// not touched.
    #[instrument(skip_all, name = "injection", fields(candidates = candidates.len()))]
    pub fn inject_all(
        &self,
        candidates: &[Arc<dyn Component>],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<InjectionSummary> {
        let mut summary = InjectionSummary::default();

        for candidate in candidates {
            let Some(injectable) = candidate.as_injectable() else {
                continue;
            };

            let points = injection_points(injectable);
            if points.is_empty() {
                continue;
            }
            summary.candidates += 1;

            for point in points.into_points() {
                self.inject_point(candidate.as_ref(), point, sink, &mut summary)?;
            }
        }

        debug!(
            candidates = summary.candidates,
            injected = summary.injected,
            skipped = summary.skipped,
            "Injection finished"
        );
        Ok(summary)
    }

    fn inject_point(
        &self,
        owner: &dyn Component,
        point: InjectionPoint<'_>,
        sink: &mut dyn DiagnosticSink,
        summary: &mut InjectionSummary,
    ) -> Result<()> {
        if point.kind().holds_value() && point.is_set() {
            if !self.overwrite_existing {
                sink.emit(Diagnostic::warning(
                    DiagnosticCode::AlreadySet,
                    format!(
                        "{} `{}` of `{}` is already set",
                        point.kind(),
                        point.name(),
                        shorten_type_name(owner.type_name()),
                    ),
                ));
                summary.skipped += 1;
                return Ok(());
            }
            debug!(owner = owner.type_name(), member = point.name(), "Overwriting member");
            summary.overwritten += 1;
        }

        let mut resolved = Vec::with_capacity(point.requires().len());
        let mut missing = Vec::new();
        for key in point.requires() {
            match self.registry.entry(key) {
                Some(entry) => resolved.push(entry.instance.clone()),
                None => missing.push(*key),
            }
        }

        if !missing.is_empty() {
            let err = self.unresolved(owner, &point, missing);
            warn!(error = %err, "Injection aborted");
            return Err(err);
        }

        let (kind, member) = (point.kind(), point.name());
        point.apply(resolved)?;
        summary.injected += 1;

        debug!(owner = owner.type_name(), member, kind = %kind, "Injected");
        Ok(())
    }

    fn unresolved(
        &self,
        owner: &dyn Component,
        point: &InjectionPoint<'_>,
        missing: Vec<TypeKey>,
    ) -> BootstrapError {
        let mut suggestions: Vec<String> = missing
            .iter()
            .flat_map(|key| self.registry.suggestions_for(key))
            .collect();
        suggestions.dedup();

        BootstrapError::UnresolvedDependency(UnresolvedDependencyError {
            owner: owner.type_name(),
            instance: owner.identity(),
            member: point.name(),
            kind: point.kind(),
            missing,
            suggestions,
        })
    }
}
