//! Wiring validation — an advisory pass that never mutates anything.
//!
//! The validator knows which types are covered (either declared by the
//! candidates' providers or present in a built registry) and flags every
//! injectable field or property that
//! 1. requires a type that is not covered, and
//! 2. is still empty.
//!
//! Methods hold no value and are not checked. Findings are batched into a
//! [`ValidationReport`]; nothing here returns an error.

use std::collections::HashSet;
use std::sync::Arc;

use bootwire_support::rendering::shorten_type_name;
use tracing::{error, info, instrument};

use crate::component::Component;
use crate::diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSink};
use crate::inject::injection_points;
use crate::key::TypeKey;
use crate::registry::TypeRegistry;
use crate::scanner::provided_keys;

/// Result of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    findings: Vec<Diagnostic>,
    checked: usize,
}

impl ValidationReport {
    /// One error diagnostic per flagged member; empty when everything is covered.
    pub fn findings(&self) -> &[Diagnostic] {
        &self.findings
    }

    pub fn is_valid(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of fields and properties inspected.
    pub fn checked(&self) -> usize {
        self.checked
    }

    /// The findings, or a single `AllValid` info diagnostic when there are none.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        if self.findings.is_empty() {
            vec![Diagnostic::info(
                DiagnosticCode::AllValid,
                "[Validation] All dependencies are valid.",
            )]
        } else {
            self.findings.clone()
        }
    }

    /// Sends [`diagnostics`](Self::diagnostics) to `sink`.
    pub fn emit_to(&self, sink: &mut dyn DiagnosticSink) {
        for diagnostic in self.diagnostics() {
            sink.emit(diagnostic);
        }
    }
}

/// Cross-checks injectable requirements against a set of covered types.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    covered: HashSet<TypeKey>,
}

impl Validator {
    /// Coverage from the provide operations the candidates declare.
    ///
    /// No provide operation is invoked.
    pub fn from_providers(candidates: &[Arc<dyn Component>]) -> Self {
        Self {
            covered: provided_keys(candidates),
        }
    }

    /// Coverage from an already built registry.
    pub fn from_registry(registry: &TypeRegistry) -> Self {
        Self {
            covered: registry.keys().into_iter().collect(),
        }
    }

    pub fn covers(&self, key: &TypeKey) -> bool {
        self.covered.contains(key)
    }

    /// Flags every empty field or property whose type is not covered.
    #[instrument(skip_all, name = "validation", fields(candidates = candidates.len()))]
    pub fn validate(&self, candidates: &[Arc<dyn Component>]) -> ValidationReport {
        let mut report = ValidationReport::default();

        for candidate in candidates {
            let Some(injectable) = candidate.as_injectable() else {
                continue;
            };

            for point in injection_points(injectable).iter() {
                if !point.kind().holds_value() {
                    continue;
                }
                report.checked += 1;

                for key in point.requires() {
                    if self.covers(key) || point.is_set() {
                        continue;
                    }
                    report.findings.push(Diagnostic::error(
                        DiagnosticCode::MissingDependency,
                        format!(
                            "[Validation] {} is missing dependency {} for {} `{}` on component {}",
                            shorten_type_name(candidate.type_name()),
                            key.short_name(),
                            point.kind(),
                            point.name(),
                            candidate.identity(),
                        ),
                    ));
                }
            }
        }

        if report.is_valid() {
            info!(checked = report.checked, "All dependencies are valid ✓");
        } else {
            error!(
                invalid = report.findings.len(),
                checked = report.checked,
                "Dependencies are invalid"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inject::{Inject, InjectionPoints, Injectable};
    use crate::provider::{Provider, Provisions};
    use crate::diagnostic::Severity;
    use parking_lot::Mutex;

    struct HealthService;
    struct WeaponService;

    struct GameProvider;

    impl Provider for GameProvider {
        fn provisions<'a>(&'a self, provisions: &mut Provisions<'a>) {
            provisions.provide_value("provide_health_service", || HealthService);
        }
    }

    crate::component!(GameProvider: Provider);

    #[derive(Default)]
    struct Player {
        health: Inject<HealthService>,
        weapon: Inject<WeaponService>,
        calls: Mutex<u32>,
    }

    impl Injectable for Player {
        fn injections<'a>(&'a self, points: &mut InjectionPoints<'a>) {
            points
                .field("health", &self.health)
                .field("weapon", &self.weapon)
                .method("ready", |(_weapon,): (Arc<WeaponService>,)| {
                    *self.calls.lock() += 1;
                });
        }
    }

    crate::component!(Player: Injectable);

    #[test]
    fn one_missing_field_yields_one_finding() {
        let candidates: Vec<Arc<dyn Component>> =
            vec![Arc::new(GameProvider), Arc::new(Player::default())];

        let report = Validator::from_providers(&candidates).validate(&candidates);

        assert_eq!(report.checked(), 2);
        assert_eq!(report.findings().len(), 1);
        let finding = &report.findings()[0];
        assert_eq!(finding.severity, Severity::Error);
        assert_eq!(finding.code, DiagnosticCode::MissingDependency);
        assert!(finding.message.contains("Player"));
        assert!(finding.message.contains("`weapon`"));
        assert!(finding.message.contains("WeaponService"));
    }

    #[test]
    fn preset_field_is_not_flagged() {
        let player = Player {
            weapon: Inject::with(Arc::new(WeaponService)),
            ..Player::default()
        };
        let candidates: Vec<Arc<dyn Component>> = vec![Arc::new(GameProvider), Arc::new(player)];

        let report = Validator::from_providers(&candidates).validate(&candidates);

        assert!(report.is_valid());
        let diagnostics = report.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::AllValid);
    }

    #[test]
    fn validation_does_not_mutate() {
        let player = Arc::new(Player::default());
        let candidates: Vec<Arc<dyn Component>> = vec![Arc::new(GameProvider), player.clone()];

        Validator::from_providers(&candidates).validate(&candidates);

        assert!(!player.health.is_set());
        assert_eq!(*player.calls.lock(), 0);
    }

    #[test]
    fn registry_coverage() {
        let mut registry = TypeRegistry::new();
        registry
            .register(TypeKey::of::<WeaponService>(), Arc::new(WeaponService))
            .unwrap();

        let validator = Validator::from_registry(&registry);
        assert!(validator.covers(&TypeKey::of::<WeaponService>()));
        assert!(!validator.covers(&TypeKey::of::<HealthService>()));
    }

    #[test]
    fn emit_to_sink() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        ValidationReport::default().emit_to(&mut sink);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].severity, Severity::Info);
    }
}
