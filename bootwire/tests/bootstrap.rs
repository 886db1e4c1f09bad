//! End-to-end bootstrap behaviour through the facade crate.

use std::sync::Arc;

use bootwire::component;
use bootwire::prelude::*;
use parking_lot::Mutex;

#[derive(Debug)]
struct Audio(&'static str);
#[derive(Debug)]
struct Physics(u32);
#[derive(Debug)]
struct Navigation;
#[derive(Debug)]
struct Saves;

// ── providers ──

struct CoreProvider {
    audio: Arc<Audio>,
    physics: Arc<Physics>,
}

impl CoreProvider {
    fn new() -> Self {
        Self {
            audio: Arc::new(Audio("mixer")),
            physics: Arc::new(Physics(60)),
        }
    }
}

impl Provider for CoreProvider {
    fn provisions<'a>(&'a self, provisions: &mut Provisions<'a>) {
        provisions
            .provide("provide_audio", || Some(self.audio.clone()))
            .provide("provide_physics", || Some(self.physics.clone()));
    }
}

component!(CoreProvider: Provider);

struct NavigationProvider(Arc<Navigation>);

impl Provider for NavigationProvider {
    fn provisions<'a>(&'a self, provisions: &mut Provisions<'a>) {
        provisions.provide("provide_navigation", || Some(self.0.clone()));
    }
}

component!(NavigationProvider: Provider);

struct RivalAudioProvider;

impl Provider for RivalAudioProvider {
    fn provisions<'a>(&'a self, provisions: &mut Provisions<'a>) {
        provisions.provide_value("provide_audio", || Audio("rival"));
    }
}

component!(RivalAudioProvider: Provider);

// ── consumers ──

#[derive(Default)]
struct Listener {
    audio: Inject<Audio>,
}

impl Injectable for Listener {
    fn injections<'a>(&'a self, points: &mut InjectionPoints<'a>) {
        points.field("audio", &self.audio);
    }
}

component!(Listener: Injectable);

#[derive(Default)]
struct Vehicle {
    calls: Mutex<Vec<(Arc<Audio>, Arc<Physics>)>>,
}

impl Injectable for Vehicle {
    fn injections<'a>(&'a self, points: &mut InjectionPoints<'a>) {
        points.method("construct", |(audio, physics): (Arc<Audio>, Arc<Physics>)| {
            self.calls.lock().push((audio, physics));
        });
    }
}

component!(Vehicle: Injectable);

#[derive(Default)]
struct Archivist {
    saves: Inject<Saves>,
}

impl Injectable for Archivist {
    fn injections<'a>(&'a self, points: &mut InjectionPoints<'a>) {
        points.field("saves", &self.saves);
    }
}

component!(Archivist: Injectable);

#[derive(Default)]
struct Pilot {
    navigation: Mutex<Option<Arc<Navigation>>>,
}

impl Injectable for Pilot {
    fn injections<'a>(&'a self, points: &mut InjectionPoints<'a>) {
        points.property::<Navigation>(
            "navigation",
            || self.navigation.lock().is_some(),
            |value| *self.navigation.lock() = Some(value),
        );
    }
}

component!(Pilot: Injectable);

fn quiet() -> Injector {
    Injector::new().log_diagnostics(false)
}

#[test]
fn distinct_providers_resolve_to_their_instances() {
    let core = Arc::new(CoreProvider::new());
    let navigation = Arc::new(NavigationProvider(Arc::new(Navigation)));
    let candidates: Vec<Arc<dyn Component>> = vec![core.clone(), navigation.clone()];

    let report = quiet().run_bootstrap(&candidates).unwrap();
    let registry = report.registry();

    assert_eq!(registry.len(), 3);
    assert!(Arc::ptr_eq(&registry.resolve_as::<Audio>().unwrap(), &core.audio));
    assert!(Arc::ptr_eq(&registry.resolve_as::<Physics>().unwrap(), &core.physics));
    assert!(Arc::ptr_eq(&registry.resolve_as::<Navigation>().unwrap(), &navigation.0));
}

#[test]
fn duplicate_provider_fails_bootstrap() {
    let candidates: Vec<Arc<dyn Component>> =
        vec![Arc::new(CoreProvider::new()), Arc::new(RivalAudioProvider)];

    match quiet().run_bootstrap(&candidates) {
        Err(BootstrapError::DuplicateRegistration(e)) => {
            assert_eq!(e.key, TypeKey::of::<Audio>());
            assert!(e.existing.is_some_and(|p| p.ends_with("CoreProvider")));
            assert!(e.rejected.is_some_and(|p| p.ends_with("RivalAudioProvider")));
        }
        other => panic!("Expected DuplicateRegistration, got: {other:?}"),
    }
}

#[test]
fn field_receives_provider_instance() {
    let core = Arc::new(CoreProvider::new());
    let listener = Arc::new(Listener::default());
    let candidates: Vec<Arc<dyn Component>> = vec![listener.clone(), core.clone()];

    quiet().run_bootstrap(&candidates).unwrap();

    // providers are scanned before any injection, whatever the order
    assert!(Arc::ptr_eq(&listener.audio.get().unwrap(), &core.audio));
}

#[test]
fn unresolved_field_stops_later_candidates() {
    let archivist = Arc::new(Archivist::default());
    let listener = Arc::new(Listener::default());
    let candidates: Vec<Arc<dyn Component>> =
        vec![Arc::new(CoreProvider::new()), archivist.clone(), listener.clone()];

    let err = quiet().run_bootstrap(&candidates).unwrap_err();

    match &err {
        BootstrapError::UnresolvedDependency(e) => {
            assert!(e.owner.ends_with("Archivist"));
            assert_eq!(e.member, "saves");
            assert_eq!(e.kind, MemberKind::Field);
        }
        other => panic!("Expected UnresolvedDependency, got: {other:?}"),
    }
    assert_eq!(err.key(), Some(TypeKey::of::<Saves>()));
    assert!(!listener.audio.is_set());
}

#[test]
fn preset_field_is_kept_and_warned() {
    let own = Arc::new(Audio("own"));
    let listener = Arc::new(Listener {
        audio: Inject::with(own.clone()),
    });
    let candidates: Vec<Arc<dyn Component>> = vec![Arc::new(CoreProvider::new()), listener.clone()];

    let report = quiet().run_bootstrap(&candidates).unwrap();

    assert!(Arc::ptr_eq(&listener.audio.get().unwrap(), &own));
    assert_eq!(report.injection().skipped, 1);
    let warnings: Vec<_> = report
        .diagnostics()
        .iter()
        .filter(|d| d.code == DiagnosticCode::AlreadySet)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Warning);
}

#[test]
fn overwrite_existing_replaces_preset_field() {
    let core = Arc::new(CoreProvider::new());
    let listener = Arc::new(Listener {
        audio: Inject::with(Arc::new(Audio("own"))),
    });
    let candidates: Vec<Arc<dyn Component>> = vec![core.clone(), listener.clone()];

    let report = quiet()
        .overwrite_existing(true)
        .run_bootstrap(&candidates)
        .unwrap();

    assert!(Arc::ptr_eq(&listener.audio.get().unwrap(), &core.audio));
    assert!(report.diagnostics().is_empty());
}

#[test]
fn property_is_set_from_registry() {
    let navigation = Arc::new(NavigationProvider(Arc::new(Navigation)));
    let pilot = Arc::new(Pilot::default());
    let candidates: Vec<Arc<dyn Component>> = vec![navigation.clone(), pilot.clone()];

    quiet().run_bootstrap(&candidates).unwrap();

    let injected = pilot.navigation.lock().clone().unwrap();
    assert!(Arc::ptr_eq(&injected, &navigation.0));
}

#[test]
fn validation_reports_single_missing_field() {
    let candidates: Vec<Arc<dyn Component>> =
        vec![Arc::new(CoreProvider::new()), Arc::new(Archivist::default())];

    let report = quiet().run_validation(&candidates);

    assert_eq!(report.findings().len(), 1);
    let message = &report.findings()[0].message;
    assert!(message.contains("Archivist"));
    assert!(message.contains("`saves`"));
    assert!(message.contains("Saves"));
}

#[test]
fn validation_with_full_coverage_has_no_findings() {
    let candidates: Vec<Arc<dyn Component>> =
        vec![Arc::new(CoreProvider::new()), Arc::new(Listener::default())];

    let report = quiet().run_validation(&candidates);

    assert!(report.findings().is_empty());
    assert_eq!(report.diagnostics()[0].code, DiagnosticCode::AllValid);
}

#[test]
fn field_and_method_consumers_share_provider_instances() {
    let core = Arc::new(CoreProvider::new());
    let listener = Arc::new(Listener::default());
    let vehicle = Arc::new(Vehicle::default());
    let candidates: Vec<Arc<dyn Component>> = vec![core.clone(), listener.clone(), vehicle.clone()];

    quiet().run_bootstrap(&candidates).unwrap();

    assert!(Arc::ptr_eq(&listener.audio.get().unwrap(), &core.audio));

    let calls = vehicle.calls.lock();
    assert_eq!(calls.len(), 1);
    let (audio, physics) = &calls[0];
    assert!(Arc::ptr_eq(audio, &core.audio));
    assert!(Arc::ptr_eq(physics, &core.physics));
}

#[test]
fn independent_bootstraps_do_not_interfere() {
    let first = Arc::new(Listener::default());
    let second = Arc::new(Listener::default());
    let core_a = Arc::new(CoreProvider::new());
    let core_b = Arc::new(CoreProvider::new());

    let a: Vec<Arc<dyn Component>> = vec![core_a.clone(), first.clone()];
    let b: Vec<Arc<dyn Component>> = vec![core_b.clone(), second.clone()];

    quiet().run_bootstrap(&a).unwrap();
    quiet().run_bootstrap(&b).unwrap();

    assert!(Arc::ptr_eq(&first.audio.get().unwrap(), &core_a.audio));
    assert!(Arc::ptr_eq(&second.audio.get().unwrap(), &core_b.audio));
}
