//! A small game scene wired by Bootwire.
//!
//! Run with `RUST_LOG=bootwire_container=debug` to see every registration
//! and injection.

use std::sync::Arc;

use bootwire::component;
use bootwire::logging;
use bootwire::prelude::*;
use parking_lot::Mutex;
use tracing::info;

// === Services ===

struct HealthService {
    health: Mutex<i32>,
    max_health: i32,
}

impl HealthService {
    fn new() -> Self {
        Self {
            health: Mutex::new(100),
            max_health: 100,
        }
    }

    fn set_health(&self, health: i32) {
        let mut current = self.health.lock();
        *current = health.clamp(0, self.max_health);
        info!(requested = health, current = *current, "Set health");
    }

    fn take_damage(&self, amount: i32) {
        let mut current = self.health.lock();
        *current -= amount;
        info!(amount, current = *current, "Took damage");
    }
}

struct WeaponService;

impl WeaponService {
    fn fire(&self) {
        info!("Fired weapon");
    }
}

// === Provider ===

struct GameProvider;

impl Provider for GameProvider {
    fn provisions<'a>(&'a self, provisions: &mut Provisions<'a>) {
        provisions
            .provide_value("provide_health_service", HealthService::new)
            .provide_value("provide_weapon_service", || WeaponService);
    }
}

component!(GameProvider: Provider);

// === Consumers ===

#[derive(Default)]
struct Player {
    health: Inject<HealthService>,
    weapon: Inject<WeaponService>,
}

impl Player {
    fn start(&self) {
        if let Some(health) = self.health.get() {
            health.set_health(100);
        }
        if let Some(weapon) = self.weapon.get() {
            weapon.fire();
        }
    }
}

impl Injectable for Player {
    fn injections<'a>(&'a self, points: &mut InjectionPoints<'a>) {
        points
            .field("health_service", &self.health)
            .field("weapon_service", &self.weapon);
    }
}

component!(Player: Injectable);

#[derive(Default)]
struct Enemy {
    health: Inject<HealthService>,
    hits: Mutex<Vec<Arc<WeaponService>>>,
}

impl Enemy {
    fn start(&self) {
        if let Some(health) = self.health.get() {
            health.set_health(10);
            health.take_damage(self.hits.lock().len() as i32 * 5);
        }
    }
}

impl Injectable for Enemy {
    fn injections<'a>(&'a self, points: &mut InjectionPoints<'a>) {
        points
            .field("health_service", &self.health)
            .method("arm", |(weapon,): (Arc<WeaponService>,)| {
                self.hits.lock().push(weapon);
            });
    }
}

component!(Enemy: Injectable);

fn main() -> Result<()> {
    if let Err(err) = logging::init("bootwire_container=debug,game=info") {
        eprintln!("logging disabled: {err}");
    }

    let player = Arc::new(Player::default());
    let enemy = Arc::new(Enemy::default());

    // stands in for the host's scene query
    let scene = {
        let player = player.clone();
        let enemy = enemy.clone();
        move || -> Vec<Arc<dyn Component>> {
            vec![Arc::new(GameProvider), player.clone(), enemy.clone()]
        }
    };

    let injector = Injector::new().validate_after_bootstrap(true);

    let validation = injector.validate_from(&scene);
    println!("validation before bootstrap: {} finding(s)", validation.findings().len());

    let report = injector.bootstrap_from(&scene)?;
    println!("{report:?}");

    player.start();
    enemy.start();

    println!("scene wired");
    Ok(())
}
