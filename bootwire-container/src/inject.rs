//! Injectable capability — members that require provided values.
//!
//! A component declares its injection points explicitly instead of being
//! scanned for markers:
//!
//! ```rust
//! use std::sync::Arc;
//! use bootwire_container::inject::{Inject, InjectionPoints, Injectable};
//!
//! struct HealthService;
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
//! ```
//!
//! Three member kinds exist:
//! - **fields**: an [`Inject<T>`] slot, skipped when already set
//! - **properties**: a getter/setter pair, skipped when the getter reports a value
//! - **methods**: called once with every parameter resolved, see [`Params`]

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{BootstrapError, Result, UnregisteredTypeError};
use crate::key::TypeKey;
use crate::registry::{Instance, downcast};

/// The kind of an injectable member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    Field,
    Property,
    Method,
}

impl MemberKind {
    /// Fields and properties hold a value; methods do not.
    #[inline]
    pub fn holds_value(&self) -> bool {
        matches!(self, MemberKind::Field | MemberKind::Property)
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Field => write!(f, "field"),
            MemberKind::Property => write!(f, "property"),
            MemberKind::Method => write!(f, "method"),
        }
    }
}

/// A field slot filled during injection.
///
/// Starts empty unless built with [`Inject::with`]. Uses interior
/// mutability so components can be injected through shared references.
pub struct Inject<T> {
    slot: RwLock<Option<Arc<T>>>,
}

impl<T> Inject<T> {
    /// An empty slot.
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// A slot that already holds `value`.
    pub fn with(value: Arc<T>) -> Self {
        Self {
            slot: RwLock::new(Some(value)),
        }
    }

    /// Returns the injected value, if any.
    pub fn get(&self) -> Option<Arc<T>> {
        self.slot.read().clone()
    }

    /// Returns `true` if the slot holds a value.
    pub fn is_set(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Stores `value`, returning the previous one.
    pub fn set(&self, value: Arc<T>) -> Option<Arc<T>> {
        self.slot.write().replace(value)
    }
}

impl<T> Default for Inject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("type", &std::any::type_name::<T>())
            .field("set", &self.is_set())
            .finish()
    }
}

/// Parameter list of an injectable method.
///
/// Implemented for `()` and for tuples of `Arc<T>` up to eight elements.
/// Keys are reported in parameter order.
pub trait Params: Sized {
    /// Required type of each parameter, in order.
    fn keys() -> Vec<TypeKey>;

    /// Builds the argument tuple from resolved instances in parameter order.
    fn from_instances(instances: Vec<Instance>) -> Result<Self>;
}

impl Params for () {
    fn keys() -> Vec<TypeKey> {
        Vec::new()
    }

    fn from_instances(_instances: Vec<Instance>) -> Result<Self> {
        Ok(())
    }
}

fn take_next<T: Any + Send + Sync>(instances: &mut impl Iterator<Item = Instance>) -> Result<Arc<T>> {
    let key = TypeKey::of::<T>();
    let instance = instances.next().ok_or_else(|| {
        BootstrapError::UnregisteredType(UnregisteredTypeError {
            key,
            suggestions: Vec::new(),
        })
    })?;
    downcast::<T>(key, instance)
}

macro_rules! impl_params {
    ($($ty:ident),+) => {
        impl<$($ty: Any + Send + Sync),+> Params for ($(Arc<$ty>,)+) {
            fn keys() -> Vec<TypeKey> {
                vec![$(TypeKey::of::<$ty>()),+]
            }

            fn from_instances(instances: Vec<Instance>) -> Result<Self> {
                let mut instances = instances.into_iter();
                Ok(($(take_next::<$ty>(&mut instances)?,)+))
            }
        }
    };
}

impl_params!(A);
impl_params!(A, B);
impl_params!(A, B, C);
impl_params!(A, B, C, D);
impl_params!(A, B, C, D, E);
impl_params!(A, B, C, D, E, F);
impl_params!(A, B, C, D, E, F, G);
impl_params!(A, B, C, D, E, F, G, H);

type ApplyFn<'a> = Box<dyn FnOnce(Vec<Instance>) -> Result<()> + 'a>;
type IsSetFn<'a> = Box<dyn Fn() -> bool + 'a>;

/// One member of a component that requires injection.
///
/// Built through [`InjectionPoints`]; consumed by the injection engine.
pub struct InjectionPoint<'a> {
    name: &'static str,
    kind: MemberKind,
    requires: Vec<TypeKey>,
    is_set: Option<IsSetFn<'a>>,
    apply: ApplyFn<'a>,
}

impl<'a> InjectionPoint<'a> {
    /// Member name as declared.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Required types; one for fields and properties, one per parameter for methods.
    pub fn requires(&self) -> &[TypeKey] {
        &self.requires
    }

    /// Whether the member already holds a value. Always `false` for methods.
    pub fn is_set(&self) -> bool {
        self.is_set.as_ref().is_some_and(|is_set| is_set())
    }

    /// Writes the value or invokes the method with `instances` in parameter order.
    pub(crate) fn apply(self, instances: Vec<Instance>) -> Result<()> {
        (self.apply)(instances)
    }
}

impl fmt::Debug for InjectionPoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionPoint")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("requires", &self.requires)
            .finish()
    }
}

/// Collects the injection points a component declares.
#[derive(Default)]
pub struct InjectionPoints<'a> {
    points: Vec<InjectionPoint<'a>>,
}

impl<'a> InjectionPoints<'a> {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Declares a field backed by an [`Inject<T>`] slot.
    pub fn field<T: Any + Send + Sync>(&mut self, name: &'static str, slot: &'a Inject<T>) -> &mut Self {
        let key = TypeKey::of::<T>();
        self.points.push(InjectionPoint {
            name,
            kind: MemberKind::Field,
            requires: vec![key],
            is_set: Some(Box::new(move || slot.is_set())),
            apply: Box::new(move |instances| {
                let (value,) = <(Arc<T>,)>::from_instances(instances)?;
                slot.set(value);
                Ok(())
            }),
        });
        self
    }

    /// Declares a settable property.
    ///
    /// `is_set` reports whether the property already holds a value;
    /// `set` receives the resolved value.
    pub fn property<T: Any + Send + Sync>(
        &mut self,
        name: &'static str,
        is_set: impl Fn() -> bool + 'a,
        set: impl FnOnce(Arc<T>) + 'a,
    ) -> &mut Self {
        self.points.push(InjectionPoint {
            name,
            kind: MemberKind::Property,
            requires: vec![TypeKey::of::<T>()],
            is_set: Some(Box::new(is_set)),
            apply: Box::new(move |instances| {
                let (value,) = <(Arc<T>,)>::from_instances(instances)?;
                set(value);
                Ok(())
            }),
        });
        self
    }

    /// Declares a method called once with all of its parameters resolved.
    ///
    /// ```rust,ignore
    /// points.method("construct", |(health, weapon): (Arc<Health>, Arc<Weapon>)| {
    ///     self.arm(health, weapon);
    /// });
    /// ```
    pub fn method<P: Params>(&mut self, name: &'static str, invoke: impl FnOnce(P) + 'a) -> &mut Self {
        self.points.push(InjectionPoint {
            name,
            kind: MemberKind::Method,
            requires: P::keys(),
            is_set: None,
            apply: Box::new(move |instances| {
                invoke(P::from_instances(instances)?);
                Ok(())
            }),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Declared points, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &InjectionPoint<'a>> {
        self.points.iter()
    }

    pub(crate) fn into_points(self) -> Vec<InjectionPoint<'a>> {
        self.points
    }
}

/// A component with members that require provided values.
///
/// Implementors declare every member in a fixed order; the engine
/// processes them in that order.
pub trait Injectable {
    /// Declares the injection points of this component.
    fn injections<'a>(&'a self, points: &mut InjectionPoints<'a>);
}

/// Collects the injection points of `injectable` in declaration order.
pub fn injection_points(injectable: &dyn Injectable) -> InjectionPoints<'_> {
    let mut points = InjectionPoints::new();
    injectable.injections(&mut points);
    points
}
