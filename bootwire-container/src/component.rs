//! Candidate components and their capabilities.
//!
//! The host hands the bootstrap a sequence of [`Component`]s. Each one
//! reports which capabilities it has through [`Component::as_provider`] and
//! [`Component::as_injectable`]; both default to `None`.
//!
//! The [`component!`](crate::component!) macro writes that glue:
//!
//! ```rust
//! use bootwire_container::component;
//! use bootwire_container::inject::{Injectable, InjectionPoints};
//! use bootwire_container::component::Component;
//!
//! struct Spawner;
//!
//! impl Injectable for Spawner {
//!     fn injections<'a>(&'a self, _points: &mut InjectionPoints<'a>) {}
//! }
//!
//! component!(Spawner: Injectable);
//!
//! assert!(Spawner.as_injectable().is_some());
//! assert!(Spawner.as_provider().is_none());
//! ```

use std::sync::Arc;

use bootwire_support::rendering::shorten_type_name;

use crate::inject::Injectable;
use crate::provider::Provider;

/// A live component instance offered to the bootstrap.
pub trait Component {
    /// Fully qualified type name, used as the owner type in messages.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Identity of this instance, used to tell apart components of the
    /// same type in diagnostics. Defaults to the short type name.
    fn identity(&self) -> String {
        shorten_type_name(self.type_name())
    }

    /// The provider capability, if this component has one.
    fn as_provider(&self) -> Option<&dyn Provider> {
        None
    }

    /// The injectable capability, if this component has one.
    fn as_injectable(&self) -> Option<&dyn Injectable> {
        None
    }
}

/// Enumerates the live components of the host.
///
/// Called once per bootstrap or validation run.
pub trait ComponentLocator {
    fn find_all(&self) -> Vec<Arc<dyn Component>>;
}

impl<F> ComponentLocator for F
where
    F: Fn() -> Vec<Arc<dyn Component>>,
{
    fn find_all(&self) -> Vec<Arc<dyn Component>> {
        self()
    }
}

/// Implements [`Component`] for a type, exposing the listed capabilities.
///
/// ```rust,ignore
/// component!(GameProvider: Provider);
/// component!(Player: Injectable);
/// component!(Turret: Provider, Injectable);
/// component!(Decoration);
/// ```
#[macro_export]
macro_rules! component {
    ($ty:ty: $($capability:ident),+ $(,)?) => {
        impl $crate::component::Component for $ty {
            $($crate::__component_capability!($capability);)+
        }
    };
    ($ty:ty) => {
        impl $crate::component::Component for $ty {}
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __component_capability {
    (Provider) => {
        fn as_provider(&self) -> ::core::option::Option<&dyn $crate::provider::Provider> {
            ::core::option::Option::Some(self)
        }
    };
    (Injectable) => {
        fn as_injectable(&self) -> ::core::option::Option<&dyn $crate::inject::Injectable> {
            ::core::option::Option::Some(self)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inject::InjectionPoints;
    use crate::provider::Provisions;

    struct Turret;

    impl Provider for Turret {
        fn provisions<'a>(&'a self, _provisions: &mut Provisions<'a>) {}
    }

    impl Injectable for Turret {
        fn injections<'a>(&'a self, _points: &mut InjectionPoints<'a>) {}
    }

    crate::component!(Turret: Provider, Injectable);

    struct Decoration;
    crate::component!(Decoration);

    struct Named(&'static str);

    impl Component for Named {
        fn identity(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn capabilities_follow_macro() {
        assert!(Turret.as_provider().is_some());
        assert!(Turret.as_injectable().is_some());
        assert!(Decoration.as_provider().is_none());
        assert!(Decoration.as_injectable().is_none());
    }

    #[test]
    fn type_name_through_trait_object() {
        let component: Arc<dyn Component> = Arc::new(Turret);
        assert!(component.type_name().ends_with("Turret"));
        assert_eq!(component.identity(), "Turret");
    }

    #[test]
    fn identity_can_be_overridden() {
        let component: Arc<dyn Component> = Arc::new(Named("enemy-7"));
        assert_eq!(component.identity(), "enemy-7");
    }

    #[test]
    fn closure_locator() {
        let locator = || vec![Arc::new(Decoration) as Arc<dyn Component>];
        assert_eq!(locator.find_all().len(), 1);
    }
}
