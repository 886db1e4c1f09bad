//! Error types for bootstrap operations.
//!
//! Every fatal failure names the types and members involved and ends with
//! a hint. Non-fatal findings are [`Diagnostic`](crate::diagnostic::Diagnostic)s,
//! never errors.

use std::fmt;

use bootwire_support::rendering::{render_list, shorten_type_name};

use crate::inject::MemberKind;
use crate::key::TypeKey;

/// Main error type for all bootstrap operations.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// A second instance was registered for an already provided type.
    #[error("{}", .0)]
    DuplicateRegistration(DuplicateRegistrationError),

    /// A provide operation yielded no value.
    #[error("{}", .0)]
    NullProvision(NullProvisionError),

    /// A registry lookup found nothing for the requested type.
    #[error("{}", .0)]
    UnregisteredType(UnregisteredTypeError),

    /// An injectable member requires a type nobody provides.
    #[error("{}", .0)]
    UnresolvedDependency(UnresolvedDependencyError),

    /// A registered instance does not downcast to the type of its key.
    #[error("Registered instance for {key} is not a {expected}")]
    TypeMismatch {
        key: TypeKey,
        expected: &'static str,
    },
}

impl BootstrapError {
    /// Returns the type key the error is about, if it concerns exactly one.
    pub fn key(&self) -> Option<TypeKey> {
        match self {
            BootstrapError::DuplicateRegistration(e) => Some(e.key),
            BootstrapError::NullProvision(e) => Some(e.key),
            BootstrapError::UnregisteredType(e) => Some(e.key),
            BootstrapError::UnresolvedDependency(e) => match e.missing.as_slice() {
                [only] => Some(*only),
                _ => None,
            },
            BootstrapError::TypeMismatch { key, .. } => Some(*key),
        }
    }
}

/// Error when a type is registered twice.
#[derive(Debug)]
pub struct DuplicateRegistrationError {
    pub key: TypeKey,
    /// Provider that registered the type first
    pub existing: Option<&'static str>,
    /// Provider whose registration was rejected
    pub rejected: Option<&'static str>,
}

impl fmt::Display for DuplicateRegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type already registered: {}", self.key)?;

        if let Some(existing) = self.existing {
            write!(f, "\n  Provided first by: {}", shorten_type_name(existing))?;
        }
        if let Some(rejected) = self.rejected {
            write!(f, "\n  Rejected from: {}", shorten_type_name(rejected))?;
        }

        write!(
            f,
            "\n  Hint: Each type may be provided by exactly one provide operation per bootstrap"
        )
    }
}

/// Error when a provide operation returned `None`.
#[derive(Debug)]
pub struct NullProvisionError {
    /// Type name of the provider
    pub provider: &'static str,
    /// Name of the provide operation
    pub operation: &'static str,
    /// Type the operation was declared to provide
    pub key: TypeKey,
}

impl fmt::Display for NullProvisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Provide operation `{}` of `{}` returned nothing when providing `{}`",
            self.operation,
            shorten_type_name(self.provider),
            self.key.short_name(),
        )?;
        write!(
            f,
            "\n  Hint: Provide operations must always yield a value; remove the declaration instead"
        )
    }
}

/// Error when a requested type is not in the registry.
#[derive(Debug)]
pub struct UnregisteredTypeError {
    pub key: TypeKey,
    /// Registered types with similar names
    pub suggestions: Vec<String>,
}

impl fmt::Display for UnregisteredTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type is not registered: {}", self.key)?;
        write_suggestions(f, &self.suggestions)
    }
}

/// Error when an injectable member cannot be satisfied.
///
/// For methods, `missing` lists every unresolved parameter, not only
/// the first one.
#[derive(Debug)]
pub struct UnresolvedDependencyError {
    /// Type name of the component owning the member
    pub owner: &'static str,
    /// Identity of the owning instance
    pub instance: String,
    /// Name of the field, property or method
    pub member: &'static str,
    pub kind: MemberKind,
    /// Required types that are not registered, in parameter order
    pub missing: Vec<TypeKey>,
    /// Registered types with names similar to the missing ones
    pub suggestions: Vec<String>,
}

impl fmt::Display for UnresolvedDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing: Vec<String> = self.missing.iter().map(TypeKey::short_name).collect();

        write!(
            f,
            "Failed to inject {} `{}` of `{}`: unresolved {}",
            self.kind,
            self.member,
            shorten_type_name(self.owner),
            render_list(&missing),
        )?;
        write!(f, "\n  Instance: {}", self.instance)?;
        write_suggestions(f, &self.suggestions)?;
        write!(
            f,
            "\n  Hint: Add a provider declaring a provide operation for {}",
            render_list(&missing)
        )
    }
}

fn write_suggestions(f: &mut fmt::Formatter<'_>, suggestions: &[String]) -> fmt::Result {
    if !suggestions.is_empty() {
        write!(f, "\n  Did you mean one of:")?;
        for suggestion in suggestions {
            write!(f, "\n    - {suggestion}")?;
        }
    }
    Ok(())
}

/// Convenient Result type for bootstrap operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;

#[cfg(test)]
mod tests {
    use super::*;

    struct HealthService;
    struct WeaponService;

    #[test]
    fn duplicate_registration_display() {
        let err = BootstrapError::DuplicateRegistration(DuplicateRegistrationError {
            key: TypeKey::of::<HealthService>(),
            existing: Some("game::GameProvider"),
            rejected: Some("game::BackupProvider"),
        });

        let msg = format!("{err}");
        assert!(msg.contains("already registered"));
        assert!(msg.contains("GameProvider"));
        assert!(msg.contains("BackupProvider"));
        assert_eq!(err.key(), Some(TypeKey::of::<HealthService>()));
    }

    #[test]
    fn null_provision_display() {
        let err = BootstrapError::NullProvision(NullProvisionError {
            provider: "game::GameProvider",
            operation: "provide_health",
            key: TypeKey::of::<HealthService>(),
        });

        let msg = format!("{err}");
        assert!(msg.contains("`provide_health`"));
        assert!(msg.contains("`GameProvider`"));
        assert!(msg.contains("`HealthService`"));
    }

    #[test]
    fn unresolved_method_lists_all_parameters() {
        let err = BootstrapError::UnresolvedDependency(UnresolvedDependencyError {
            owner: "game::Player",
            instance: "player-1".into(),
            member: "construct",
            kind: MemberKind::Method,
            missing: vec![TypeKey::of::<HealthService>(), TypeKey::of::<WeaponService>()],
            suggestions: vec![],
        });

        let msg = format!("{err}");
        assert!(msg.contains("method `construct` of `Player`"));
        assert!(msg.contains("HealthService, WeaponService"));
        assert!(msg.contains("player-1"));
        assert_eq!(err.key(), None);
    }

    #[test]
    fn unregistered_type_with_suggestions() {
        let err = BootstrapError::UnregisteredType(UnregisteredTypeError {
            key: TypeKey::of::<HealthService>(),
            suggestions: vec!["game::HealthServices".into()],
        });

        let msg = format!("{err}");
        assert!(msg.contains("not registered"));
        assert!(msg.contains("Did you mean"));
    }
}
