//! Resolution error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::unit::UnitKind;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Fatal error during a configuration pass.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error("unit `{name}` is already declared as a {existing_kind}")]
    #[diagnostic(code(manifold::resolve::duplicate_unit))]
    DuplicateUnit { name: String, existing_kind: UnitKind },

    #[error("unit `{name}` is not declared")]
    #[diagnostic(code(manifold::resolve::undefined_unit))]
    UndefinedUnit { name: String },

    #[error("meta unit `{unit}` cannot have build dependencies")]
    #[diagnostic(
        code(manifold::resolve::meta_build_dependency),
        help("Declare them as run dependencies instead")
    )]
    MetaBuildDependency { unit: String, dependencies: Vec<String> },

    #[error("could not find dependency `{dependency}` of `{unit}` on the host")]
    #[diagnostic(code(manifold::resolve::external_not_found))]
    ExternalDependencyNotFound { unit: String, dependency: String },

    #[error("could not resolve `{dependency}` of `{unit}` to a host package")]
    #[diagnostic(code(manifold::resolve::unresolved_host_package))]
    UnresolvedHostPackage { unit: String, dependency: String },

    #[error("invalid distribution state: {reason}")]
    #[diagnostic(code(manifold::resolve::distribution_state))]
    InvalidDistributionState { reason: String },

    #[error("invalid unit name `{name}`")]
    #[diagnostic(
        code(manifold::resolve::invalid_name),
        help("Unit names start with a letter and contain only letters, digits and underscores")
    )]
    InvalidUnitName { name: String },

    #[error("invalid version `{version}` for unit `{unit}`: {reason}")]
    #[diagnostic(code(manifold::resolve::invalid_version))]
    InvalidVersion {
        unit: String,
        version: String,
        reason: String,
    },

    #[error("unit `{unit}` is a {found}, expected a {expected}")]
    #[diagnostic(code(manifold::resolve::kind_mismatch))]
    UnitKindMismatch {
        unit: String,
        expected: UnitKind,
        found: UnitKind,
    },

    #[error("cycle detected between internal build dependencies")]
    #[diagnostic(code(manifold::resolve::cycle))]
    DependencyCycle { units: Vec<String> },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::DuplicateUnit {
                name,
                existing_kind,
            } => Diagnostic::error(format!("unit `{}` is declared twice", name))
                .with_context(format!("first declared as a {}", existing_kind))
                .with_suggestion("Rename one of the units or remove the duplicate entry"),

            ResolveError::UndefinedUnit { name } => {
                Diagnostic::error(format!("unit `{}` is not declared", name))
                    .with_suggestion(suggestions::UNDEFINED_UNIT)
            }

            ResolveError::MetaBuildDependency { unit, dependencies } => {
                let mut diag = Diagnostic::error(format!(
                    "meta unit `{}` cannot have build dependencies",
                    unit
                ));

                if !dependencies.is_empty() {
                    diag = diag.with_context(format!(
                        "build dependencies requested: {}",
                        dependencies.join(", ")
                    ));
                }

                diag.with_suggestion("Declare them as run dependencies instead")
                    .with_suggestion(format!(
                        "Or drop `meta = true` from `{}` if it builds artifacts",
                        unit
                    ))
            }

            ResolveError::ExternalDependencyNotFound { unit, dependency } => {
                Diagnostic::error(format!(
                    "could not find `{}`, required by `{}`",
                    dependency, unit
                ))
                .with_context("neither the unit locator nor the package-config fallback knows it")
                .with_suggestion(suggestions::EXTERNAL_NOT_FOUND)
                .with_suggestion(suggestions::MISSING_TOOLS)
            }

            ResolveError::UnresolvedHostPackage { unit, dependency } => Diagnostic::error(
                format!(
                    "no host package provides `{}`, required by `{}`",
                    dependency, unit
                ),
            )
            .with_context("name resolution failed and no installed package owns its manifest")
            .with_suggestion(format!("Add a resolution rule for `{}`", dependency))
            .with_suggestion(format!(
                "Or list `{}` as an extra dependency to inscribe it verbatim",
                dependency
            )),

            ResolveError::InvalidDistributionState { reason } => {
                Diagnostic::error("invalid distribution state")
                    .with_context(reason.clone())
                    .with_suggestion(
                        "Set `[distribution] name` once, in Distribution.toml or with --distro",
                    )
            }

            ResolveError::InvalidUnitName { name } => {
                Diagnostic::error(format!("invalid unit name `{}`", name)).with_suggestion(
                    "Unit names start with a letter and contain only letters, digits and underscores",
                )
            }

            ResolveError::InvalidVersion {
                unit,
                version,
                reason,
            } => Diagnostic::error(format!("invalid version `{}` for `{}`", version, unit))
                .with_context(reason.clone())
                .with_suggestion("Use a semantic version such as `1.2.0`"),

            ResolveError::UnitKindMismatch {
                unit,
                expected,
                found,
            } => Diagnostic::error(format!("`{}` is a {}, not a {}", unit, found, expected)),

            ResolveError::DependencyCycle { units } => {
                Diagnostic::error("cycle detected between internal build dependencies")
                    .with_context(format!("cycle: {}", units.join(" -> ")))
                    .with_suggestion(
                        "Break the cycle by removing or restructuring dependencies",
                    )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_build_dependency_diagnostic() {
        let err = ResolveError::MetaBuildDependency {
            unit: "nav_stack".to_string(),
            dependencies: vec!["roscpp".to_string(), "tf".to_string()],
        };

        let output = err.to_diagnostic().format(false);

        assert!(output.contains("meta unit `nav_stack`"));
        assert!(output.contains("roscpp, tf"));
        assert!(output.contains("run dependencies"));
    }

    #[test]
    fn test_external_not_found_names_unit_and_dependency() {
        let err = ResolveError::ExternalDependencyNotFound {
            unit: "nav_core".to_string(),
            dependency: "boost_system".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "could not find dependency `boost_system` of `nav_core` on the host"
        );
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("manifold doctor"));
    }

    #[test]
    fn test_duplicate_unit_message() {
        let err = ResolveError::DuplicateUnit {
            name: "nav_core".to_string(),
            existing_kind: UnitKind::Stack,
        };
        assert_eq!(err.to_string(), "unit `nav_core` is already declared as a stack");
    }

    #[test]
    fn test_cycle_diagnostic() {
        let err = ResolveError::DependencyCycle {
            units: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert!(err.to_diagnostic().format(false).contains("cycle: a -> b -> a"));
    }
}
