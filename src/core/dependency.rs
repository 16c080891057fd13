//! Dependency classification types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::unit::UnitId;

/// When a dependency is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Needed to compile and link the unit.
    Build,
    /// Needed when the unit is used.
    Run,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyKind::Build => write!(f, "build"),
            DependencyKind::Run => write!(f, "run"),
        }
    }
}

/// Result of classifying one dependency name.
///
/// Produced once per name by the registry; consumers match on it instead
/// of re-testing registry membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// Another unit registered in this pass.
    Internal(UnitId),
    /// Something the host is expected to provide.
    External(String),
}

/// Which classifications a dependency call accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DependencyFilter {
    #[default]
    All,
    /// Names that are not registered units are skipped.
    InternalOnly,
    /// Names that are registered units are skipped.
    ExternalOnly,
}

impl DependencyFilter {
    pub fn accepts(&self, classified: &Classified) -> bool {
        match (self, classified) {
            (DependencyFilter::All, _) => true,
            (DependencyFilter::InternalOnly, Classified::Internal(_)) => true,
            (DependencyFilter::ExternalOnly, Classified::External(_)) => true,
            _ => false,
        }
    }
}

/// Options for a dependency declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DependencyOptions {
    pub filter: DependencyFilter,

    /// A failed host discovery skips the dependency instead of failing.
    pub optional: bool,
}

impl DependencyOptions {
    pub fn internal_only() -> Self {
        DependencyOptions {
            filter: DependencyFilter::InternalOnly,
            ..Default::default()
        }
    }

    pub fn external_only() -> Self {
        DependencyOptions {
            filter: DependencyFilter::ExternalOnly,
            ..Default::default()
        }
    }

    /// Mark discovery failures as advisory.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}
