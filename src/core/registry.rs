//! Package registry - the authoritative set of declared units.
//!
//! Units are stored in registration order, which is also the order
//! packaging listings and build graphs report them in.

use std::collections::HashMap;

use crate::core::dependency::Classified;
use crate::core::unit::{Unit, UnitDecl, UnitId, UnitKind};
use crate::resolver::ResolveError;
use crate::util::config::DefaultsConfig;

/// All units declared during one configuration pass.
#[derive(Debug, Clone, Default)]
pub struct PackageRegistry {
    units: Vec<Unit>,
    by_name: HashMap<String, UnitId>,
    defaults: DefaultsConfig,
}

impl PackageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        PackageRegistry::default()
    }

    /// Create a registry that fills missing header fields from config defaults.
    pub fn with_defaults(defaults: DefaultsConfig) -> Self {
        PackageRegistry {
            defaults,
            ..Default::default()
        }
    }

    /// Register a unit. A name may be registered at most once.
    pub fn register(&mut self, kind: UnitKind, decl: UnitDecl) -> Result<UnitId, ResolveError> {
        if let Some(&existing) = self.by_name.get(&decl.name) {
            return Err(ResolveError::DuplicateUnit {
                name: decl.name,
                existing_kind: self.units[existing.index()].kind(),
            });
        }

        let id = UnitId::new(self.units.len());
        let unit = Unit::from_decl(id, kind, decl, &self.defaults)?;
        tracing::debug!("registered {} `{}`", unit.kind(), unit.name());

        self.by_name.insert(unit.name().to_string(), id);
        self.units.push(unit);
        Ok(id)
    }

    /// Look up a unit by name.
    pub fn get(&self, name: &str) -> Result<&Unit, ResolveError> {
        self.lookup(name)
            .map(|id| &self.units[id.index()])
            .ok_or_else(|| ResolveError::UndefinedUnit {
                name: name.to_string(),
            })
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Unit, ResolveError> {
        match self.lookup(name) {
            Some(id) => Ok(&mut self.units[id.index()]),
            None => Err(ResolveError::UndefinedUnit {
                name: name.to_string(),
            }),
        }
    }

    /// Handle for a registered name.
    pub fn lookup(&self, name: &str) -> Option<UnitId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Unit behind a handle issued by this registry.
    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.index()]
    }

    pub fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        &mut self.units[id.index()]
    }

    /// Classify a dependency name. Registered units always win.
    pub fn classify(&self, name: &str) -> Classified {
        match self.lookup(name) {
            Some(id) => Classified::Internal(id),
            None => Classified::External(name.to_string()),
        }
    }

    /// Units in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    /// Unit names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(Unit::name)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
