//! Units - the distributable entities a configuration pass tracks.
//!
//! A unit is either a package or a legacy stack. Stacks and meta-packages
//! aggregate other units through run dependencies only.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::interface::InterfaceKind;
use crate::core::plugin::PluginDecl;
use crate::manifest::ManifestHandle;
use crate::resolver::ResolveError;
use crate::util::config::DefaultsConfig;
use crate::util::OrderedSet;

static UNIT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid unit name regex"));

/// Default license written when neither the unit nor the config sets one.
pub const DEFAULT_LICENSE: &str = "BSD";

/// Default maintainer name.
pub const DEFAULT_MAINTAINER: &str = "unknown";

/// Handle to a registered unit. Indexes the registry in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(usize);

impl UnitId {
    pub fn new(index: usize) -> Self {
        UnitId(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Which schema entity a unit is declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Package,
    /// Legacy container of packages.
    Stack,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Package => write!(f, "package"),
            UnitKind::Stack => write!(f, "stack"),
        }
    }
}

/// A maintainer or author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Person {
            name: name.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Input to a unit declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitDecl {
    pub name: String,
    pub meta: bool,
    pub version: Option<String>,
    pub description: Option<String>,
    pub component: Option<String>,
    pub license: Option<String>,
    pub url: Option<String>,
    pub maintainer: Option<Person>,
    pub authors: Vec<String>,
}

impl UnitDecl {
    /// Declaration of an ordinary package.
    pub fn package(name: impl Into<String>) -> Self {
        UnitDecl {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Declaration of a meta-unit (stack or meta-package).
    pub fn meta(name: impl Into<String>) -> Self {
        UnitDecl {
            name: name.into(),
            meta: true,
            ..Default::default()
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn maintainer(mut self, maintainer: Person) -> Self {
        self.maintainer = Some(maintainer);
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }
}

/// A registered unit and everything accumulated for it during the pass.
#[derive(Debug, Clone)]
pub struct Unit {
    pub(crate) id: UnitId,
    pub(crate) name: String,
    pub(crate) kind: UnitKind,
    pub(crate) is_meta: bool,
    pub(crate) component: String,
    pub(crate) description: String,
    pub(crate) version: Version,
    pub(crate) license: String,
    pub(crate) url: Option<String>,
    pub(crate) maintainer: Person,
    pub(crate) authors: Vec<String>,
    pub(crate) manifest_handle: Option<ManifestHandle>,

    pub(crate) internal_build_deps: OrderedSet,
    pub(crate) external_build_deps: OrderedSet,
    pub(crate) internal_run_deps: OrderedSet,
    pub(crate) external_run_deps: OrderedSet,
    pub(crate) extra_build_deps: OrderedSet,
    pub(crate) extra_run_deps: OrderedSet,

    /// What this unit itself provides to dependents.
    pub(crate) exported_include_dirs: OrderedSet,
    pub(crate) exported_libraries: OrderedSet,

    /// Accumulated compile/link environment.
    pub(crate) include_dirs: OrderedSet,
    pub(crate) link_libraries: OrderedSet,
    pub(crate) link_flags: OrderedSet,

    pub(crate) interfaces: Vec<(InterfaceKind, String)>,
    pub(crate) plugins: Vec<PluginDecl>,
}

impl Unit {
    /// Validate a declaration and build a unit with defaults filled in.
    pub(crate) fn from_decl(
        id: UnitId,
        kind: UnitKind,
        decl: UnitDecl,
        defaults: &DefaultsConfig,
    ) -> Result<Unit, ResolveError> {
        if !UNIT_NAME.is_match(&decl.name) {
            return Err(ResolveError::InvalidUnitName { name: decl.name });
        }

        let version = match decl.version.as_deref() {
            Some(raw) => Version::parse(raw).map_err(|e| ResolveError::InvalidVersion {
                unit: decl.name.clone(),
                version: raw.to_string(),
                reason: e.to_string(),
            })?,
            None => Version::new(0, 0, 0),
        };

        let url = decl.url.or_else(|| defaults.url.clone());
        if let Some(ref raw) = url {
            if let Err(e) = Url::parse(raw) {
                tracing::warn!("unit `{}` has an invalid url `{}`: {}", decl.name, raw, e);
            }
        }

        let maintainer = decl.maintainer.unwrap_or_else(|| Person {
            name: defaults
                .maintainer
                .clone()
                .unwrap_or_else(|| DEFAULT_MAINTAINER.to_string()),
            email: defaults.email.clone(),
        });

        let description = decl
            .description
            .unwrap_or_else(|| format!("The {} {}", decl.name, kind));

        Ok(Unit {
            id,
            component: decl.component.unwrap_or_else(|| decl.name.clone()),
            name: decl.name,
            kind,
            is_meta: decl.meta || kind == UnitKind::Stack,
            description,
            version,
            license: decl
                .license
                .or_else(|| defaults.license.clone())
                .unwrap_or_else(|| DEFAULT_LICENSE.to_string()),
            url,
            maintainer,
            authors: decl.authors,
            manifest_handle: None,
            internal_build_deps: OrderedSet::new(),
            external_build_deps: OrderedSet::new(),
            internal_run_deps: OrderedSet::new(),
            external_run_deps: OrderedSet::new(),
            extra_build_deps: OrderedSet::new(),
            extra_run_deps: OrderedSet::new(),
            exported_include_dirs: OrderedSet::new(),
            exported_libraries: OrderedSet::new(),
            include_dirs: OrderedSet::new(),
            link_libraries: OrderedSet::new(),
            link_flags: OrderedSet::new(),
            interfaces: Vec::new(),
            plugins: Vec::new(),
        })
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Meta-units carry run dependencies only.
    pub fn is_meta(&self) -> bool {
        self.is_meta
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn license(&self) -> &str {
        &self.license
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn maintainer(&self) -> &Person {
        &self.maintainer
    }

    /// Authors, falling back to the maintainer when none were given.
    pub fn authors(&self) -> Vec<String> {
        if self.authors.is_empty() {
            vec![self.maintainer.name.clone()]
        } else {
            self.authors.clone()
        }
    }

    pub fn manifest_handle(&self) -> Option<ManifestHandle> {
        self.manifest_handle
    }

    pub fn internal_build_deps(&self) -> &OrderedSet {
        &self.internal_build_deps
    }

    pub fn external_build_deps(&self) -> &OrderedSet {
        &self.external_build_deps
    }

    pub fn internal_run_deps(&self) -> &OrderedSet {
        &self.internal_run_deps
    }

    pub fn external_run_deps(&self) -> &OrderedSet {
        &self.external_run_deps
    }

    pub fn extra_build_deps(&self) -> &OrderedSet {
        &self.extra_build_deps
    }

    pub fn extra_run_deps(&self) -> &OrderedSet {
        &self.extra_run_deps
    }

    pub fn exported_include_dirs(&self) -> &OrderedSet {
        &self.exported_include_dirs
    }

    pub fn exported_libraries(&self) -> &OrderedSet {
        &self.exported_libraries
    }

    pub fn include_dirs(&self) -> &OrderedSet {
        &self.include_dirs
    }

    pub fn link_libraries(&self) -> &OrderedSet {
        &self.link_libraries
    }

    pub fn link_flags(&self) -> &OrderedSet {
        &self.link_flags
    }

    pub fn interfaces(&self) -> &[(InterfaceKind, String)] {
        &self.interfaces
    }

    pub fn plugins(&self) -> &[PluginDecl] {
        &self.plugins
    }
}
