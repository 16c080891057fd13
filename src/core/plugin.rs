//! Plugin declarations.
//!
//! A unit may export plugins: an entry in its manifest's export envelope
//! pointing at a plugin manifest file, plus the plugin manifest itself
//! listing the classes the library provides.

use serde::{Deserialize, Serialize};

/// One class exported by a plugin library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginClass {
    /// Lookup name, conventionally `unit/ClassName`
    pub name: String,

    /// Fully qualified type, e.g. `nav_core::Planner`
    #[serde(rename = "type")]
    pub type_name: String,

    /// Fully qualified base class type
    pub base_class_type: String,

    #[serde(default)]
    pub description: String,
}

/// A plugin export made by a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDecl {
    /// Export tag; names the unit that defines the plugin base class
    #[serde(rename = "type")]
    pub export_tag: String,

    /// Library path recorded in the plugin manifest
    pub library: String,

    /// Plugin manifest file name, relative to the unit
    pub file: String,

    #[serde(default, rename = "class")]
    pub classes: Vec<PluginClass>,
}

impl PluginDecl {
    pub fn new(
        export_tag: impl Into<String>,
        library: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        PluginDecl {
            export_tag: export_tag.into(),
            library: library.into(),
            file: file.into(),
            classes: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: PluginClass) -> Self {
        self.classes.push(class);
        self
    }
}

impl PluginClass {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        base_class_type: impl Into<String>,
    ) -> Self {
        PluginClass {
            name: name.into(),
            type_name: type_name.into(),
            base_class_type: base_class_type.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
