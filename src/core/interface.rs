//! Interface definition kinds handled by code-generation helpers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of interface definition file a unit declares for code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    /// Message definitions (`.msg`)
    Message,
    /// Service definitions (`.srv`)
    Service,
    /// Dynamic configuration definitions (`.cfg`)
    Config,
}

impl InterfaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceKind::Message => "message",
            InterfaceKind::Service => "service",
            InterfaceKind::Config => "config",
        }
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
