//! Manifest schema generations and distribution descriptors.
//!
//! A distribution is either *legacy* (stacks containing packages, attribute
//! style `<depend package="..."/>`) or *modern* (flat packages, optionally
//! meta, with nested `<build_depend>`/`<run_depend>` elements). The
//! generation is chosen once per configuration pass and never changes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::resolver::ResolveError;

/// First distribution that uses the modern flat schema.
///
/// Distribution names are alphabetical, so a lexical comparison orders them.
pub const MODERN_THRESHOLD: &str = "groovy";

/// A manifest schema generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    /// Two-tier: stacks containing packages.
    Legacy,
    /// Flat: packages, some of which are meta-packages.
    Modern,
}

impl Generation {
    /// Generation used by a distribution name.
    pub fn for_distribution(name: &str) -> Generation {
        if name.to_ascii_lowercase().as_str() >= MODERN_THRESHOLD {
            Generation::Modern
        } else {
            Generation::Legacy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Generation::Legacy => "legacy",
            Generation::Modern => "modern",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Generation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(Generation::Legacy),
            "modern" => Ok(Generation::Modern),
            _ => Err(format!(
                "invalid generation '{}'; expected 'legacy' or 'modern'",
                s
            )),
        }
    }
}

/// Externally supplied description of the target distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionDescriptor {
    name: String,
    forced: Option<Generation>,
}

impl DistributionDescriptor {
    /// Create a descriptor from a distribution name.
    pub fn new(name: impl Into<String>) -> Result<Self, ResolveError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ResolveError::InvalidDistributionState {
                reason: format!("`{}` is not a valid distribution name", name),
            });
        }

        Ok(DistributionDescriptor {
            name: trimmed.to_ascii_lowercase(),
            forced: None,
        })
    }

    /// Pin the generation regardless of the distribution name.
    pub fn with_generation(mut self, generation: Generation) -> Self {
        self.forced = Some(generation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The generation this descriptor selects.
    pub fn generation(&self) -> Generation {
        self.forced
            .unwrap_or_else(|| Generation::for_distribution(&self.name))
    }
}

impl fmt::Display for DistributionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.generation())
    }
}

/// Holds the distribution information for one pass and fixes the generation
/// the first time it is needed.
#[derive(Debug, Clone, Default)]
pub struct GenerationSelector {
    descriptor: Option<DistributionDescriptor>,
    selected: Option<Generation>,
}

impl GenerationSelector {
    pub fn new(descriptor: Option<DistributionDescriptor>) -> Self {
        GenerationSelector {
            descriptor,
            selected: None,
        }
    }

    /// Record distribution information.
    ///
    /// Before selection the latest descriptor wins. After selection, any
    /// descriptor that disagrees with the one in force is fatal.
    pub fn observe(&mut self, descriptor: DistributionDescriptor) -> Result<(), ResolveError> {
        match (&self.descriptor, self.selected) {
            (Some(current), Some(selected)) => {
                if current.name() != descriptor.name() || selected != descriptor.generation() {
                    return Err(ResolveError::InvalidDistributionState {
                        reason: format!(
                            "generation already fixed by distribution {}, cannot switch to {}",
                            current, descriptor
                        ),
                    });
                }
                Ok(())
            }
            _ => {
                self.descriptor = Some(descriptor);
                Ok(())
            }
        }
    }

    /// Select the generation, fixing it on first call.
    pub fn select(&mut self) -> Result<Generation, ResolveError> {
        if let Some(generation) = self.selected {
            return Ok(generation);
        }

        let descriptor =
            self.descriptor
                .as_ref()
                .ok_or_else(|| ResolveError::InvalidDistributionState {
                    reason: "no distribution descriptor was supplied".to_string(),
                })?;

        let generation = descriptor.generation();
        tracing::debug!("selected {} schema for distribution {}", generation, descriptor.name());
        self.selected = Some(generation);
        Ok(generation)
    }

    /// The generation, if it has been selected.
    pub fn selected(&self) -> Option<Generation> {
        self.selected
    }

    pub fn descriptor(&self) -> Option<&DistributionDescriptor> {
        self.descriptor.as_ref()
    }
}
