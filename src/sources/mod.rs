//! Host lookups.
//!
//! External dependencies are discovered and mapped to host packages through
//! the [`HostTools`] collaborator; [`ExternalResolver`] memoizes the answers.

pub mod external;
pub mod tools;

pub use external::{Discovery, ExternalResolver};
pub use tools::{HostTools, LinkFlags, SystemTools};
