//! Node.js runtime selection for deployments.
//!
//! This crate holds the runtime catalog, the npm-style version range engine,
//! the resolver that picks a runtime for a project, and the configuration
//! and manifest readers that feed it.

pub mod catalog;
pub mod command;
pub mod config;
pub mod constants;
pub mod error;
pub mod manifest;
pub mod range;
pub mod report;
pub mod request;
pub mod resolve;

pub use catalog::{RuntimeCatalog, RuntimeOption};
pub use command::{CommandRef, PrimaryCommand};
pub use config::NodeverConfig;
pub use error::{CatalogError, ResolutionError};
pub use range::{Identifier, RangeError, Version, VersionRange};
pub use request::{RangeRequest, RangeSource};
pub use resolve::{invalid_range, resolve, Advisory, Resolved};
