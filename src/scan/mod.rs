//! Repository content resolution
//!
//! A scan walks the immediate sub-directories of a repository root, treats
//! each one as a component context and decides which devfile and which
//! Dockerfile represent it.

mod engine;
mod layout;
mod request;
mod resolver;
mod result;

pub use engine::ContentResolver;
pub use layout::{context_key, single_context_key};
pub use request::ScanRequest;
pub use result::{
    BuildFileLocation, BuildFileRecord, ContextOutcome, ManifestOrigin, ManifestRecord, PortSet,
    ScanResult,
};
