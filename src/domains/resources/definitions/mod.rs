//! Resource definitions module.
//!
//! Each resource is defined in its own file with:
//! - URI and metadata
//! - A [`Handler`] producing its content
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement `ResourceDefinition` and `Handler`
//! 3. Export it here
//! 4. Register in `registry.rs`

pub mod server_info;

pub use server_info::ServerInfoResource;

use crate::core::dispatch::Handler;

/// Trait for resource definitions.
///
/// Resources take no arguments; they are registered under their URI.
pub trait ResourceDefinition: Handler + 'static {
    /// The unique URI of the resource.
    const URI: &'static str;

    /// The display name of the resource.
    const NAME: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str;
}
