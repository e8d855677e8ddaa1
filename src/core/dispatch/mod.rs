//! Operation registry and invocation dispatcher.
//!
//! - `schema.rs` - Declarative argument descriptors
//! - `validator.rs` - Raw arguments to typed [`ArgumentRecord`]s
//! - `handler.rs` - The shared [`Handler`] capability
//! - `registry.rs` - Name to entry mapping for tools, resources and prompts
//! - `dispatcher.rs` - Lookup, validation, guarded execution, normalization
//! - `envelope.rs` - Response envelopes and content blocks
//! - `error.rs` - Dispatch error taxonomy

mod dispatcher;
mod envelope;
mod error;
mod handler;
mod registry;
mod schema;
mod validator;

pub use dispatcher::Dispatcher;
pub use envelope::{Audience, BlockAnnotations, ContentBlock, ResponseEnvelope};
pub use error::{DispatchError, FieldIssue, FieldProblem, ValidationError};
pub use handler::{Handler, HandlerOutput};
pub use registry::{OperationKind, Registry, RegistryEntry};
pub use schema::{ArgKind, ArgValue, FieldSpec, SchemaBuilder, SchemaDescriptor};
pub use validator::{ArgumentRecord, validate};
