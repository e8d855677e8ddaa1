//! Operation registry.
//!
//! Maps `(kind, name)` to a registered entry. Registration happens once at
//! startup; after that the registry is shared read-only behind an `Arc`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::DispatchError;
use super::handler::Handler;
use super::schema::SchemaDescriptor;

/// The three kinds of registered operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Tool,
    Resource,
    Prompt,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Tool => "tool",
            Self::Resource => "resource",
            Self::Prompt => "prompt",
        };
        f.write_str(s)
    }
}

/// One registered operation.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Unique name within its kind. Resources use their URI.
    pub name: String,
    pub kind: OperationKind,
    /// Display name (resources).
    pub title: Option<String>,
    pub description: String,
    /// Content MIME type (resources).
    pub mime_type: Option<String>,
    pub schema: SchemaDescriptor,
    pub handler: Arc<dyn Handler>,
}

impl RegistryEntry {
    /// Create an entry with no title or MIME type.
    pub fn new(
        kind: OperationKind,
        name: impl Into<String>,
        description: impl Into<String>,
        schema: SchemaDescriptor,
        handler: Arc<dyn Handler>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            title: None,
            description: description.into(),
            mime_type: None,
            schema,
            handler,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Append-only registry of tools, resources and prompts.
#[derive(Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    index: HashMap<(OperationKind, String), usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry. Fails if the name is taken for that kind.
    pub fn register(&mut self, entry: RegistryEntry) -> Result<(), DispatchError> {
        let key = (entry.kind, entry.name.clone());
        if self.index.contains_key(&key) {
            return Err(DispatchError::duplicate(entry.kind, entry.name));
        }

        info!("Registering {}: {}", entry.kind, entry.name);
        self.index.insert(key, self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Find an entry by kind and name.
    pub fn lookup(&self, kind: OperationKind, name: &str) -> Result<&RegistryEntry, DispatchError> {
        self.index
            .get(&(kind, name.to_string()))
            .map(|&i| &self.entries[i])
            .ok_or_else(|| DispatchError::unknown(kind, name))
    }

    /// Entries of one kind, in registration order.
    ///
    /// Call again to restart the enumeration.
    pub fn entries(&self, kind: OperationKind) -> impl Iterator<Item = &RegistryEntry> + '_ {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// Names of one kind, in registration order.
    pub fn names(&self, kind: OperationKind) -> Vec<&str> {
        self.entries(kind).map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
