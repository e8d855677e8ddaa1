//! Schema descriptors for operation arguments.
//!
//! A descriptor is pure data: the ordered list of declared arguments, each with
//! a kind from a closed set, a required flag and an optional default. It can
//! render itself as a JSON Schema object for tool discovery and as MCP prompt
//! arguments for prompt discovery.

use rmcp::model::{JsonObject, PromptArgument};
use serde_json::{Value, json};

use super::error::DispatchError;

/// The closed set of argument kinds.
///
/// Adding a kind means touching the validator and the schema renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgKind {
    /// Any JSON string.
    String,

    /// Any JSON number, read as `f64`.
    Number,

    /// A string restricted to a non-empty closed set.
    Enum(Vec<String>),
}

impl ArgKind {
    /// Build an enum kind from a list of allowed values.
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(values.into_iter().map(Into::into).collect())
    }

    /// Human label used in validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Enum(_) => "string",
        }
    }
}

/// A validated, typed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Number(f64),
    Choice(String),
}

impl ArgValue {
    /// JSON representation (used for schema defaults).
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) | Self::Choice(s) => Value::String(s.clone()),
            Self::Number(n) => json!(n),
        }
    }

    fn matches(&self, kind: &ArgKind) -> bool {
        match (self, kind) {
            (Self::Text(_), ArgKind::String) => true,
            (Self::Number(n), ArgKind::Number) => n.is_finite(),
            (Self::Choice(v), ArgKind::Enum(allowed)) => allowed.contains(v),
            _ => false,
        }
    }
}

/// One declared argument.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: ArgKind,
    pub description: Option<String>,
    pub required: bool,
    pub default: Option<ArgValue>,
}

/// The declared argument shape of one operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDescriptor {
    fields: Vec<FieldSpec>,
}

impl SchemaDescriptor {
    /// A descriptor with no arguments (resources).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start building a descriptor.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Render as a JSON Schema object for `tools/list`.
    pub fn to_json_schema(&self) -> JsonObject {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let mut prop = serde_json::Map::new();
            match &field.kind {
                ArgKind::String => {
                    prop.insert("type".into(), json!("string"));
                }
                ArgKind::Number => {
                    prop.insert("type".into(), json!("number"));
                }
                ArgKind::Enum(values) => {
                    prop.insert("type".into(), json!("string"));
                    prop.insert("enum".into(), json!(values));
                }
            }
            if let Some(description) = &field.description {
                prop.insert("description".into(), json!(description));
            }
            if let Some(default) = &field.default {
                prop.insert("default".into(), default.to_json());
            }
            if field.required {
                required.push(Value::String(field.name.clone()));
            }
            properties.insert(field.name.clone(), Value::Object(prop));
        }

        let mut schema = serde_json::Map::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), Value::Array(required));
        }
        schema
    }

    /// Render as prompt arguments for `prompts/list`.
    pub fn to_prompt_arguments(&self) -> Vec<PromptArgument> {
        self.fields
            .iter()
            .map(|field| PromptArgument {
                name: field.name.clone(),
                title: None,
                description: field.description.clone(),
                required: Some(field.required),
            })
            .collect()
    }
}

/// Builder for [`SchemaDescriptor`].
///
/// `build()` enforces the descriptor rules: unique field names, non-empty enum
/// sets, and defaults that match their field's kind.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Add a required argument.
    pub fn required(
        mut self,
        name: impl Into<String>,
        kind: ArgKind,
        description: impl Into<String>,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            kind,
            description: Some(description.into()),
            required: true,
            default: None,
        });
        self
    }

    /// Add an optional argument that is left out of the record when absent.
    pub fn optional(
        mut self,
        name: impl Into<String>,
        kind: ArgKind,
        description: impl Into<String>,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            kind,
            description: Some(description.into()),
            required: false,
            default: None,
        });
        self
    }

    /// Add an optional argument with a default value.
    pub fn with_default(
        mut self,
        name: impl Into<String>,
        kind: ArgKind,
        default: ArgValue,
        description: impl Into<String>,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            kind,
            description: Some(description.into()),
            required: false,
            default: Some(default),
        });
        self
    }

    /// Build the descriptor.
    pub fn build(self) -> Result<SchemaDescriptor, DispatchError> {
        for (i, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(DispatchError::invalid_schema("field name must not be empty"));
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(DispatchError::invalid_schema(format!(
                    "field '{}' declared twice",
                    field.name
                )));
            }
            if let ArgKind::Enum(values) = &field.kind {
                if values.is_empty() {
                    return Err(DispatchError::invalid_schema(format!(
                        "enum field '{}' has no allowed values",
                        field.name
                    )));
                }
            }
            if let Some(default) = &field.default {
                if !default.matches(&field.kind) {
                    return Err(DispatchError::invalid_schema(format!(
                        "default for '{}' does not match its kind",
                        field.name
                    )));
                }
            }
        }

        Ok(SchemaDescriptor {
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greeting_schema() -> SchemaDescriptor {
        SchemaDescriptor::builder()
            .required("name", ArgKind::String, "Who to greet")
            .with_default(
                "language",
                ArgKind::one_of(["ko", "en"]),
                ArgValue::Choice("ko".to_string()),
                "Greeting language",
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_json_schema_shape() {
        let schema = greeting_schema().to_json_schema();

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["name"]));
        assert_eq!(schema["properties"]["name"]["type"], "string");
        assert_eq!(schema["properties"]["language"]["enum"], json!(["ko", "en"]));
        assert_eq!(schema["properties"]["language"]["default"], "ko");
    }

    #[test]
    fn test_empty_schema_has_no_required_list() {
        let schema = SchemaDescriptor::empty().to_json_schema();
        assert_eq!(schema["type"], "object");
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn test_prompt_arguments() {
        let args = greeting_schema().to_prompt_arguments();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].name, "name");
        assert_eq!(args[0].required, Some(true));
        assert_eq!(args[1].required, Some(false));
    }

    #[test]
    fn test_rejects_empty_enum() {
        let result = SchemaDescriptor::builder()
            .required("op", ArgKind::Enum(vec![]), "operation")
            .build();
        assert!(matches!(result, Err(DispatchError::InvalidSchema(_))));
    }

    #[test]
    fn test_rejects_default_outside_enum() {
        let result = SchemaDescriptor::builder()
            .with_default(
                "language",
                ArgKind::one_of(["ko", "en"]),
                ArgValue::Choice("fr".to_string()),
                "language",
            )
            .build();
        assert!(matches!(result, Err(DispatchError::InvalidSchema(_))));
    }

    #[test]
    fn test_rejects_duplicate_field() {
        let result = SchemaDescriptor::builder()
            .required("a", ArgKind::Number, "first")
            .required("a", ArgKind::Number, "again")
            .build();
        assert!(matches!(result, Err(DispatchError::InvalidSchema(_))));
    }

    #[test]
    fn test_rejects_mismatched_default_kind() {
        let result = SchemaDescriptor::builder()
            .with_default("n", ArgKind::Number, ArgValue::Text("1".into()), "n")
            .build();
        assert!(result.is_err());
    }
}
