//! Argument validation.
//!
//! Turns a raw JSON argument map into an [`ArgumentRecord`] according to a
//! [`SchemaDescriptor`]. Every problem is collected before failing. Fields the
//! schema does not declare are ignored, and JSON `null` counts as absent.

use std::collections::HashMap;

use rmcp::model::JsonObject;
use serde_json::Value;

use super::error::{DispatchError, FieldIssue, FieldProblem, ValidationError};
use super::schema::{ArgKind, ArgValue, SchemaDescriptor};

/// Validated, defaulted arguments for one invocation.
///
/// Only the validator constructs records. Handlers read them through the typed
/// accessors, which report a missing or mistyped field as an internal error
/// since validation already guaranteed the shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentRecord {
    values: HashMap<String, ArgValue>,
}

impl ArgumentRecord {
    /// Whether a value is present (given or defaulted).
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read a string argument.
    pub fn text(&self, name: &str) -> Result<&str, DispatchError> {
        match self.values.get(name) {
            Some(ArgValue::Text(s)) => Ok(s),
            other => Err(Self::shape_error(name, "string", other)),
        }
    }

    /// Read an optional string argument.
    pub fn optional_text(&self, name: &str) -> Result<Option<&str>, DispatchError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(ArgValue::Text(s)) => Ok(Some(s)),
            other => Err(Self::shape_error(name, "string", other)),
        }
    }

    /// Read a number argument.
    pub fn number(&self, name: &str) -> Result<f64, DispatchError> {
        match self.values.get(name) {
            Some(ArgValue::Number(n)) => Ok(*n),
            other => Err(Self::shape_error(name, "number", other)),
        }
    }

    /// Read an enum argument.
    pub fn choice(&self, name: &str) -> Result<&str, DispatchError> {
        match self.values.get(name) {
            Some(ArgValue::Choice(s)) => Ok(s),
            other => Err(Self::shape_error(name, "enum value", other)),
        }
    }

    /// Flatten to string values (prompt template rendering).
    pub fn to_string_map(&self) -> HashMap<String, String> {
        self.values
            .iter()
            .map(|(k, v)| {
                let s = match v {
                    ArgValue::Text(s) | ArgValue::Choice(s) => s.clone(),
                    ArgValue::Number(n) => n.to_string(),
                };
                (k.clone(), s)
            })
            .collect()
    }

    fn shape_error(name: &str, expected: &str, found: Option<&ArgValue>) -> DispatchError {
        match found {
            None => DispatchError::internal(format!("argument '{}' missing from record", name)),
            Some(_) => DispatchError::internal(format!("argument '{}' is not a {}", name, expected)),
        }
    }
}

/// Validate raw arguments against a schema.
pub fn validate(
    schema: &SchemaDescriptor,
    raw: &JsonObject,
) -> Result<ArgumentRecord, ValidationError> {
    let mut values = HashMap::new();
    let mut issues = Vec::new();

    for field in schema.fields() {
        let supplied = raw.get(&field.name).filter(|v| !v.is_null());

        match supplied {
            Some(value) => match coerce(value, &field.kind) {
                Ok(v) => {
                    values.insert(field.name.clone(), v);
                }
                Err(problem) => issues.push(FieldIssue {
                    field: field.name.clone(),
                    problem,
                }),
            },
            None if field.required => issues.push(FieldIssue {
                field: field.name.clone(),
                problem: FieldProblem::Missing,
            }),
            None => {
                if let Some(default) = &field.default {
                    values.insert(field.name.clone(), default.clone());
                }
            }
        }
    }

    if issues.is_empty() {
        Ok(ArgumentRecord { values })
    } else {
        Err(ValidationError::new(issues))
    }
}

fn coerce(value: &Value, kind: &ArgKind) -> Result<ArgValue, FieldProblem> {
    match kind {
        ArgKind::String => value
            .as_str()
            .map(|s| ArgValue::Text(s.to_string()))
            .ok_or(FieldProblem::WrongKind {
                expected: kind.label(),
            }),
        ArgKind::Number => value
            .as_f64()
            .filter(|n| n.is_finite())
            .map(ArgValue::Number)
            .ok_or(FieldProblem::WrongKind {
                expected: kind.label(),
            }),
        ArgKind::Enum(allowed) => match value.as_str() {
            Some(s) if allowed.iter().any(|a| a == s) => Ok(ArgValue::Choice(s.to_string())),
            _ => Err(FieldProblem::NotAllowed {
                allowed: allowed.clone(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn calculator_schema() -> SchemaDescriptor {
        SchemaDescriptor::builder()
            .required(
                "operation",
                ArgKind::one_of(["add", "subtract", "multiply", "divide"]),
                "operation",
            )
            .required("a", ArgKind::Number, "first operand")
            .required("b", ArgKind::Number, "second operand")
            .build()
            .unwrap()
    }

    fn greeting_schema() -> SchemaDescriptor {
        SchemaDescriptor::builder()
            .required("name", ArgKind::String, "name")
            .with_default(
                "language",
                ArgKind::one_of(["ko", "en"]),
                ArgValue::Choice("ko".to_string()),
                "language",
            )
            .optional("nickname", ArgKind::String, "nickname")
            .build()
            .unwrap()
    }

    fn args(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_arguments() {
        let record = validate(
            &calculator_schema(),
            &args(json!({"operation": "add", "a": 2, "b": 3.5})),
        )
        .unwrap();

        assert_eq!(record.choice("operation").unwrap(), "add");
        assert_eq!(record.number("a").unwrap(), 2.0);
        assert_eq!(record.number("b").unwrap(), 3.5);
    }

    #[test]
    fn test_default_is_substituted() {
        let record = validate(&greeting_schema(), &args(json!({"name": "Kim"}))).unwrap();

        assert_eq!(record.text("name").unwrap(), "Kim");
        assert_eq!(record.choice("language").unwrap(), "ko");
        assert!(!record.contains("nickname"));
        assert_eq!(record.optional_text("nickname").unwrap(), None);
    }

    #[test]
    fn test_null_counts_as_absent() {
        let record = validate(
            &greeting_schema(),
            &args(json!({"name": "Kim", "language": null})),
        )
        .unwrap();
        assert_eq!(record.choice("language").unwrap(), "ko");
    }

    #[test]
    fn test_undeclared_fields_are_ignored() {
        let record = validate(
            &greeting_schema(),
            &args(json!({"name": "Kim", "extra": true})),
        )
        .unwrap();
        assert!(!record.contains("extra"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_reports_every_offending_field() {
        let err = validate(
            &calculator_schema(),
            &args(json!({"operation": "modulo", "a": "ten"})),
        )
        .unwrap_err();

        assert_eq!(err.fields(), vec!["operation", "a", "b"]);
        assert_eq!(
            err.issues()[0].problem,
            FieldProblem::NotAllowed {
                allowed: vec![
                    "add".to_string(),
                    "subtract".to_string(),
                    "multiply".to_string(),
                    "divide".to_string()
                ]
            }
        );
        assert_eq!(
            err.issues()[1].problem,
            FieldProblem::WrongKind { expected: "number" }
        );
        assert_eq!(err.issues()[2].problem, FieldProblem::Missing);
    }

    #[test]
    fn test_enum_rejects_non_string() {
        let err = validate(&greeting_schema(), &args(json!({"name": "Kim", "language": 1})))
            .unwrap_err();
        assert_eq!(err.fields(), vec!["language"]);
    }

    #[test]
    fn test_string_rejects_number() {
        let err = validate(&greeting_schema(), &args(json!({"name": 42}))).unwrap_err();
        assert_eq!(
            err.issues()[0].problem,
            FieldProblem::WrongKind { expected: "string" }
        );
    }

    #[test]
    fn test_empty_schema_accepts_anything() {
        let record = validate(&SchemaDescriptor::empty(), &args(json!({"x": 1}))).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_accessor_kind_mismatch_is_internal() {
        let record = validate(&greeting_schema(), &args(json!({"name": "Kim"}))).unwrap();
        assert!(matches!(
            record.number("name"),
            Err(DispatchError::Internal(_))
        ));
        assert!(matches!(
            record.text("missing"),
            Err(DispatchError::Internal(_))
        ));
    }
}
