//! Declarative argument shapes for tools
//!
//! Every tool declares its argument shape once as an [`ArgSpec`]; the
//! dispatcher runs the one generic validator here before any handler is
//! invoked. Handlers can therefore deserialize their parameter structs
//! without re-checking presence or primitive types.

use serde_json::Value;

/// Primitive type of a tool argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Bool,
    /// Array of strings
    StringArray,
    /// Any JSON object
    Object,
}

impl FieldKind {
    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Bool => value.is_boolean(),
            FieldKind::StringArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            FieldKind::Object => value.is_object(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Bool => "boolean",
            FieldKind::StringArray => "array of strings",
            FieldKind::Object => "object",
        }
    }
}

/// One declared argument
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl Field {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Declared argument shape of one tool
#[derive(Debug, Clone, Copy)]
pub struct ArgSpec {
    pub fields: &'static [Field],
}

impl ArgSpec {
    pub const EMPTY: ArgSpec = ArgSpec { fields: &[] };

    pub const fn new(fields: &'static [Field]) -> Self {
        Self { fields }
    }

    /// Validate an argument bag against this shape.
    ///
    /// Required fields must be present with the declared primitive type;
    /// optional fields are type-checked only when present. Unknown extra
    /// fields pass through untouched.
    pub fn validate(&self, arguments: &Value) -> Result<(), String> {
        let object = match arguments {
            Value::Object(map) => map,
            // An omitted bag is fine for tools without required fields.
            Value::Null => {
                return if self.fields.iter().any(|f| f.required) {
                    Err("missing arguments object".to_string())
                } else {
                    Ok(())
                };
            }
            other => return Err(format!("arguments must be an object, got {}", type_name(other))),
        };

        for field in self.fields {
            match object.get(field.name) {
                Some(value) if value.is_null() && !field.required => {}
                Some(value) => {
                    if !field.kind.matches(value) {
                        return Err(format!(
                            "field '{}' must be a {}, got {}",
                            field.name,
                            field.kind.name(),
                            type_name(value)
                        ));
                    }
                }
                None if field.required => {
                    return Err(format!("missing required field '{}'", field.name));
                }
                None => {}
            }
        }

        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
