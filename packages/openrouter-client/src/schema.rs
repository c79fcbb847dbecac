//! JSON schemas for strict structured output, derived from Rust types.
//!
//! ```rust,ignore
//! #[derive(Deserialize, JsonSchema)]
//! struct Filing {
//!     company_name: String,
//!     fiscal_year: i32,
//! }
//!
//! let schema = Filing::strict_schema();
//! ```

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Types that can be requested as strict `json_schema` structured output.
///
/// Blanket-implemented for anything that is `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Schema in the shape strict mode accepts: every object closed with
    /// `additionalProperties: false`, every property listed in `required`,
    /// no `$ref`s, and no integer `format` annotations.
    fn strict_schema() -> Value {
        let root = schema_for!(Self);
        let mut value = serde_json::to_value(root).unwrap_or_default();

        let definitions = match &mut value {
            Value::Object(map) => {
                map.remove("$schema");
                map.remove("definitions")
            }
            _ => None,
        };

        if let Some(defs) = definitions {
            inline_refs(&mut value, &defs);
        }
        close_objects(&mut value);

        value
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

fn inline_refs(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
                .cloned();

            if let Some(def) = target {
                *value = def;
                inline_refs(value, definitions);
                return;
            }

            for (_, v) in map.iter_mut() {
                inline_refs(v, definitions);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}

fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if is_object_schema(map) {
                map.insert("additionalProperties".into(), Value::Bool(false));
                let required: Option<Vec<Value>> = match map.get("properties") {
                    Some(Value::Object(props)) => {
                        Some(props.keys().cloned().map(Value::String).collect())
                    }
                    _ => None,
                };
                if let Some(required) = required {
                    map.insert("required".into(), Value::Array(required));
                }
            }

            // schemars emits "int32"/"uint8"/"double" formats, which strict mode rejects
            if map.get("format").and_then(Value::as_str).is_some() {
                map.remove("format");
            }

            for (_, v) in map.iter_mut() {
                close_objects(v);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                close_objects(item);
            }
        }
        _ => {}
    }
}

fn is_object_schema(map: &Map<String, Value>) -> bool {
    match map.get("type") {
        Some(Value::String(t)) => t == "object",
        Some(Value::Array(types)) => types.iter().any(|t| t == "object"),
        _ => false,
    }
}
