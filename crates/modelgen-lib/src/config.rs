use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::artifact::PropertyType;
use crate::error::GeneratorError;

/// Seed for one property round in batch mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PropertyConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(default, rename = "itemType", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<PropertyType>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub id: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// The externally supplied configuration document.
///
/// Sourced from a JSON file, an inline JSON literal, or piped standard
/// input; consumed by the resolver as the highest-precedence non-interactive
/// answer source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Per-round property seeds; the only batch driver of the property loop.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyConfig>,
    /// Additional answers applied to every resolution round.
    #[serde(flatten)]
    pub answers: Map<String, Value>,
}

impl GeneratorConfig {
    /// Parses a raw JSON document; a non-object top level is rejected.
    pub fn parse(raw: &str) -> Result<Self, GeneratorError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|err| GeneratorError::Configuration(format!("invalid config JSON: {err}")))?;
        if !value.is_object() {
            return Err(GeneratorError::Configuration(
                "config must be a JSON object".into(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|err| GeneratorError::Configuration(format!("invalid config: {err}")))
    }

    /// Answer-pool seed for the artifact-level questions (name, base).
    pub fn artifact_answers(&self) -> Map<String, Value> {
        let mut map = self.answers.clone();
        if let Some(name) = &self.name {
            map.insert("name".into(), Value::String(name.clone()));
        }
        if let Some(base) = &self.base {
            map.insert("base".into(), Value::String(base.clone()));
        }
        map
    }

    /// Answer-pool seed for property round `round` (zero-based).
    ///
    /// Flat answers apply to every round; the `properties` list supplies the
    /// per-round name and details, and an empty name past its end terminates
    /// the loop. A flat `propName` is dropped — it would re-add the same
    /// property forever.
    pub fn round_answers(&self, round: usize) -> Map<String, Value> {
        let mut map = self.answers.clone();
        map.remove("propName");

        match self.properties.get(round) {
            Some(property) => {
                map.insert("propName".into(), Value::String(property.name.clone()));
                map.insert("type".into(), Value::String(property.kind.to_string()));
                if let Some(item) = property.item_type {
                    map.insert("itemType".into(), Value::String(item.to_string()));
                }
                map.insert("required".into(), Value::Bool(property.required));
                map.insert("id".into(), Value::Bool(property.id));
                if let Some(default) = &property.default {
                    map.insert("default".into(), default.clone());
                }
            }
            None => {
                if !self.properties.is_empty() {
                    map.insert("propName".into(), Value::String(String::new()));
                }
            }
        }

        map
    }
}

/// Process-level flags threaded explicitly through the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorOptions {
    /// Accept defaults for every skippable question.
    pub yes: bool,
    /// Overwrite an existing generated file.
    pub force: bool,
    /// Whether a prompt gateway may be consulted at all.
    pub interactive: bool,
}

/// JSON schema of the configuration document, for external validation.
pub fn config_schema() -> Value {
    serde_json::to_value(schema_for!(GeneratorConfig)).unwrap_or(Value::Null)
}
