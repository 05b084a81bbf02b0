use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::naming::to_class_name;

/// Closed set of property types understood by the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Date,
    Buffer,
    Any,
}

impl PropertyType {
    pub const ALL: [PropertyType; 8] = [
        PropertyType::String,
        PropertyType::Number,
        PropertyType::Boolean,
        PropertyType::Object,
        PropertyType::Array,
        PropertyType::Date,
        PropertyType::Buffer,
        PropertyType::Any,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Number => "number",
            PropertyType::Boolean => "boolean",
            PropertyType::Object => "object",
            PropertyType::Array => "array",
            PropertyType::Date => "date",
            PropertyType::Buffer => "buffer",
            PropertyType::Any => "any",
        }
    }

    /// Types selectable as array item types.
    pub fn item_candidates() -> impl Iterator<Item = PropertyType> {
        Self::ALL
            .into_iter()
            .filter(|kind| *kind != PropertyType::Array)
    }

    /// Types whose default values are emitted quoted.
    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            PropertyType::String | PropertyType::Any | PropertyType::Date
        )
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "string" => Ok(PropertyType::String),
            "number" => Ok(PropertyType::Number),
            "boolean" | "bool" => Ok(PropertyType::Boolean),
            "object" => Ok(PropertyType::Object),
            "array" => Ok(PropertyType::Array),
            "date" => Ok(PropertyType::Date),
            "buffer" => Ok(PropertyType::Buffer),
            "any" => Ok(PropertyType::Any),
            _ => Err(format!("unknown property type '{value}'")),
        }
    }
}

/// One property of the artifact under construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PropertySpec {
    #[serde(rename = "type")]
    pub kind: PropertyType,
    /// Only meaningful when the kind is array.
    #[serde(default, rename = "itemType", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<PropertyType>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub id: bool,
    #[serde(default, rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl PropertySpec {
    pub fn new(kind: PropertyType) -> Self {
        Self {
            kind,
            item_type: None,
            required: false,
            id: false,
            default_value: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.item_type.is_some() && self.kind != PropertyType::Array {
            return Err("itemType is only meaningful for array properties".into());
        }
        Ok(())
    }
}

/// The accumulating description of the artifact being generated.
///
/// Property insertion order is declaration order; inserting under an
/// existing name overwrites in place. Immutable once handed to emission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArtifactRecord {
    pub name: String,
    pub class_name: String,
    pub base: String,
    pub properties: IndexMap<String, PropertySpec>,
    pub settings: Map<String, Value>,
}

impl ArtifactRecord {
    pub fn new(name: &str, base: &str) -> Self {
        Self {
            name: name.to_string(),
            class_name: to_class_name(name),
            base: base.to_string(),
            properties: IndexMap::new(),
            settings: Map::new(),
        }
    }

    /// Inserts a property, overwriting any previous entry under the same
    /// name in place. When the new property carries the id flag, an earlier
    /// id holder loses it (last write wins) and its name is returned so the
    /// caller can surface the switch.
    pub fn insert_property(&mut self, name: &str, property: PropertySpec) -> Option<String> {
        let mut displaced = None;
        if property.id {
            for (existing_name, existing) in self.properties.iter_mut() {
                if existing.id && existing_name != name {
                    existing.id = false;
                    displaced = Some(existing_name.clone());
                }
            }
        }
        self.properties.insert(name.to_string(), property);
        displaced
    }

    pub fn has_id_property(&self) -> bool {
        self.properties.values().any(|property| property.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn property_type_round_trips_through_strings() {
        for kind in PropertyType::ALL {
            assert_eq!(kind.as_str().parse::<PropertyType>(), Ok(kind));
        }
        assert!("geopoint".parse::<PropertyType>().is_err());
    }

    #[test]
    fn item_type_requires_an_array() {
        let mut property = PropertySpec::new(PropertyType::String);
        property.item_type = Some(PropertyType::Number);
        assert!(property.validate().is_err());

        property.kind = PropertyType::Array;
        assert!(property.validate().is_ok());
    }

    #[test]
    fn insert_keeps_declaration_order_and_overwrites_in_place() {
        let mut record = ArtifactRecord::new("order", "Entity");
        record.insert_property("total", PropertySpec::new(PropertyType::Number));
        record.insert_property("note", PropertySpec::new(PropertyType::String));
        record.insert_property("total", PropertySpec::new(PropertyType::String));

        let names: Vec<&String> = record.properties.keys().collect();
        assert_eq!(names, ["total", "note"]);
        assert_eq!(record.properties["total"].kind, PropertyType::String);
    }

    #[test]
    fn a_later_id_property_displaces_the_earlier_one() {
        let mut record = ArtifactRecord::new("order", "Entity");
        let mut first = PropertySpec::new(PropertyType::Number);
        first.id = true;
        assert_eq!(record.insert_property("orderId", first), None);

        let mut second = PropertySpec::new(PropertyType::String);
        second.id = true;
        let displaced = record.insert_property("sku", second);

        assert_eq!(displaced.as_deref(), Some("orderId"));
        let ids: Vec<&String> = record
            .properties
            .iter()
            .filter(|(_, property)| property.id)
            .map(|(name, _)| name)
            .collect();
        assert_eq!(ids, ["sku"]);
    }

    #[test]
    fn record_serializes_with_renamed_fields() {
        let mut record = ArtifactRecord::new("order", "Entity");
        let mut property = PropertySpec::new(PropertyType::Array);
        property.item_type = Some(PropertyType::String);
        property.default_value = Some(json!(["a"]));
        record.insert_property("tags", property);

        let value = serde_json::to_value(&record).expect("serializes");
        assert_eq!(value["properties"]["tags"]["type"], "array");
        assert_eq!(value["properties"]["tags"]["itemType"], "string");
        assert_eq!(value["properties"]["tags"]["default"], json!(["a"]));
    }
}
