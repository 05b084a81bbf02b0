use std::fs;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::Value;

use crate::artifact::{ArtifactRecord, PropertySpec, PropertyType};
use crate::discover::BUILTIN_BASES;
use crate::error::GeneratorError;
use crate::naming::to_file_name;

const MODEL_TEMPLATE: &str = include_str!("../templates/model.ts.hbs");

/// Property kinds that map straight onto a TypeScript type.
const TS_TYPES: [PropertyType; 5] = [
    PropertyType::String,
    PropertyType::Number,
    PropertyType::Object,
    PropertyType::Boolean,
    PropertyType::Any,
];

/// Template-facing view of one property after type and quoting
/// normalization.
#[derive(Debug, Serialize)]
struct PropertyContext {
    name: String,
    ts_type: String,
    type_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_type: Option<String>,
    required: bool,
    id: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_value: Option<String>,
}

#[derive(Debug, Serialize)]
struct ModelContext {
    class_name: String,
    base_class: String,
    base_is_builtin: bool,
    base_file: String,
    properties: Vec<PropertyContext>,
    required_names: String,
    has_settings: bool,
    settings_json: String,
}

impl ModelContext {
    fn from_record(record: &ArtifactRecord) -> Self {
        let properties: Vec<PropertyContext> = record
            .properties
            .iter()
            .map(|(name, property)| PropertyContext {
                name: name.clone(),
                ts_type: ts_type(property),
                type_tag: format!("'{}'", property.kind),
                item_type: property.item_type.map(|item| format!("'{item}'")),
                required: property.required,
                id: property.id,
                default_value: default_literal(property),
            })
            .collect();

        let required_names = record
            .properties
            .iter()
            .filter(|(_, property)| property.required)
            .map(|(name, _)| format!("'{name}'"))
            .collect::<Vec<_>>()
            .join(", ");

        let base_is_builtin = BUILTIN_BASES.iter().any(|(name, _)| *name == record.base);
        let settings_json = if record.settings.is_empty() {
            String::new()
        } else {
            serde_json::to_string_pretty(&record.settings).unwrap_or_else(|_| "{}".to_string())
        };

        Self {
            class_name: record.class_name.clone(),
            base_class: record.base.clone(),
            base_is_builtin,
            base_file: to_file_name(&record.base),
            properties,
            required_names,
            has_settings: !record.settings.is_empty(),
            settings_json,
        }
    }
}

/// The TypeScript-facing type of a property.
fn ts_type(property: &PropertySpec) -> String {
    match property.kind {
        PropertyType::Array => match property.item_type {
            Some(item) if TS_TYPES.contains(&item) => format!("{item}[]"),
            Some(PropertyType::Buffer) => "Buffer[]".to_string(),
            _ => "string[]".to_string(),
        },
        PropertyType::Buffer => "Buffer".to_string(),
        PropertyType::Date => "string".to_string(),
        other => other.as_str().to_string(),
    }
}

/// The default's source-text representation: quoted for string-like kinds,
/// raw otherwise.
fn default_literal(property: &PropertySpec) -> Option<String> {
    let value = property.default_value.as_ref()?;
    let raw = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    if property.kind.is_string_like() {
        Some(format!("'{raw}'"))
    } else {
        Some(raw)
    }
}

/// Renders the model source text for a finalized record.
pub fn render_model(record: &ArtifactRecord) -> Result<String, GeneratorError> {
    let mut registry = Handlebars::new();
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string("model", MODEL_TEMPLATE)
        .map_err(|err| GeneratorError::Template(err.to_string()))?;

    registry
        .render("model", &ModelContext::from_record(record))
        .map_err(|err| GeneratorError::Template(err.to_string()))
}

/// Renders and writes the model source file, returning its path.
///
/// An existing file is only replaced under `force`; generation otherwise
/// stops before the manifests are touched.
pub fn emit_model(
    record: &ArtifactRecord,
    out_dir: &Path,
    force: bool,
) -> Result<PathBuf, GeneratorError> {
    let path = out_dir.join(format!("{}.model.ts", to_file_name(&record.name)));
    if path.exists() && !force {
        return Err(GeneratorError::Configuration(format!(
            "{} already exists; rerun with --force to overwrite",
            path.display()
        )));
    }

    let rendered = render_model(record)?;
    fs::create_dir_all(out_dir)?;
    fs::write(&path, rendered)?;
    Ok(path)
}
