use std::sync::OnceLock;

use regex::Regex;

const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

fn identifier_regex() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| Regex::new(IDENTIFIER_PATTERN).expect("pattern is valid"))
}

/// First letter upper-cased, remainder unchanged.
///
/// Shared by emission and the manifest updater so a removal always derives
/// the same text an addition appended.
pub fn to_class_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// File stem for a generated artifact.
pub fn to_file_name(name: &str) -> String {
    name.to_lowercase()
}

pub fn validate_class_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("class name cannot be empty".into());
    }
    if identifier_regex().is_match(name) {
        Ok(())
    } else {
        Err(format!(
            "'{name}' is not a valid class name; use letters, digits, and underscores, not starting with a digit"
        ))
    }
}

pub fn validate_property_name(name: &str) -> Result<(), String> {
    if identifier_regex().is_match(name) {
        Ok(())
    } else {
        Err(format!(
            "'{name}' is not a valid property name; use letters, digits, and underscores, not starting with a digit"
        ))
    }
}

/// Heads-up messages about how a name will appear in generated symbols.
pub fn name_warnings(name: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    let class = to_class_name(name);
    if class != name {
        warnings.push(format!("'{name}' will be emitted as class '{class}'"));
    }
    if name.contains('_') {
        warnings.push(format!(
            "underscores are kept verbatim in the class name: {class}"
        ));
    }
    warnings
}
