use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::GeneratorError;

/// Packages the target project must depend on before models can be
/// generated into it.
const REQUIRED_PACKAGES: [&str; 3] = ["@angular/core", "js-data", "js-data-http"];

/// Verifies the working directory is a project this generator can serve.
///
/// Runs before any prompt so a wrong directory fails fast, with nothing
/// written.
pub fn check_project(root: &Path) -> Result<(), GeneratorError> {
    let manifest = root.join("package.json");
    let contents = fs::read_to_string(&manifest).map_err(|_| {
        GeneratorError::Configuration(format!(
            "no package.json found in {}; the command must be run in an Angular project",
            root.display()
        ))
    })?;

    let package: Value = serde_json::from_str(&contents).map_err(|err| {
        GeneratorError::Configuration(format!("package.json is not valid JSON: {err}"))
    })?;

    let dependencies = package.get("dependencies").and_then(Value::as_object);
    for required in REQUIRED_PACKAGES {
        if !dependencies.is_some_and(|deps| deps.contains_key(required)) {
            return Err(GeneratorError::Configuration(format!(
                "no '{required}' package found in the \"dependencies\" section of {}; the command must be run in an Angular project",
                manifest.display()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_package(dir: &Path, dependencies: &[&str]) {
        let deps: Vec<String> = dependencies
            .iter()
            .map(|name| format!("\"{name}\": \"*\""))
            .collect();
        let contents = format!("{{\"dependencies\": {{{}}}}}", deps.join(", "));
        fs::write(dir.join("package.json"), contents).expect("write");
    }

    #[test]
    fn accepts_a_fully_equipped_project() {
        let dir = tempdir().expect("tempdir");
        write_package(dir.path(), &["@angular/core", "js-data", "js-data-http"]);
        assert!(check_project(dir.path()).is_ok());
    }

    #[test]
    fn names_the_first_missing_package() {
        let dir = tempdir().expect("tempdir");
        write_package(dir.path(), &["@angular/core", "js-data"]);
        let err = check_project(dir.path()).expect_err("js-data-http is missing");
        assert!(err.to_string().contains("js-data-http"));
    }

    #[test]
    fn rejects_a_directory_without_a_package_json() {
        let dir = tempdir().expect("tempdir");
        let err = check_project(dir.path()).expect_err("no package.json");
        assert!(err.to_string().contains("package.json"));
    }
}
