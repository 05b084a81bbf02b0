use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use globset::{Glob, GlobMatcher};

use crate::naming::{to_class_name, to_file_name};

/// Built-in base classes always offered for new models.
pub const BUILTIN_BASES: [(&str, &str); 2] = [
    ("Entity", "A persisted model with an ID"),
    ("Model", "A business domain object"),
];

const MODEL_FILE_SUFFIX: &str = ".model.ts";

fn model_matcher() -> &'static GlobMatcher {
    static MATCHER: OnceLock<GlobMatcher> = OnceLock::new();
    MATCHER.get_or_init(|| {
        Glob::new("*.model.ts")
            .expect("glob is valid")
            .compile_matcher()
    })
}

/// Class names of previously generated artifacts in `dir`, sorted.
///
/// A missing directory is treated as empty: base-class candidates are then
/// just the built-ins.
pub fn artifact_list(dir: &Path) -> io::Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if model_matcher().is_match(file_name) {
            let stem = file_name.trim_end_matches(MODEL_FILE_SUFFIX);
            names.push(to_class_name(stem));
        }
    }
    names.sort();
    Ok(names)
}

/// Locates the generated file for an artifact, if present.
pub fn find_model_file(dir: &Path, artifact_name: &str) -> Option<PathBuf> {
    let path = dir.join(format!("{}{}", to_file_name(artifact_name), MODEL_FILE_SUFFIX));
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lists_generated_models_as_class_names() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("order.model.ts"), "").expect("write");
        fs::write(dir.path().join("invoice.model.ts"), "").expect("write");
        fs::write(dir.path().join("index.ts"), "").expect("write");
        fs::write(dir.path().join("store.ts"), "").expect("write");

        let names = artifact_list(dir.path()).expect("listing");
        assert_eq!(names, ["Invoice", "Order"]);
    }

    #[test]
    fn a_missing_directory_lists_nothing() {
        let dir = tempdir().expect("tempdir");
        let names = artifact_list(&dir.path().join("absent")).expect("listing");
        assert!(names.is_empty());
    }

    #[test]
    fn model_lookup_lowercases_the_artifact_name() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("order.model.ts"), "").expect("write");

        assert!(find_model_file(dir.path(), "Order").is_some());
        assert!(find_model_file(dir.path(), "invoice").is_none());
    }
}
