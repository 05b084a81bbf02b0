use std::fs;
use std::path::{Path, PathBuf};

use crate::discover::find_model_file;
use crate::error::GeneratorError;
use crate::manifest::{EntryOutcome, ManifestFile};

/// What a removal touched; the CLI renders it.
#[derive(Debug)]
pub struct RemovalReport {
    pub deleted: PathBuf,
    pub manifest_updates: Vec<(PathBuf, EntryOutcome)>,
}

/// Deletes a generated model and unregisters it from both manifests.
///
/// An absent model file is a `NotFound` report with no side effects. A
/// manifest without a matching entry comes back as `NotPresent` so callers
/// can warn about the divergence instead of claiming a clean removal.
pub fn remove_artifact(out_dir: &Path, artifact_name: &str) -> Result<RemovalReport, GeneratorError> {
    let Some(path) = find_model_file(out_dir, artifact_name) else {
        return Err(GeneratorError::NotFound(format!(
            "{artifact_name} model does not exist"
        )));
    };

    fs::remove_file(&path)?;

    let mut manifest_updates = Vec::new();
    for manifest in [
        ManifestFile::export(out_dir),
        ManifestFile::registration(out_dir),
    ] {
        let outcome = manifest.remove_entry(artifact_name)?;
        manifest_updates.push((manifest.path().to_path_buf(), outcome));
    }

    Ok(RemovalReport {
        deleted: path,
        manifest_updates,
    })
}
