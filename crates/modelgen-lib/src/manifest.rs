use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::naming::{to_class_name, to_file_name};

/// Store-initialization preamble written when the registration manifest is
/// first created.
const REGISTRATION_HEADER: &str = "import { DataStore } from 'js-data';\nimport { HttpAdapter } from 'js-data-http';\nimport * as dataModel from './index'\n\nexport const STORE = new DataStore({});\nexport const adapter = new HttpAdapter({\n    basePath: 'https://example.com/api'\n});\n\nSTORE.registerAdapter('http', adapter, { default: true });";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// `index.ts`: one export line per artifact.
    Export,
    /// `store.ts`: a mapper-registration block per artifact.
    Registration,
}

/// Result of a single add/remove call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    Added,
    AlreadyPresent,
    Removed,
    /// The derived entry text was not found; nothing was changed. Callers
    /// surface this as a warning rather than silent success.
    NotPresent,
}

/// One generated aggregation file, mutated by whole-entry append/remove.
///
/// Entry derivation is shared between `add_entry` and `remove_entry` so a
/// removal always matches, byte for byte, what the addition appended.
/// Pre-existing content the updater does not recognize is left alone; only
/// the per-artifact entry is ever touched.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    path: PathBuf,
    kind: ManifestKind,
}

impl ManifestFile {
    pub fn export(dir: &Path) -> Self {
        Self {
            path: dir.join("index.ts"),
            kind: ManifestKind::Export,
        }
    }

    pub fn registration(dir: &Path) -> Self {
        Self {
            path: dir.join("store.ts"),
            kind: ManifestKind::Registration,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ManifestKind {
        self.kind
    }

    /// The exact text this manifest holds for an artifact.
    pub fn entry_text(&self, artifact_name: &str) -> String {
        let file = to_file_name(artifact_name);
        match self.kind {
            ManifestKind::Export => format!("export * from './{file}.model';\n"),
            ManifestKind::Registration => {
                let class = to_class_name(&file);
                format!(
                    "\n\nSTORE.defineMapper('{file}', {{\n    endpoint: '{file}s',\n    schema: dataModel.{class}Schema,\n    relations: dataModel.{class}Relations,\n  }});"
                )
            }
        }
    }

    /// Appends the artifact's entry unless it is already present. A missing
    /// file is created, with the registration preamble where applicable.
    pub fn add_entry(&self, artifact_name: &str) -> io::Result<EntryOutcome> {
        let mut content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => match self.kind {
                ManifestKind::Registration => REGISTRATION_HEADER.to_string(),
                ManifestKind::Export => String::new(),
            },
            Err(err) => return Err(err),
        };

        let entry = self.entry_text(artifact_name);
        if content.contains(&entry) {
            return Ok(EntryOutcome::AlreadyPresent);
        }

        content.push_str(&entry);
        fs::write(&self.path, content)?;
        Ok(EntryOutcome::Added)
    }

    /// Deletes the first exact occurrence of the artifact's entry. A missing
    /// file or entry is a no-op reported as `NotPresent`.
    pub fn remove_entry(&self, artifact_name: &str) -> io::Result<EntryOutcome> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(EntryOutcome::NotPresent);
            }
            Err(err) => return Err(err),
        };

        let entry = self.entry_text(artifact_name);
        let Some(at) = content.find(&entry) else {
            return Ok(EntryOutcome::NotPresent);
        };

        let mut updated = content;
        updated.replace_range(at..at + entry.len(), "");
        fs::write(&self.path, updated)?;
        Ok(EntryOutcome::Removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn export_entry_matches_the_published_format() {
        let dir = tempdir().expect("tempdir");
        let manifest = ManifestFile::export(dir.path());
        assert_eq!(
            manifest.entry_text("Order"),
            "export * from './order.model';\n"
        );
    }

    #[test]
    fn registration_entry_references_schema_and_relations_symbols() {
        let dir = tempdir().expect("tempdir");
        let manifest = ManifestFile::registration(dir.path());
        let entry = manifest.entry_text("order");
        assert!(entry.contains("STORE.defineMapper('order'"));
        assert!(entry.contains("endpoint: 'orders'"));
        assert!(entry.contains("schema: dataModel.OrderSchema"));
        assert!(entry.contains("relations: dataModel.OrderRelations"));
    }

    #[test]
    fn adding_twice_is_idempotent() {
        let dir = tempdir().expect("tempdir");
        let manifest = ManifestFile::export(dir.path());

        assert_eq!(manifest.add_entry("order").expect("add"), EntryOutcome::Added);
        let once = fs::read_to_string(manifest.path()).expect("read");
        assert_eq!(
            manifest.add_entry("order").expect("add again"),
            EntryOutcome::AlreadyPresent
        );
        let twice = fs::read_to_string(manifest.path()).expect("read");
        assert_eq!(once, twice);
    }

    #[test]
    fn remove_inverts_add_byte_for_byte() {
        let dir = tempdir().expect("tempdir");
        for manifest in [
            ManifestFile::export(dir.path()),
            ManifestFile::registration(dir.path()),
        ] {
            manifest.add_entry("order").expect("seed");
            let before = fs::read_to_string(manifest.path()).expect("read");

            manifest.add_entry("invoice").expect("add");
            assert_eq!(
                manifest.remove_entry("invoice").expect("remove"),
                EntryOutcome::Removed
            );
            let after = fs::read_to_string(manifest.path()).expect("read");
            assert_eq!(before, after);
        }
    }

    #[test]
    fn export_additions_are_order_independent() {
        let first = tempdir().expect("tempdir");
        let second = tempdir().expect("tempdir");

        let ab = ManifestFile::export(first.path());
        ab.add_entry("alpha").expect("add");
        ab.add_entry("beta").expect("add");

        let ba = ManifestFile::export(second.path());
        ba.add_entry("beta").expect("add");
        ba.add_entry("alpha").expect("add");

        let mut lines_ab: Vec<String> = fs::read_to_string(ab.path())
            .expect("read")
            .lines()
            .map(String::from)
            .collect();
        let mut lines_ba: Vec<String> = fs::read_to_string(ba.path())
            .expect("read")
            .lines()
            .map(String::from)
            .collect();
        lines_ab.sort();
        lines_ba.sort();
        assert_eq!(lines_ab, lines_ba);
    }

    #[test]
    fn registration_header_is_written_once() {
        let dir = tempdir().expect("tempdir");
        let manifest = ManifestFile::registration(dir.path());

        manifest.add_entry("order").expect("add");
        manifest.add_entry("invoice").expect("add");

        let content = fs::read_to_string(manifest.path()).expect("read");
        assert_eq!(content.matches("new DataStore({})").count(), 1);
        assert!(content.starts_with("import { DataStore } from 'js-data';"));
    }

    #[test]
    fn removing_a_missing_entry_changes_nothing() {
        let dir = tempdir().expect("tempdir");
        let manifest = ManifestFile::export(dir.path());
        manifest.add_entry("order").expect("add");
        let before = fs::read_to_string(manifest.path()).expect("read");

        assert_eq!(
            manifest.remove_entry("invoice").expect("remove"),
            EntryOutcome::NotPresent
        );
        assert_eq!(fs::read_to_string(manifest.path()).expect("read"), before);
    }

    #[test]
    fn removing_from_a_missing_file_is_a_no_op() {
        let dir = tempdir().expect("tempdir");
        let manifest = ManifestFile::registration(dir.path());
        assert_eq!(
            manifest.remove_entry("order").expect("remove"),
            EntryOutcome::NotPresent
        );
        assert!(!manifest.path().exists());
    }

    #[test]
    fn hand_edited_manifests_still_take_entries() {
        let dir = tempdir().expect("tempdir");
        let manifest = ManifestFile::registration(dir.path());
        fs::write(manifest.path(), "// customized by hand\n").expect("write");

        assert_eq!(manifest.add_entry("order").expect("add"), EntryOutcome::Added);
        let content = fs::read_to_string(manifest.path()).expect("read");
        assert!(content.starts_with("// customized by hand\n"));
        assert!(content.contains("STORE.defineMapper('order'"));
    }

    #[test]
    fn two_manifests_update_independently() {
        let dir = tempdir().expect("tempdir");
        let export = ManifestFile::export(dir.path());
        let registration = ManifestFile::registration(dir.path());

        registration.add_entry("order").expect("add");
        export.add_entry("order").expect("add");

        assert_eq!(
            export.remove_entry("order").expect("remove"),
            EntryOutcome::Removed
        );
        let store = fs::read_to_string(registration.path()).expect("read");
        assert!(store.contains("STORE.defineMapper('order'"));
    }
}
