#![allow(missing_docs)]

pub mod artifact;
pub mod config;
pub mod discover;
pub mod emit;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod project;
pub mod remove;
pub mod session;

pub use artifact::{ArtifactRecord, PropertySpec, PropertyType};
pub use config::{GeneratorConfig, GeneratorOptions, PropertyConfig, config_schema};
pub use discover::{BUILTIN_BASES, artifact_list, find_model_file};
pub use emit::{emit_model, render_model};
pub use error::GeneratorError;
pub use manifest::{EntryOutcome, ManifestFile, ManifestKind};
pub use naming::{to_class_name, to_file_name, validate_class_name, validate_property_name};
pub use project::check_project;
pub use remove::{RemovalReport, remove_artifact};
pub use session::{GenerationSession, SessionReport, SessionState};
