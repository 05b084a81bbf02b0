use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use prompt_spec::{
    AnswerPool, ChoiceSpec, PromptGateway, QuestionSpec, ResolveError, ResolveOptions, resolve,
};

use crate::artifact::{ArtifactRecord, PropertySpec, PropertyType};
use crate::config::{GeneratorConfig, GeneratorOptions};
use crate::discover::{BUILTIN_BASES, artifact_list};
use crate::emit::emit_model;
use crate::error::GeneratorError;
use crate::manifest::{EntryOutcome, ManifestFile};
use crate::naming::{name_warnings, to_class_name, validate_class_name, validate_property_name};

/// Session progress through the generation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    NamingArtifact,
    SelectingBase,
    AddingProperty(usize),
    Finalized,
    Emitted,
}

/// What a completed session produced; the CLI renders it.
#[derive(Debug)]
pub struct SessionReport {
    pub record: ArtifactRecord,
    pub created: Option<PathBuf>,
    pub manifest_updates: Vec<(PathBuf, EntryOutcome)>,
    pub warnings: Vec<String>,
}

enum RoundOutcome {
    Added,
    Finished,
    Exited,
}

/// Drives one artifact generation from first prompt to manifest update.
///
/// Collaborators are injected: the gateway for interaction, the config for
/// pre-set answers, explicit options for the accept-defaults and overwrite
/// flags. The lifecycle is an ordered list of steps; every step checks the
/// cooperative exit flag first and becomes a no-op once it is set.
pub struct GenerationSession<'a, G: PromptGateway> {
    gateway: &'a mut G,
    config: GeneratorConfig,
    options: GeneratorOptions,
    out_dir: PathBuf,
    state: SessionState,
    pool: AnswerPool,
    record: ArtifactRecord,
    exit_reason: Option<String>,
    warnings: Vec<String>,
    created: Option<PathBuf>,
    manifest_updates: Vec<(PathBuf, EntryOutcome)>,
}

impl<'a, G: PromptGateway> GenerationSession<'a, G> {
    pub fn new(
        gateway: &'a mut G,
        config: GeneratorConfig,
        options: GeneratorOptions,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        let pool = AnswerPool::from_config(&config.artifact_answers());
        Self {
            gateway,
            config,
            options,
            out_dir: out_dir.into(),
            state: SessionState::Idle,
            pool,
            record: ArtifactRecord::default(),
            exit_reason: None,
            warnings: Vec::new(),
            created: None,
            manifest_updates: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Requests cooperative cancellation; the first reason wins.
    pub fn exit(&mut self, reason: impl Into<String>) {
        if self.exit_reason.is_none() {
            self.exit_reason = Some(reason.into());
        }
    }

    pub fn should_exit(&self) -> bool {
        self.exit_reason.is_some()
    }

    /// Runs the whole lifecycle, returning the report on success.
    pub fn run(mut self) -> Result<SessionReport, GeneratorError> {
        let steps: [fn(&mut Self) -> Result<(), GeneratorError>; 5] = [
            Self::resolve_name,
            Self::resolve_base,
            Self::collect_properties,
            Self::emit_artifact,
            Self::update_manifests,
        ];

        for step in steps {
            if self.should_exit() {
                break;
            }
            step(&mut self)?;
        }

        if let Some(reason) = self.exit_reason {
            return Err(GeneratorError::Aborted(reason));
        }

        Ok(SessionReport {
            record: self.record,
            created: self.created,
            manifest_updates: self.manifest_updates,
            warnings: self.warnings,
        })
    }

    fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            interactive: self.options.interactive,
            accept_defaults: self.options.yes,
        }
    }

    fn resolve_name(&mut self) -> Result<(), GeneratorError> {
        self.state = SessionState::NamingArtifact;

        let question =
            QuestionSpec::input("name", "Model class name:").with_validator(|value| {
                match value.as_str() {
                    Some(text) => validate_class_name(text),
                    None => Err("class name must be a string".into()),
                }
            });
        let options = self.resolve_options();
        if !resolve_or_exit(
            &[question],
            &mut self.pool,
            options,
            self.gateway,
            &mut self.exit_reason,
        )? {
            return Ok(());
        }

        let name = self.pool.get_str("name").unwrap_or_default().to_string();
        for warning in name_warnings(&name) {
            self.gateway.notice(&warning);
            self.warnings.push(warning);
        }
        self.record.class_name = to_class_name(&name);
        self.record.name = name;
        Ok(())
    }

    fn resolve_base(&mut self) -> Result<(), GeneratorError> {
        self.state = SessionState::SelectingBase;

        let mut choices: Vec<ChoiceSpec> = BUILTIN_BASES
            .iter()
            .map(|(value, label)| ChoiceSpec::labeled(*value, format!("{value} ({label})")))
            .collect();
        for artifact in artifact_list(&self.out_dir)? {
            choices.push(ChoiceSpec::new(artifact));
        }

        // A base picked via config or flag must name a real candidate.
        if let Some(base) = self.pool.get_str("base")
            && !choices
                .iter()
                .any(|choice| !choice.disabled && choice.value == base)
        {
            return Err(GeneratorError::Configuration(format!(
                "base class '{base}' was not found in {}",
                self.out_dir.display()
            )));
        }

        let question = QuestionSpec::select("base", "Please select the model base class", choices);
        let options = self.resolve_options();
        if !resolve_or_exit(
            &[question],
            &mut self.pool,
            options,
            self.gateway,
            &mut self.exit_reason,
        )? {
            return Ok(());
        }

        self.record.base = self.pool.get_str("base").unwrap_or("Model").to_string();
        self.gateway.notice(&format!(
            "Let's add a property to {}",
            self.record.class_name
        ));
        Ok(())
    }

    fn collect_properties(&mut self) -> Result<(), GeneratorError> {
        let mut round = 0;
        loop {
            if self.should_exit() {
                return Ok(());
            }
            self.state = SessionState::AddingProperty(round + 1);
            match self.resolve_property_round(round)? {
                RoundOutcome::Added => round += 1,
                RoundOutcome::Finished => break,
                RoundOutcome::Exited => return Ok(()),
            }
        }
        self.state = SessionState::Finalized;
        Ok(())
    }

    /// One property round: the name question, then the nested detail set.
    /// An empty name is the termination signal.
    fn resolve_property_round(&mut self, round: usize) -> Result<RoundOutcome, GeneratorError> {
        let mut pool = AnswerPool::from_config(&self.config.round_answers(round));
        let options = self.resolve_options();

        let name_question =
            QuestionSpec::input("propName", "Enter the property name (empty when done):")
                .with_default(json!(""))
                .with_validator(|value| match value.as_str() {
                    Some("") => Ok(()),
                    Some(text) => validate_property_name(text),
                    None => Err("property name must be a string".into()),
                });
        if !resolve_or_exit(
            &[name_question],
            &mut pool,
            options,
            self.gateway,
            &mut self.exit_reason,
        )? {
            return Ok(RoundOutcome::Exited);
        }

        let prop_name = pool.get_str("propName").unwrap_or_default().to_string();
        if prop_name.is_empty() {
            return Ok(RoundOutcome::Finished);
        }

        let questions = property_questions(!self.record.has_id_property());
        if !resolve_or_exit(
            &questions,
            &mut pool,
            options,
            self.gateway,
            &mut self.exit_reason,
        )? {
            return Ok(RoundOutcome::Exited);
        }

        let property = property_from_pool(&pool, &prop_name)?;
        if let Some(previous) = self.record.insert_property(&prop_name, property) {
            let warning = format!(
                "property '{prop_name}' takes the id flag from '{previous}' (last one wins)"
            );
            self.gateway.notice(&warning);
            self.warnings.push(warning);
        }

        self.gateway.notice(&format!(
            "Let's add another property to {}",
            self.record.class_name
        ));
        Ok(RoundOutcome::Added)
    }

    fn emit_artifact(&mut self) -> Result<(), GeneratorError> {
        let path = emit_model(&self.record, &self.out_dir, self.options.force)?;
        self.created = Some(path);
        Ok(())
    }

    /// Both manifests take the artifact, serialized through one
    /// read-modify-write each; adds are idempotent so a retried run after a
    /// partial failure converges.
    fn update_manifests(&mut self) -> Result<(), GeneratorError> {
        for manifest in [
            ManifestFile::export(&self.out_dir),
            ManifestFile::registration(&self.out_dir),
        ] {
            let outcome = manifest.add_entry(&self.record.name)?;
            self.manifest_updates
                .push((manifest.path().to_path_buf(), outcome));
        }
        self.state = SessionState::Emitted;
        Ok(())
    }
}

/// Runs one resolution pass, converting a gateway abort into the session's
/// cooperative exit flag. Returns whether the pass completed.
fn resolve_or_exit<G: PromptGateway>(
    questions: &[QuestionSpec],
    pool: &mut AnswerPool,
    options: ResolveOptions,
    gateway: &mut G,
    exit_reason: &mut Option<String>,
) -> Result<bool, GeneratorError> {
    match resolve(questions, pool, options, gateway) {
        Ok(()) => Ok(true),
        Err(ResolveError::Aborted(reason)) => {
            if exit_reason.is_none() {
                *exit_reason = Some(reason);
            }
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

/// The nested property-detail question set. The id question only opens
/// while no property has consumed the id flag.
fn property_questions(id_open: bool) -> Vec<QuestionSpec> {
    let type_choices = PropertyType::ALL
        .iter()
        .map(|kind| ChoiceSpec::new(kind.as_str()))
        .collect();
    let item_choices = PropertyType::item_candidates()
        .map(|kind| ChoiceSpec::new(kind.as_str()))
        .collect();

    vec![
        QuestionSpec::select("type", "Property type:", type_choices)
            .with_validator(validate_type_value),
        QuestionSpec::select("itemType", "Type of array items:", item_choices)
            .when(|pool| pool.get_str("type") == Some("array"))
            .with_validator(validate_item_type_value),
        QuestionSpec::confirm("required", "Is it required?")
            .with_default(json!(false))
            .with_validator(validate_bool_value),
        QuestionSpec::input("default", "Default value (leave empty for none):")
            .with_default(json!("")),
        QuestionSpec::confirm("id", "Is it the ID field?")
            .with_default(json!(false))
            .when_flag(id_open)
            .with_validator(validate_bool_value),
    ]
}

fn validate_type_value(value: &Value) -> Result<(), String> {
    match value.as_str() {
        Some(text) => text.parse::<PropertyType>().map(|_| ()),
        None => Err("property type must be a string".into()),
    }
}

fn validate_item_type_value(value: &Value) -> Result<(), String> {
    match value.as_str() {
        Some(text) => match text.parse::<PropertyType>()? {
            PropertyType::Array => Err("arrays of arrays are not supported".into()),
            _ => Ok(()),
        },
        None => Err("item type must be a string".into()),
    }
}

fn validate_bool_value(value: &Value) -> Result<(), String> {
    value
        .as_bool()
        .map(|_| ())
        .ok_or_else(|| "expected true or false".to_string())
}

/// Builds the PropertySpec from a completed round pool. The item type is
/// only read for arrays, so a stray configured `itemType` never violates
/// the record invariant.
fn property_from_pool(pool: &AnswerPool, prop_name: &str) -> Result<PropertySpec, GeneratorError> {
    let kind = pool
        .get_str("type")
        .ok_or_else(|| {
            GeneratorError::Configuration(format!("property '{prop_name}' is missing a type"))
        })?
        .parse::<PropertyType>()
        .map_err(GeneratorError::Configuration)?;

    let mut property = PropertySpec::new(kind);
    if kind == PropertyType::Array {
        property.item_type = match pool.get_str("itemType") {
            Some(text) => Some(
                text.parse::<PropertyType>()
                    .map_err(GeneratorError::Configuration)?,
            ),
            None => None,
        };
    }
    property.required = pool.get_bool("required").unwrap_or(false);
    property.id = pool.get_bool("id").unwrap_or(false);
    property.default_value = match pool.get("default") {
        Some(Value::String(text)) if text.is_empty() => None,
        Some(value) => Some(value.clone()),
        None => None,
    };
    Ok(property)
}
