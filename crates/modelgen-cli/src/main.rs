mod console;

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use modelgen_lib::{
    EntryOutcome, GenerationSession, GeneratorConfig, GeneratorError, GeneratorOptions,
    check_project, config_schema, remove_artifact,
};

const DEFAULT_MODELS_DIR: &str = "src/models";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Interactive generator for js-data model artifacts",
    long_about = "Scaffolds js-data model files from prompts or configuration and keeps the \
                  export and store manifests in sync."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a model and register it in the manifests.
    Model {
        /// Name for the model class.
        name: Option<String>,
        /// JSON file name, inline JSON value, or `stdin` with preset answers.
        #[arg(long, short = 'c', value_name = "CONFIG")]
        config: Option<String>,
        /// Skip all confirmation prompts with default or provided values.
        #[arg(long, short = 'y')]
        yes: bool,
        /// A valid base model to extend.
        #[arg(long, value_name = "BASE")]
        base: Option<String>,
        /// Overwrite an existing generated file.
        #[arg(long)]
        force: bool,
        /// Directory holding generated models.
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Skip the target-project dependency check.
        #[arg(long)]
        skip_project_check: bool,
    },
    /// Delete a generated model and unregister it from the manifests.
    #[command(visible_aliases = ["rm", "r", "d"])]
    Remove {
        /// Name of the model to delete.
        name: String,
        /// Directory holding generated models.
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Print the JSON schema of the configuration document.
    ConfigSchema,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Model {
            name,
            config,
            yes,
            base,
            force,
            out,
            skip_project_check,
        } => run_model(name, config, yes, base, force, out, skip_project_check),
        Command::Remove { name, out } => run_remove(&name, out),
        Command::ConfigSchema => run_config_schema(),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(GeneratorError::NotFound(message)) => {
            eprintln!("{message}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_model(
    name: Option<String>,
    config_arg: Option<String>,
    yes: bool,
    base: Option<String>,
    force: bool,
    out: Option<PathBuf>,
    skip_project_check: bool,
) -> Result<(), GeneratorError> {
    let interactive = io::stdin().is_terminal();
    let (mut config, forced_yes) = load_config(config_arg.as_deref(), interactive)?;

    // Flags and the positional name outrank the config document.
    if let Some(name) = name {
        config.name = Some(name);
    }
    if let Some(base) = base {
        config.base = Some(base);
    }

    if !skip_project_check {
        check_project(Path::new("."))?;
    }

    let out_dir = out.unwrap_or_else(|| PathBuf::from(DEFAULT_MODELS_DIR));
    ensure_models_dir(&out_dir)?;

    let options = GeneratorOptions {
        yes: yes || forced_yes,
        force,
        interactive,
    };

    let mut gateway = console::ConsoleGateway::new();
    let report = GenerationSession::new(&mut gateway, config, options, out_dir).run()?;
    console::print_report(&report);
    Ok(())
}

fn run_remove(name: &str, out: Option<PathBuf>) -> Result<(), GeneratorError> {
    let out_dir = out.unwrap_or_else(|| PathBuf::from(DEFAULT_MODELS_DIR));
    let report = remove_artifact(&out_dir, name)?;

    println!("Model removed {}", report.deleted.display());
    for (path, outcome) in &report.manifest_updates {
        match outcome {
            EntryOutcome::Removed => println!("   update {}", path.display()),
            EntryOutcome::NotPresent => {
                eprintln!("warning: no entry for '{name}' in {}", path.display());
            }
            EntryOutcome::Added | EntryOutcome::AlreadyPresent => {}
        }
    }
    Ok(())
}

fn run_config_schema() -> Result<(), GeneratorError> {
    let schema = config_schema();
    let pretty = serde_json::to_string_pretty(&schema)
        .map_err(|err| GeneratorError::Configuration(format!("schema encode failed: {err}")))?;
    println!("{pretty}");
    Ok(())
}

/// Loads the configuration document from a file, an inline JSON literal, or
/// standard input. Piped stdin (or `--config stdin`) forces accept-defaults
/// mode: no prompt could ever be answered there.
fn load_config(
    arg: Option<&str>,
    stdin_tty: bool,
) -> Result<(GeneratorConfig, bool), GeneratorError> {
    match arg {
        Some("stdin") => read_stdin_config(stdin_tty),
        Some(value) => {
            let path = Path::new(value);
            let raw = if path.is_file() {
                fs::read_to_string(path)?
            } else {
                value.to_string()
            };
            Ok((GeneratorConfig::parse(&raw)?, !stdin_tty))
        }
        None if !stdin_tty => read_stdin_config(stdin_tty),
        None => Ok((GeneratorConfig::default(), false)),
    }
}

fn read_stdin_config(stdin_tty: bool) -> Result<(GeneratorConfig, bool), GeneratorError> {
    if stdin_tty {
        println!("Type a JSON object, then finish with EOF (ctrl-d):");
    }
    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;
    let raw = raw.trim();
    let config = if raw.is_empty() {
        GeneratorConfig::default()
    } else {
        GeneratorConfig::parse(raw)?
    };
    Ok((config, true))
}

/// Creates the models directory on first use; a missing parent is a real
/// mistake and fails instead of silently building a tree.
fn ensure_models_dir(dir: &Path) -> Result<(), GeneratorError> {
    if dir.exists() {
        return Ok(());
    }
    if let Some(parent) = dir.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        return Err(GeneratorError::Configuration(format!(
            "parent directory does not exist: {}",
            parent.display()
        )));
    }
    fs::create_dir_all(dir)?;
    println!("Models folder created at {}", dir.display());
    Ok(())
}
