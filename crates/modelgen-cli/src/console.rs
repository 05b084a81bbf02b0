use std::io::{self, Write};

use serde_json::Value;

use modelgen_lib::{EntryOutcome, SessionReport};
use prompt_spec::{PromptGateway, QuestionKind, QuestionSpec, ResolveError};

/// Prompt gateway backed by stdin/stdout.
///
/// Owns rendering and the retry loop for invalid input; the resolver only
/// sees the final value. End of input aborts the prompt, which the session
/// turns into a cooperative exit.
pub struct ConsoleGateway;

impl ConsoleGateway {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&mut self) -> Result<String, ResolveError> {
        let mut line = String::new();
        let read = io::stdin().read_line(&mut line)?;
        if read == 0 {
            return Err(ResolveError::Aborted("end of input".into()));
        }
        Ok(line.trim().to_string())
    }

    fn ask_input(
        &mut self,
        question: &QuestionSpec,
        default: Option<&Value>,
    ) -> Result<Value, ResolveError> {
        let default_text = default.and_then(Value::as_str).unwrap_or("");
        loop {
            if default_text.is_empty() {
                print!("{} ", question.message);
            } else {
                print!("{} [{}] ", question.message, default_text);
            }
            io::stdout().flush()?;

            let line = self.read_line()?;
            let value = if line.is_empty() {
                Value::String(default_text.to_string())
            } else {
                Value::String(line)
            };
            match check(question, &value) {
                Ok(()) => return Ok(value),
                Err(reason) => println!("Invalid answer: {reason}"),
            }
        }
    }

    fn ask_confirm(
        &mut self,
        question: &QuestionSpec,
        default: Option<&Value>,
    ) -> Result<Value, ResolveError> {
        let default_flag = default.and_then(Value::as_bool).unwrap_or(true);
        let hint = if default_flag { "(Y/n)" } else { "(y/N)" };
        loop {
            print!("{} {hint} ", question.message);
            io::stdout().flush()?;

            let line = self.read_line()?.to_lowercase();
            let flag = match line.as_str() {
                "" => Some(default_flag),
                "y" | "yes" | "true" | "t" | "1" => Some(true),
                "n" | "no" | "false" | "f" | "0" => Some(false),
                _ => None,
            };
            match flag {
                Some(flag) => return Ok(Value::Bool(flag)),
                None => println!("Please answer yes or no."),
            }
        }
    }

    fn ask_select(
        &mut self,
        question: &QuestionSpec,
        default: Option<&Value>,
    ) -> Result<Value, ResolveError> {
        let default_value = default.and_then(Value::as_str);
        println!("{}", question.message);
        for (idx, choice) in question.choices.iter().enumerate() {
            if choice.disabled {
                println!("  {}. {} (unavailable)", idx + 1, choice.display());
            } else if Some(choice.value.as_str()) == default_value {
                println!("  {}. {} (default)", idx + 1, choice.display());
            } else {
                println!("  {}. {}", idx + 1, choice.display());
            }
        }

        loop {
            print!("Choose 1-{} or a value: ", question.choices.len());
            io::stdout().flush()?;

            let line = self.read_line()?;
            if line.is_empty()
                && let Some(value) = default_value
            {
                return Ok(Value::String(value.to_string()));
            }

            let picked = match line.parse::<usize>() {
                Ok(index) if index >= 1 => question.choices.get(index - 1),
                _ => question
                    .choices
                    .iter()
                    .find(|choice| choice.value.eq_ignore_ascii_case(&line)),
            };
            match picked {
                Some(choice) if !choice.disabled => {
                    return Ok(Value::String(choice.value.clone()));
                }
                Some(_) => println!("That option is unavailable."),
                None => println!("Choose one of the listed options."),
            }
        }
    }

    fn ask_multi_select(
        &mut self,
        question: &QuestionSpec,
        default: Option<&Value>,
    ) -> Result<Value, ResolveError> {
        println!("{}", question.message);
        for (idx, choice) in question.choices.iter().enumerate() {
            if choice.disabled {
                println!("  {}. {} (unavailable)", idx + 1, choice.display());
            } else {
                println!("  {}. {}", idx + 1, choice.display());
            }
        }

        'retry: loop {
            print!("Comma-separated numbers or values (empty for default): ");
            io::stdout().flush()?;

            let line = self.read_line()?;
            if line.is_empty() {
                return Ok(default.cloned().unwrap_or_else(|| Value::Array(Vec::new())));
            }

            let mut selected = Vec::new();
            for token in line.split(',').map(str::trim).filter(|token| !token.is_empty()) {
                let picked = match token.parse::<usize>() {
                    Ok(index) if index >= 1 => question.choices.get(index - 1),
                    _ => question
                        .choices
                        .iter()
                        .find(|choice| choice.value.eq_ignore_ascii_case(token)),
                };
                match picked {
                    Some(choice) if !choice.disabled => {
                        selected.push(Value::String(choice.value.clone()));
                    }
                    _ => {
                        println!("'{token}' is not one of the listed options.");
                        continue 'retry;
                    }
                }
            }
            return Ok(Value::Array(selected));
        }
    }
}

impl PromptGateway for ConsoleGateway {
    fn ask(
        &mut self,
        question: &QuestionSpec,
        default: Option<&Value>,
    ) -> Result<Value, ResolveError> {
        match question.kind {
            QuestionKind::Input => self.ask_input(question, default),
            QuestionKind::Confirm => self.ask_confirm(question, default),
            QuestionKind::Select => self.ask_select(question, default),
            QuestionKind::MultiSelect => self.ask_multi_select(question, default),
        }
    }

    fn notice(&mut self, message: &str) {
        println!("{message}");
    }
}

fn check(question: &QuestionSpec, value: &Value) -> Result<(), String> {
    match &question.validate {
        Some(validate) => validate(value),
        None => Ok(()),
    }
}

/// Prints what a finished generation touched.
pub fn print_report(report: &SessionReport) {
    for (path, outcome) in &report.manifest_updates {
        match outcome {
            EntryOutcome::Added | EntryOutcome::AlreadyPresent => {
                println!("   update {}", path.display());
            }
            EntryOutcome::Removed | EntryOutcome::NotPresent => {}
        }
    }
    if let Some(created) = &report.created {
        println!();
        println!(
            "Model {} was created in {}",
            report.record.class_name,
            created.display()
        );
    }
}
