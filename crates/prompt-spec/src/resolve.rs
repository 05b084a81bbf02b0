use serde_json::Value;

use crate::answers::AnswerPool;
use crate::error::ResolveError;
use crate::gateway::PromptGateway;
use crate::spec::question::{QuestionKind, QuestionSpec};
use crate::when::applies;

/// Flags steering one resolution pass. Threaded explicitly by callers,
/// never read from ambient process state.
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// Whether the gateway may be consulted at all.
    pub interactive: bool,
    /// Accept every skippable question's default without prompting.
    pub accept_defaults: bool,
}

impl ResolveOptions {
    pub fn interactive() -> Self {
        Self {
            interactive: true,
            accept_defaults: false,
        }
    }

    pub fn batch() -> Self {
        Self {
            interactive: false,
            accept_defaults: true,
        }
    }
}

/// Resolves each question in order, mutating the pool.
///
/// Per question: a false `when` predicate skips it entirely; a value the
/// pool already holds is kept (validated, never re-resolved); a skippable
/// question is defaulted when prompting is off or defaults are accepted;
/// everything else goes to the gateway. Idempotent on already-resolved
/// keys, so it is safe to call repeatedly with a growing question list.
pub fn resolve(
    questions: &[QuestionSpec],
    pool: &mut AnswerPool,
    options: ResolveOptions,
    gateway: &mut dyn PromptGateway,
) -> Result<(), ResolveError> {
    for question in questions {
        if !applies(question, pool) {
            continue;
        }

        if let Some(existing) = pool.get(&question.name) {
            check_value(question, existing)?;
            continue;
        }

        let skippable = is_skippable(question);
        if skippable && (!options.interactive || options.accept_defaults) {
            match default_answer(question, pool)? {
                Some(value) => {
                    pool.insert(question.name.clone(), value);
                    continue;
                }
                None => return Err(ResolveError::NonInteractive(question.name.clone())),
            }
        }

        if !options.interactive {
            return Err(ResolveError::NonInteractive(question.name.clone()));
        }

        let default = default_answer(question, pool)?;
        let value = gateway.ask(question, default.as_ref())?;
        check_value(question, &value)?;
        pool.insert(question.name.clone(), value);
    }

    Ok(())
}

/// Whether a question has a deterministic zero-effort answer: an explicit
/// default, or a choice/confirm kind (first enabled option, `true`).
/// Free-text questions with no default are never skippable.
fn is_skippable(question: &QuestionSpec) -> bool {
    question.default.is_some()
        || matches!(
            question.kind,
            QuestionKind::Select | QuestionKind::MultiSelect | QuestionKind::Confirm
        )
}

/// Computes the zero-effort answer for a question, if one exists.
///
/// The pool is checked first so an already-resolved value pre-fills the
/// prompt. A computed default is evaluated against the pool; null results
/// count as no default. Choice kinds resolve indices or raw values against
/// the option list per the rules below.
pub fn default_answer(
    question: &QuestionSpec,
    pool: &AnswerPool,
) -> Result<Option<Value>, ResolveError> {
    if let Some(existing) = pool.get(&question.name) {
        return Ok(Some(existing.clone()));
    }

    let base = question
        .default
        .as_ref()
        .map(|default| default.resolve(pool))
        .filter(|value| !value.is_null());

    match question.kind {
        QuestionKind::Confirm => Ok(Some(base.unwrap_or(Value::Bool(true)))),
        QuestionKind::Select => select_default(question, base).map(Some),
        QuestionKind::MultiSelect => Ok(Some(multi_select_default(question, base))),
        QuestionKind::Input => Ok(base),
    }
}

/// A numeric default indexes into the options; a raw value must match an
/// option value. Anything else falls back to the first enabled option.
fn select_default(question: &QuestionSpec, base: Option<Value>) -> Result<Value, ResolveError> {
    let fallback = || {
        question
            .first_enabled_choice()
            .map(|choice| Value::String(choice.value.clone()))
            .ok_or_else(|| {
                ResolveError::Configuration(format!(
                    "question '{}' has no selectable option",
                    question.name
                ))
            })
    };

    match base {
        Some(Value::Number(index)) => {
            let resolved = index
                .as_u64()
                .and_then(|idx| question.choices.get(idx as usize))
                .map(|choice| Value::String(choice.value.clone()));
            match resolved {
                Some(value) => Ok(value),
                None => fallback(),
            }
        }
        Some(value) => {
            let known = value
                .as_str()
                .is_some_and(|raw| question.choices.iter().any(|choice| choice.value == raw));
            if known { Ok(value) } else { fallback() }
        }
        None => fallback(),
    }
}

/// With no default, the checked non-disabled options are selected. A
/// provided array resolves each entry like a select default, silently
/// dropping unmatched or disabled entries.
fn multi_select_default(question: &QuestionSpec, base: Option<Value>) -> Value {
    let entries = match base {
        None => {
            return Value::Array(
                question
                    .choices
                    .iter()
                    .filter(|choice| choice.checked && !choice.disabled)
                    .map(|choice| Value::String(choice.value.clone()))
                    .collect(),
            );
        }
        Some(Value::Array(entries)) => entries,
        Some(single) => vec![single],
    };

    let resolved = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Number(index) => index
                .as_u64()
                .and_then(|idx| question.choices.get(idx as usize))
                .filter(|choice| !choice.disabled)
                .map(|choice| choice.value.clone()),
            Value::String(raw) => question
                .choices
                .iter()
                .find(|choice| !choice.disabled && choice.value == raw)
                .map(|choice| choice.value.clone()),
            _ => None,
        })
        .map(Value::String)
        .collect();

    Value::Array(resolved)
}

fn check_value(question: &QuestionSpec, value: &Value) -> Result<(), ResolveError> {
    if let Some(validate) = &question.validate
        && let Err(reason) = validate(value)
    {
        return Err(ResolveError::Validation {
            name: question.name.clone(),
            reason,
        });
    }
    Ok(())
}
