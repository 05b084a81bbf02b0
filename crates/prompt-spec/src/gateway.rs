use std::collections::VecDeque;

use serde_json::Value;

use crate::error::ResolveError;
use crate::spec::question::QuestionSpec;

/// Boundary to whatever asks a human (or a replay script) for one answer.
///
/// Implementations own rendering and the retry loop for invalid input; the
/// resolver only re-checks the final value. This is the single seam where
/// blocking console I/O may happen.
pub trait PromptGateway {
    /// Asks one question, passing the computed default for pre-fill.
    fn ask(
        &mut self,
        question: &QuestionSpec,
        default: Option<&Value>,
    ) -> Result<Value, ResolveError>;

    /// Progress line shown between prompts. Non-terminal gateways ignore it.
    fn notice(&mut self, _message: &str) {}
}

/// Gateway replaying a fixed answer sequence, used for scripted runs and
/// tests. A null entry (or an exhausted queue) falls back to the question's
/// default, like pressing enter at a prompt.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    answers: VecDeque<Value>,
}

impl ScriptedGateway {
    pub fn new(answers: impl IntoIterator<Item = Value>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
        }
    }

    pub fn is_drained(&self) -> bool {
        self.answers.is_empty()
    }
}

impl PromptGateway for ScriptedGateway {
    fn ask(
        &mut self,
        question: &QuestionSpec,
        default: Option<&Value>,
    ) -> Result<Value, ResolveError> {
        match self.answers.pop_front() {
            Some(value) if !value.is_null() => Ok(value),
            _ => match default {
                Some(value) => Ok(value.clone()),
                None => Err(ResolveError::Aborted(format!(
                    "no scripted answer left for '{}'",
                    question.name
                ))),
            },
        }
    }
}
