use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::answers::AnswerPool;

/// Closure producing a value from the answers resolved so far.
pub type ComputedValue = Arc<dyn Fn(&AnswerPool) -> Value + Send + Sync>;

/// Closure gating a question on the answers resolved so far.
pub type ComputedBool = Arc<dyn Fn(&AnswerPool) -> bool + Send + Sync>;

/// Closure checking a candidate answer, returning the rejection reason.
pub type Validator = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Supported prompt kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Free-text input.
    Input,
    /// Single choice from an ordered option list.
    Select,
    /// Multiple choices from an ordered option list.
    MultiSelect,
    /// Yes/no confirmation.
    Confirm,
}

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSpec {
    pub value: String,
    pub label: Option<String>,
    pub disabled: bool,
    /// Pre-selected when a multi-select question has no explicit default.
    pub checked: bool,
}

impl ChoiceSpec {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
            disabled: false,
            checked: false,
        }
    }

    pub fn labeled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new(value)
        }
    }

    pub fn disable(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn check(mut self) -> Self {
        self.checked = true;
        self
    }

    /// Text shown to the user; falls back to the raw value.
    pub fn display(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

/// A question default: a literal value, or a function of the pool resolved
/// at the question's turn.
#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    Computed(ComputedValue),
}

impl DefaultValue {
    pub fn resolve(&self, pool: &AnswerPool) -> Value {
        match self {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Computed(compute) => compute(pool),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DefaultValue::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Applicability predicate, evaluated lazily at the question's turn.
#[derive(Clone)]
pub enum Condition {
    Literal(bool),
    Computed(ComputedBool),
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Literal(flag) => f.debug_tuple("Literal").field(flag).finish(),
            Condition::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// A single prompt within a resolution round.
///
/// Names are unique within a round; the resolver never re-resolves a name
/// the pool already holds.
#[derive(Clone)]
pub struct QuestionSpec {
    pub name: String,
    pub message: String,
    pub kind: QuestionKind,
    pub choices: Vec<ChoiceSpec>,
    pub default: Option<DefaultValue>,
    pub when: Option<Condition>,
    pub validate: Option<Validator>,
}

impl QuestionSpec {
    fn new(name: impl Into<String>, message: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind,
            choices: Vec::new(),
            default: None,
            when: None,
            validate: None,
        }
    }

    pub fn input(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, message, QuestionKind::Input)
    }

    pub fn select(
        name: impl Into<String>,
        message: impl Into<String>,
        choices: Vec<ChoiceSpec>,
    ) -> Self {
        Self {
            choices,
            ..Self::new(name, message, QuestionKind::Select)
        }
    }

    pub fn multi_select(
        name: impl Into<String>,
        message: impl Into<String>,
        choices: Vec<ChoiceSpec>,
    ) -> Self {
        Self {
            choices,
            ..Self::new(name, message, QuestionKind::MultiSelect)
        }
    }

    pub fn confirm(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, message, QuestionKind::Confirm)
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Literal(value));
        self
    }

    pub fn with_computed_default(
        mut self,
        compute: impl Fn(&AnswerPool) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.default = Some(DefaultValue::Computed(Arc::new(compute)));
        self
    }

    pub fn when(mut self, compute: impl Fn(&AnswerPool) -> bool + Send + Sync + 'static) -> Self {
        self.when = Some(Condition::Computed(Arc::new(compute)));
        self
    }

    pub fn when_flag(mut self, flag: bool) -> Self {
        self.when = Some(Condition::Literal(flag));
        self
    }

    pub fn with_validator(
        mut self,
        validate: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validate = Some(Arc::new(validate));
        self
    }

    /// First option a user could actually pick.
    pub fn first_enabled_choice(&self) -> Option<&ChoiceSpec> {
        self.choices.iter().find(|choice| !choice.disabled)
    }
}

impl fmt::Debug for QuestionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("choices", &self.choices)
            .field("default", &self.default)
            .field("when", &self.when)
            .finish_non_exhaustive()
    }
}
