pub mod question;

pub use question::{ChoiceSpec, Condition, DefaultValue, QuestionKind, QuestionSpec, Validator};
