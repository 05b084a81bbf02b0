#![allow(missing_docs)]

pub mod answers;
pub mod error;
pub mod gateway;
pub mod resolve;
pub mod spec;
pub mod when;

pub use answers::AnswerPool;
pub use error::ResolveError;
pub use gateway::{PromptGateway, ScriptedGateway};
pub use resolve::{ResolveOptions, default_answer, resolve};
pub use spec::{ChoiceSpec, Condition, DefaultValue, QuestionKind, QuestionSpec, Validator};
pub use when::applies;
