use crate::answers::AnswerPool;
use crate::spec::question::{Condition, QuestionSpec};

/// Decides whether a question applies given the answers resolved so far.
///
/// Must be evaluated lazily, immediately before the question's turn: a
/// predicate may depend on answers produced for earlier questions in the
/// same pass. A question without a predicate always applies.
pub fn applies(question: &QuestionSpec, pool: &AnswerPool) -> bool {
    match &question.when {
        None => true,
        Some(Condition::Literal(flag)) => *flag,
        Some(Condition::Computed(compute)) => compute(pool),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::question::QuestionSpec;
    use serde_json::json;

    #[test]
    fn missing_predicate_always_applies() {
        let question = QuestionSpec::input("name", "Name:");
        assert!(applies(&question, &AnswerPool::new()));
    }

    #[test]
    fn computed_predicate_reads_the_pool() {
        let question = QuestionSpec::input("itemType", "Item type:")
            .when(|pool| pool.get_str("type") == Some("array"));

        let mut pool = AnswerPool::new();
        assert!(!applies(&question, &pool));
        pool.insert("type", json!("array"));
        assert!(applies(&question, &pool));
    }

    #[test]
    fn literal_predicate_is_fixed() {
        let question = QuestionSpec::confirm("id", "Is it the id?").when_flag(false);
        let mut pool = AnswerPool::new();
        pool.insert("id", json!(true));
        assert!(!applies(&question, &pool));
    }
}
