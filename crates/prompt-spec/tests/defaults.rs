use serde_json::{Value, json};

use prompt_spec::{AnswerPool, ChoiceSpec, QuestionSpec, ResolveError, default_answer};

fn bases() -> Vec<ChoiceSpec> {
    vec![
        ChoiceSpec::labeled("Entity", "Entity (a persisted model)"),
        ChoiceSpec::new("Model"),
        ChoiceSpec::new("Legacy").disable(),
    ]
}

#[test]
fn select_without_default_picks_the_first_enabled_option() {
    let question = QuestionSpec::select("base", "Base:", bases());
    let value = default_answer(&question, &AnswerPool::new())
        .expect("computable")
        .expect("choice kinds always default");
    assert_eq!(value, json!("Entity"));
}

#[test]
fn select_numeric_default_is_an_index() {
    let question = QuestionSpec::select("base", "Base:", bases()).with_default(json!(1));
    let value = default_answer(&question, &AnswerPool::new())
        .expect("computable")
        .expect("index resolves");
    assert_eq!(value, json!("Model"));
}

#[test]
fn select_unmatched_default_falls_back_to_first_enabled() {
    let question = QuestionSpec::select("base", "Base:", bases()).with_default(json!("Unknown"));
    let value = default_answer(&question, &AnswerPool::new())
        .expect("computable")
        .expect("fallback resolves");
    assert_eq!(value, json!("Entity"));

    let out_of_range = QuestionSpec::select("base", "Base:", bases()).with_default(json!(12));
    let value = default_answer(&out_of_range, &AnswerPool::new())
        .expect("computable")
        .expect("fallback resolves");
    assert_eq!(value, json!("Entity"));
}

#[test]
fn select_with_every_option_disabled_is_a_configuration_error() {
    let question = QuestionSpec::select(
        "base",
        "Base:",
        vec![ChoiceSpec::new("Legacy").disable()],
    );
    let err = default_answer(&question, &AnswerPool::new()).expect_err("nothing selectable");
    assert!(matches!(err, ResolveError::Configuration(_)));
}

#[test]
fn multi_select_without_default_takes_checked_options() {
    let question = QuestionSpec::multi_select(
        "features",
        "Features:",
        vec![
            ChoiceSpec::new("schema").check(),
            ChoiceSpec::new("relations").check().disable(),
            ChoiceSpec::new("timestamps"),
        ],
    );
    let value = default_answer(&question, &AnswerPool::new())
        .expect("computable")
        .expect("multi-select always defaults");
    assert_eq!(value, json!(["schema"]));
}

#[test]
fn multi_select_drops_unmatched_and_disabled_entries() {
    let question = QuestionSpec::multi_select(
        "features",
        "Features:",
        vec![
            ChoiceSpec::new("schema"),
            ChoiceSpec::new("relations").disable(),
            ChoiceSpec::new("timestamps"),
        ],
    )
    .with_default(json!(["schema", "relations", "unknown", 2]));

    let value = default_answer(&question, &AnswerPool::new())
        .expect("computable")
        .expect("multi-select always defaults");
    assert_eq!(value, json!(["schema", "timestamps"]));
}

#[test]
fn computed_default_reads_earlier_answers() {
    let question = QuestionSpec::input("endpoint", "Endpoint:").with_computed_default(|pool| {
        match pool.get_str("name") {
            Some(name) => Value::String(format!("{}s", name.to_lowercase())),
            None => Value::Null,
        }
    });

    let mut pool = AnswerPool::new();
    pool.insert("name", json!("Order"));
    let value = default_answer(&question, &pool)
        .expect("computable")
        .expect("derived from the pool");
    assert_eq!(value, json!("orders"));
}

#[test]
fn computed_null_counts_as_no_default() {
    let question =
        QuestionSpec::input("endpoint", "Endpoint:").with_computed_default(|_| Value::Null);
    let value = default_answer(&question, &AnswerPool::new()).expect("computable");
    assert_eq!(value, None);
}

#[test]
fn pool_value_pre_fills_before_the_default() {
    let question = QuestionSpec::input("name", "Name:").with_default(json!("Widget"));
    let mut pool = AnswerPool::new();
    pool.insert("name", json!("Order"));
    let value = default_answer(&question, &pool)
        .expect("computable")
        .expect("pool wins");
    assert_eq!(value, json!("Order"));
}
