use serde_json::json;
use surveyor::answers::{Answer, AnswerStore};
use surveyor::model::{Question, QuestionKind, Survey};
use surveyor::validate::{can_submit, validate};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_checkbox_toggle_on_then_off_restores_set() {
    let mut answers = AnswerStore::new();
    answers.record_set("langs", 2, true).unwrap();
    answers.record_set("langs", 0, true).unwrap();
    let before = answers.set_values("langs");

    answers.record_set("langs", 1, true).unwrap();
    answers.record_set("langs", 1, false).unwrap();

    assert_eq!(answers.set_values("langs"), before);
}

#[test]
fn test_checkbox_keeps_click_order() {
    let mut answers = AnswerStore::new();
    answers.record_set("langs", 2, true).unwrap();
    answers.record_set("langs", 0, true).unwrap();
    answers.record_set("langs", 2, true).unwrap();
    assert_eq!(answers.set_values("langs"), strings(&["2", "0"]));
}

#[test]
fn test_append_group_instance_n_times() {
    let mut answers = AnswerStore::new();
    for expected in 0..3 {
        assert_eq!(answers.append_group_instance("kids").unwrap(), expected);
    }
    assert_eq!(answers.as_value()["kids"], json!([[], [], []]));
}

#[test]
fn test_group_cell_pads_earlier_fields() {
    let mut answers = AnswerStore::new();
    answers.record_group_cell("kids", 0, 2, "2015").unwrap();
    assert_eq!(answers.group("kids"), vec![strings(&["", "", "2015"])]);

    answers.record_group_cell("kids", 0, 0, "An").unwrap();
    assert_eq!(answers.group("kids"), vec![strings(&["An", "", "2015"])]);
}

#[test]
fn test_group_cell_rejects_skipped_instance() {
    let mut answers = AnswerStore::new();
    assert!(answers.record_group_cell("kids", 1, 0, "x").is_err());
    assert!(answers.raw("kids").is_none());
}

#[test]
fn test_remove_group_instance() {
    let mut answers = AnswerStore::new();
    answers.record_group_cell("kids", 0, 0, "a").unwrap();
    answers.record_group_cell("kids", 1, 0, "b").unwrap();
    answers.record_group_cell("kids", 2, 0, "c").unwrap();

    answers.remove_group_instance("kids", 1).unwrap();

    assert_eq!(answers.group("kids"), vec![strings(&["a"]), strings(&["c"])]);
    assert!(answers.remove_group_instance("kids", 5).is_err());
}

#[test]
fn test_typed_answer_follows_question_kind() {
    let mut answers = AnswerStore::new();
    answers.record_scalar("contract", "1").unwrap();
    answers.record_path("home", strings(&["01", "001"])).unwrap();

    let radio = Question::new("Contract", QuestionKind::Radio(strings(&["A", "B"])));
    let unit = Question::new("Home", QuestionKind::Unit);
    let unknown = Question::new("Rate", QuestionKind::Other("rating".into()));

    assert_eq!(answers.answer("contract", &radio), Some(Answer::Scalar("1".into())));
    assert_eq!(answers.answer("home", &unit), Some(Answer::Set(strings(&["01", "001"]))));
    assert_eq!(answers.answer("contract", &unknown), None);
}

#[test]
fn test_encode_decode_keeps_order() {
    let mut answers = AnswerStore::new();
    answers.record_scalar("z", "last").unwrap();
    answers.record_scalar("a", "first").unwrap();
    let blob = answers.encode().unwrap();
    assert_eq!(blob, r#"{"z":"last","a":"first"}"#);
    assert_eq!(AnswerStore::decode(&blob).unwrap(), answers);
}

fn one_required_input() -> Survey {
    let mut survey = Survey::new("s1", "Gate");
    survey
        .questions
        .insert("q1".into(), Question::new("Name", QuestionKind::Input).required());
    survey
}

#[test]
fn test_required_field_gate() {
    let survey = one_required_input();

    let errors = validate(&survey, &AnswerStore::new());
    assert_eq!(errors.len(), 1);
    assert!(errors.contains_key("q1"));
    assert!(!can_submit(&errors));

    let mut answers = AnswerStore::new();
    answers.record_scalar("q1", "x").unwrap();
    assert!(validate(&survey, &answers).is_empty());
}

#[test]
fn test_empty_values_count_as_missing() {
    let mut survey = one_required_input();
    survey.questions.insert(
        "q2".into(),
        Question::new("Pets", QuestionKind::Checkbox(strings(&["Cat"]))).required(),
    );
    let mut answers = AnswerStore::new();
    answers.record_scalar("q1", "").unwrap();
    answers.record_set("q2", 0, true).unwrap();
    answers.record_set("q2", 0, false).unwrap();

    let errors = validate(&survey, &answers);
    assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["q1", "q2"]);
}

#[test]
fn test_whitespace_answer_is_present() {
    let survey = one_required_input();
    let mut answers = AnswerStore::new();
    answers.record_scalar("q1", "   ").unwrap();
    assert!(validate(&survey, &answers).is_empty());
}

#[test]
fn test_unknown_type_is_not_validated() {
    let mut survey = Survey::new("s1", "Gate");
    survey.questions.insert(
        "q9".into(),
        Question::new("Rate", QuestionKind::Other("rating".into())).required(),
    );
    assert!(validate(&survey, &AnswerStore::new()).is_empty());
}
