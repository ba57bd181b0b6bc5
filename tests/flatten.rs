use std::fs;

use surveyor::answers::AnswerStore;
use surveyor::flatten::{columns, display_value, flatten, RowFill};
use surveyor::geo::Geography;
use surveyor::model::{Question, QuestionKind, Response, SubQuestion, Survey};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn response(id: &str, answers: &str) -> Response {
    Response {
        id: id.to_string(),
        survey_id: "s1".to_string(),
        user: None,
        answers: answers.to_string(),
        created_at: 0,
    }
}

fn radio_and_group() -> Survey {
    let mut survey = Survey::new("s1", "Household");
    survey.questions.insert(
        "agree".into(),
        Question::new("Agree?", QuestionKind::Radio(strings(&["Yes", "No"]))),
    );
    survey.questions.insert(
        "members".into(),
        Question::new(
            "Members",
            QuestionKind::QuestionGroup(vec![SubQuestion {
                content: "Detail".into(),
                placeholder: None,
            }]),
        ),
    );
    survey
}

fn geography() -> Geography {
    let raw = fs::read_to_string("fixtures/geo.json").expect("Cannot read fixture");
    Geography::from_json(&raw).unwrap()
}

#[test]
fn test_group_instances_expand_rows() {
    let survey = radio_and_group();
    let responses = vec![
        response("a", r#"{"agree":"0","members":[["x"],["y"]]}"#),
        response("b", r#"{"agree":"1"}"#),
    ];

    let report = flatten(&survey, &responses, &Geography::empty(), RowFill::Blank);

    assert_eq!(report.table.header, strings(&["Agree?", "Members - Detail"]));
    assert_eq!(
        report.table.rows,
        vec![
            strings(&["Yes", "x"]),
            strings(&["", "y"]),
            strings(&["No", ""]),
        ]
    );
    assert!(report.skipped.is_empty());
}

#[test]
fn test_duplicate_fill_repeats_plain_columns() {
    let survey = radio_and_group();
    let responses = vec![response("a", r#"{"agree":"0","members":[["x"],["y"]]}"#)];

    let report = flatten(&survey, &responses, &Geography::empty(), RowFill::Duplicate);

    assert_eq!(
        report.table.rows,
        vec![strings(&["Yes", "x"]), strings(&["Yes", "y"])]
    );
}

#[test]
fn test_renamed_option_shows_current_label() {
    let mut survey = radio_and_group();
    let responses = vec![response("a", r#"{"agree":"0"}"#)];

    survey.questions.insert(
        "agree".into(),
        Question::new("Agree?", QuestionKind::Radio(strings(&["Absolutely", "No"]))),
    );
    let report = flatten(&survey, &responses, &Geography::empty(), RowFill::Blank);

    assert_eq!(report.table.rows[0][0], "Absolutely");
}

#[test]
fn test_checkbox_and_unit_display() {
    let mut survey = Survey::new("s1", "Profile");
    survey.questions.insert(
        "langs".into(),
        Question::new("Languages", QuestionKind::Checkbox(strings(&["EN", "FR", "JA"]))),
    );
    survey
        .questions
        .insert("home".into(), Question::new("Home", QuestionKind::Unit));

    let mut answers = AnswerStore::new();
    answers.record_set("langs", 2, true).unwrap();
    answers.record_set("langs", 0, true).unwrap();
    answers
        .record_path("home", strings(&["01", "001", "00004"]))
        .unwrap();
    let responses = vec![response("a", &answers.encode().unwrap())];

    let report = flatten(&survey, &responses, &geography(), RowFill::Blank);

    assert_eq!(
        report.table.rows,
        vec![strings(&["JA, EN", "Ha Noi - Ba Dinh - Truc Bach"])]
    );
}

#[test]
fn test_malformed_response_is_skipped() {
    let survey = radio_and_group();
    let responses = vec![
        response("bad", "not json"),
        response("good", r#"{"agree":"1"}"#),
    ];

    let report = flatten(&survey, &responses, &Geography::empty(), RowFill::Blank);

    assert_eq!(report.skipped, vec!["bad"]);
    assert_eq!(report.table.rows, vec![strings(&["No", ""])]);
}

#[test]
fn test_unknown_answer_ids_are_ignored() {
    let survey = radio_and_group();
    let responses = vec![response("a", r#"{"gone":"x","agree":"0"}"#)];
    let report = flatten(&survey, &responses, &Geography::empty(), RowFill::Blank);
    assert_eq!(report.table.rows, vec![strings(&["Yes", ""])]);
}

#[test]
fn test_display_value_follows_question_kind() {
    let survey = radio_and_group();
    let rating = Question::new("Rate us", QuestionKind::Other("rating".into()));
    let blob = r#"{"agree":"7","members":[["x","1"],["y"]],"rating":"4"}"#;
    let answers = AnswerStore::decode(blob).unwrap();
    let geo = Geography::empty();

    let agree = survey.question("agree").unwrap();
    let members = survey.question("members").unwrap();
    assert_eq!(display_value(agree, "agree", &answers, &geo), "");
    assert_eq!(display_value(members, "members", &answers, &geo), "x, 1; y");
    assert_eq!(display_value(&rating, "rating", &answers, &geo), "4");
    assert_eq!(display_value(agree, "missing", &answers, &geo), "");
}

#[test]
fn test_columns_follow_schema_order() {
    let raw = fs::read_to_string("fixtures/survey.yaml").expect("Cannot read fixture");
    let survey: Survey = serde_yaml::from_str(&raw).unwrap();
    let labels: Vec<String> = columns(&survey).into_iter().map(|c| c.label).collect();
    assert_eq!(
        labels,
        strings(&[
            "Full name",
            "Short biography",
            "Contract type",
            "Office",
            "Languages",
            "Children - Name",
            "Children - Year of birth",
            "Home address",
            "Rate us",
        ])
    );
}
