use std::fs;
use std::path::Path;

use surveyor::answers::AnswerStore;
use surveyor::geo::Geography;
use surveyor::i18n::Locale;
use surveyor::import::read_options;
use surveyor::model::{Response, Survey};
use surveyor::results::{detail_lines, summarize};

fn fixture_survey() -> Survey {
    let raw = fs::read_to_string("fixtures/survey.yaml").expect("Cannot read fixture");
    serde_yaml::from_str(&raw).unwrap()
}

fn response(id: &str, answers: String) -> Response {
    Response {
        id: id.to_string(),
        survey_id: "staff2024".to_string(),
        user: Some("lan@example.org".to_string()),
        answers,
        created_at: 1_700_000_000_000,
    }
}

#[test]
fn test_summary_counts_answered_questions() {
    let survey = fixture_survey();
    let mut answers = AnswerStore::new();
    answers.record_scalar("name", "Lan").unwrap();
    answers.record_scalar("contract", "0").unwrap();
    answers.record_scalar("bio", "").unwrap();

    let summary = summarize(
        &survey,
        &[
            response("r1", answers.encode().unwrap()),
            response("r2", "[]".to_string()),
        ],
    );

    assert_eq!(summary.questions, 7);
    assert_eq!(summary.responses[0].answered, Some(2));
    assert_eq!(summary.responses[1].answered, None);
}

#[test]
fn test_detail_lists_group_instances() {
    let survey = fixture_survey();
    let geo = Geography::from_json(&fs::read_to_string("fixtures/geo.json").unwrap()).unwrap();
    let mut answers = AnswerStore::new();
    answers.record_scalar("name", "Lan").unwrap();
    answers.record_group_cell("children", 0, 0, "Minh").unwrap();
    answers.record_group_cell("children", 0, 1, "2015").unwrap();
    answers.record_group_cell("children", 1, 0, "Hoa").unwrap();
    answers
        .record_path("home", vec!["79".into(), "760".into(), "26734".into()])
        .unwrap();

    let lines = detail_lines(
        &survey,
        &response("r1", answers.encode().unwrap()),
        &geo,
        Locale::En.labels(),
    )
    .unwrap();

    assert_eq!(lines[0], "1. Full name");
    assert_eq!(lines[1], "   Lan");
    assert_eq!(lines[3], "   -");
    let children = lines.iter().position(|l| l == "6. Children").unwrap();
    assert_eq!(
        &lines[children + 1..children + 7],
        &[
            "   Response 1",
            "     Name: Minh",
            "     Year of birth: 2015",
            "   Response 2",
            "     Name: Hoa",
            "     Year of birth: ",
        ]
    );
    assert_eq!(lines.last().unwrap(), "   Ho Chi Minh - Quan 1 - Tan Dinh");
}

#[test]
fn test_detail_rejects_malformed_blob() {
    let survey = fixture_survey();
    let err = detail_lines(
        &survey,
        &response("r9", "oops".to_string()),
        &Geography::empty(),
        Locale::En.labels(),
    )
    .unwrap_err();
    assert!(matches!(err, surveyor::Error::MalformedAnswers { ref id, .. } if id == "r9"));
}

#[test]
fn test_import_options_from_csv() {
    let options = read_options(Path::new("fixtures/options.csv")).unwrap();
    assert_eq!(
        options,
        vec!["Ha Noi, capital", "Ho Chi Minh", "Da Nang", "Hue \"old\" town"]
    );
}
