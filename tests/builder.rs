use serde_json::json;
use surveyor::builder::SchemaEditor;
use surveyor::model::{QuestionKind, QuestionType, Survey};
use surveyor::path::parse_path;
use surveyor::Error;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_build_survey_from_scratch() {
    let mut editor = SchemaEditor::new("s1", "Staff census").unwrap();
    editor.set_description("Yearly").unwrap();

    let name = editor.add_question(QuestionType::Input).unwrap();
    editor.set_text(&name, "Full name").unwrap();
    editor.set_required(&name, true).unwrap();

    let pets = editor.add_question(QuestionType::Checkbox).unwrap();
    editor.set_text(&pets, "Pets").unwrap();
    assert_eq!(editor.add_option(&pets, "Cat").unwrap(), 0);
    assert_eq!(editor.add_option(&pets, "Dog").unwrap(), 1);

    let survey = editor.build("lan", 1_700_000_000_000).unwrap();

    assert_eq!(survey.description, "Yearly");
    assert_eq!(survey.questions.keys().cloned().collect::<Vec<_>>(), vec![name.clone(), pets.clone()]);
    assert!(survey.questions[&name].required);
    assert_eq!(
        survey.questions[&pets].kind,
        QuestionKind::Checkbox(strings(&["Cat", "Dog"]))
    );
    let stamp = survey.last_modified.unwrap();
    assert_eq!(stamp.editor, "lan");
    assert_eq!(stamp.time, 1_700_000_000_000);
}

#[test]
fn test_generated_ids_are_prefixed_and_unique() {
    let mut editor = SchemaEditor::new("s1", "Ids").unwrap();
    let mut seen = std::collections::HashSet::new();
    for _ in 0..20 {
        let id = editor.add_question(QuestionType::Input).unwrap();
        assert!(id.starts_with('q'));
        assert_eq!(id.len(), 9);
        assert!(seen.insert(id));
    }
}

#[test]
fn test_option_edits_keep_indices() {
    let mut editor = SchemaEditor::new("s1", "Options").unwrap();
    let q = editor.add_question(QuestionType::Radio).unwrap();
    editor.set_text(&q, "Size").unwrap();
    for label in ["S", "M", "L"] {
        editor.add_option(&q, label).unwrap();
    }

    editor.update_option(&q, 1, "Medium").unwrap();
    assert!(editor.update_option(&q, 3, "XL").is_err());
    editor.remove_option(&q, 0).unwrap();

    let survey = editor.build("lan", 0).unwrap();
    assert_eq!(survey.questions[&q].params().unwrap(), strings(&["Medium", "L"]).as_slice());
}

#[test]
fn test_sub_question_edits() {
    let mut editor = SchemaEditor::new("s1", "Groups").unwrap();
    let q = editor.add_question(QuestionType::QuestionGroup).unwrap();
    editor.set_text(&q, "Children").unwrap();
    editor.add_sub_question(&q, "Name", None).unwrap();
    editor.add_sub_question(&q, "Year", Some("e.g. 2015")).unwrap();
    editor.update_sub_question(&q, 0, "Given name").unwrap();
    assert!(matches!(
        editor.add_option(&q, "nope"),
        Err(Error::WrongKind { .. })
    ));

    let survey = editor.build("lan", 0).unwrap();
    let subs = survey.questions[&q].sub_questions().unwrap();
    assert_eq!(subs[0].content, "Given name");
    assert_eq!(subs[1].placeholder.as_deref(), Some("e.g. 2015"));

    let mut editor = SchemaEditor::from_survey(&survey).unwrap();
    editor.remove_sub_question(&q, 0).unwrap();
    let survey = editor.build("lan", 0).unwrap();
    assert_eq!(survey.questions[&q].sub_questions().unwrap().len(), 1);
}

#[test]
fn test_move_and_remove_questions() {
    let mut editor = SchemaEditor::new("s1", "Order").unwrap();
    let ids: Vec<String> = (0..3)
        .map(|i| {
            let id = editor.add_question(QuestionType::Input).unwrap();
            editor.set_text(&id, &format!("Q{}", i)).unwrap();
            id
        })
        .collect();

    editor.move_question(&ids[2], 0).unwrap();
    assert_eq!(editor.question_ids(), vec![ids[2].clone(), ids[0].clone(), ids[1].clone()]);

    editor.move_question(&ids[2], 99).unwrap();
    assert_eq!(editor.question_ids(), vec![ids[0].clone(), ids[1].clone(), ids[2].clone()]);

    editor.remove_question(&ids[1]).unwrap();
    assert_eq!(editor.question_ids(), vec![ids[0].clone(), ids[2].clone()]);
    assert!(matches!(
        editor.set_text(&ids[1], "back?"),
        Err(Error::UnknownQuestion(_))
    ));
}

#[test]
fn test_set_by_path() {
    let mut editor = SchemaEditor::new("s1", "Paths").unwrap();
    let q = editor.add_question(QuestionType::Select).unwrap();
    editor.set_text(&q, "Office").unwrap();
    editor.add_option(&q, "Head office").unwrap();

    editor
        .set_path(&parse_path(&format!("{}.params.0", q)).unwrap(), json!("HQ"))
        .unwrap();
    editor
        .set_path(&parse_path("title").unwrap(), json!("Offices"))
        .unwrap();
    assert!(editor
        .set_path(&parse_path("lastModified.time").unwrap(), json!(1))
        .is_err());

    let survey = editor.build("lan", 0).unwrap();
    assert_eq!(survey.title, "Offices");
    assert_eq!(survey.questions[&q].params().unwrap(), strings(&["HQ"]).as_slice());
}

#[test]
fn test_change_type_creates_shape_fields() {
    let mut editor = SchemaEditor::new("s1", "Types").unwrap();
    let q = editor.add_question(QuestionType::Input).unwrap();
    editor.set_text(&q, "Colour").unwrap();
    editor.set_type(&q, QuestionType::Radio).unwrap();
    editor.add_option(&q, "Red").unwrap();

    let survey = editor.build("lan", 0).unwrap();
    assert_eq!(survey.questions[&q].kind, QuestionKind::Radio(strings(&["Red"])));
}

#[test]
fn test_build_rejects_empty_prompt() {
    let mut editor = SchemaEditor::new("s1", "Blank").unwrap();
    editor.add_question(QuestionType::Input).unwrap();
    assert!(matches!(editor.build("lan", 0), Err(Error::InvalidSurvey(_))));
}

#[test]
fn test_unknown_types_survive_editing() {
    let raw = std::fs::read_to_string("fixtures/survey.yaml").expect("Cannot read fixture");
    let survey: Survey = serde_yaml::from_str(&raw).unwrap();

    let mut editor = SchemaEditor::from_survey(&survey).unwrap();
    editor.set_title("Staff census 2025").unwrap();
    let rebuilt = editor.build("lan", 0).unwrap();

    assert_eq!(rebuilt.questions["legacy"].kind, QuestionKind::Other("rating".into()));
    assert_eq!(rebuilt.questions.len(), survey.questions.len());
    assert_eq!(rebuilt.id, "staff2024");
}
