use std::fs;

use surveyor::answers::AnswerStore;
use surveyor::geo::{Geography, UnitLevel};
use surveyor::i18n::Locale;
use surveyor::model::{Question, QuestionKind, QuestionType, SubQuestion};
use surveyor::render::{
    Activation, Interaction, PickTarget, QuestionRef, Registry, RenderContext, TextTarget,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn geography() -> Geography {
    let raw = fs::read_to_string("fixtures/geo.json").expect("Cannot read fixture");
    Geography::from_json(&raw).unwrap()
}

fn context<'a>(
    target: QuestionRef<'a>,
    answers: &'a AnswerStore,
    cursor: Option<usize>,
) -> RenderContext<'a> {
    RenderContext {
        target,
        answers,
        labels: Locale::En.labels(),
        cursor,
    }
}

#[test]
fn test_every_known_type_has_a_renderer() {
    let registry = Registry::with_defaults();
    for ty in QuestionType::ALL {
        let question = Question::new("Q", QuestionKind::empty(ty));
        assert!(registry.lookup(&question).is_some(), "no renderer for {}", ty);
    }
}

#[test]
fn test_unknown_type_renders_nothing() {
    let registry = Registry::with_defaults();
    let geo = Geography::empty();
    let question = Question::new("Rate us", QuestionKind::Other("rating".into()));
    let target = QuestionRef {
        id: "legacy",
        question: &question,
        geography: &geo,
    };
    let mut answers = AnswerStore::new();

    let ctx = context(target, &answers, Some(0));
    assert!(registry.render(&ctx).is_empty());
    assert_eq!(registry.rows(&ctx), 0);
    assert!(registry.activate(&ctx, 0).is_none());

    let handled = registry
        .apply(&target, &mut answers, Interaction::Text("5".into()))
        .unwrap();
    assert!(!handled);
    assert!(answers.raw("legacy").is_none());
}

#[test]
fn test_registry_can_be_extended() {
    let mut registry = Registry::new();
    let question = Question::new("Name", QuestionKind::Input);
    assert!(registry.lookup(&question).is_none());

    registry.register(QuestionType::Input, surveyor::render::text::TextRenderer { multiline: false });
    assert!(registry.lookup(&question).is_some());
}

#[test]
fn test_checkbox_activation_toggles() {
    let registry = Registry::with_defaults();
    let geo = Geography::empty();
    let question = Question::new("Pets", QuestionKind::Checkbox(strings(&["Cat", "Dog"])));
    let target = QuestionRef {
        id: "pets",
        question: &question,
        geography: &geo,
    };
    let mut answers = AnswerStore::new();

    for _ in 0..2 {
        let activation = registry.activate(&context(target, &answers, Some(1)), 1);
        let Some(Activation::Apply(interaction)) = activation else {
            panic!("expected an apply, got {:?}", activation);
        };
        registry.apply(&target, &mut answers, interaction).unwrap();
    }
    assert!(answers.set_values("pets").is_empty());

    let activation = registry.activate(&context(target, &answers, Some(1)), 1);
    assert_eq!(
        activation,
        Some(Activation::Apply(Interaction::Toggle {
            option: 1,
            checked: true
        }))
    );
}

#[test]
fn test_wrong_interaction_is_rejected() {
    let registry = Registry::with_defaults();
    let geo = Geography::empty();
    let question = Question::new("Agree", QuestionKind::Radio(strings(&["Yes", "No"])));
    let target = QuestionRef {
        id: "agree",
        question: &question,
        geography: &geo,
    };
    let mut answers = AnswerStore::new();

    let err = registry
        .apply(&target, &mut answers, Interaction::Text("Yes".into()))
        .unwrap_err();
    assert!(matches!(err, surveyor::Error::WrongKind { .. }));
    assert!(answers.raw("agree").is_none());
}

#[test]
fn test_unit_cascade_clears_lower_levels() {
    let registry = Registry::with_defaults();
    let geo = geography();
    let question = Question::new("Home", QuestionKind::Unit);
    let target = QuestionRef {
        id: "home",
        question: &question,
        geography: &geo,
    };
    let mut answers = AnswerStore::new();

    let pick = |level, key: &str| Interaction::Unit {
        level,
        key: key.to_string(),
    };
    registry
        .apply(&target, &mut answers, pick(UnitLevel::Province, "01"))
        .unwrap();
    registry
        .apply(&target, &mut answers, pick(UnitLevel::District, "001"))
        .unwrap();
    registry
        .apply(&target, &mut answers, pick(UnitLevel::Ward, "00004"))
        .unwrap();
    assert_eq!(answers.set_values("home"), strings(&["01", "001", "00004"]));

    registry
        .apply(&target, &mut answers, pick(UnitLevel::Province, "79"))
        .unwrap();
    assert_eq!(answers.set_values("home"), strings(&["79"]));

    // District of another province.
    assert!(registry
        .apply(&target, &mut answers, pick(UnitLevel::District, "001"))
        .is_err());
    assert_eq!(answers.set_values("home"), strings(&["79"]));
}

#[test]
fn test_unit_picker_waits_for_parent() {
    let registry = Registry::with_defaults();
    let geo = geography();
    let question = Question::new("Home", QuestionKind::Unit);
    let target = QuestionRef {
        id: "home",
        question: &question,
        geography: &geo,
    };
    let answers = AnswerStore::new();
    let ctx = context(target, &answers, Some(1));

    assert!(registry.activate(&ctx, 1).is_none());
    match registry.activate(&ctx, 0) {
        Some(Activation::Pick {
            options, target, ..
        }) => {
            assert_eq!(target, PickTarget::Unit(UnitLevel::Province));
            assert_eq!(options.len(), 2);
            assert_eq!(options[0].label, "Ha Noi");
        }
        other => panic!("expected a picker, got {:?}", other),
    }
}

#[test]
fn test_group_rows_add_and_remove_instances() {
    let registry = Registry::with_defaults();
    let geo = Geography::empty();
    let question = Question::new(
        "Children",
        QuestionKind::QuestionGroup(vec![
            SubQuestion {
                content: "Name".into(),
                placeholder: None,
            },
            SubQuestion {
                content: "Year".into(),
                placeholder: Some("e.g. 2015".into()),
            },
        ]),
    );
    let target = QuestionRef {
        id: "kids",
        question: &question,
        geography: &geo,
    };
    let mut answers = AnswerStore::new();

    // One implicit instance: two cells and the add row.
    let ctx = context(target, &answers, None);
    assert_eq!(registry.rows(&ctx), 3);
    assert_eq!(
        registry.activate(&ctx, 2),
        Some(Activation::Apply(Interaction::AddInstance))
    );
    match registry.activate(&ctx, 1) {
        Some(Activation::EditText {
            target, placeholder, ..
        }) => {
            assert_eq!(target, TextTarget::GroupCell { instance: 0, field: 1 });
            assert_eq!(placeholder, "e.g. 2015");
        }
        other => panic!("expected a text edit, got {:?}", other),
    }

    registry
        .apply(&target, &mut answers, Interaction::AddInstance)
        .unwrap();
    assert_eq!(answers.group_len("kids"), 2);

    // Two instances: 2 cells, 2 cells, remove, add.
    let ctx = context(target, &answers, None);
    assert_eq!(registry.rows(&ctx), 6);
    assert_eq!(
        registry.activate(&ctx, 4),
        Some(Activation::Apply(Interaction::RemoveInstance(1)))
    );

    registry
        .apply(&target, &mut answers, Interaction::RemoveInstance(1))
        .unwrap();
    assert_eq!(answers.group_len("kids"), 1);
}

#[test]
fn test_add_instance_on_stored_group_appends_one() {
    let registry = Registry::with_defaults();
    let geo = Geography::empty();
    let question = Question::new(
        "Children",
        QuestionKind::QuestionGroup(vec![SubQuestion {
            content: "Name".into(),
            placeholder: None,
        }]),
    );
    let target = QuestionRef {
        id: "kids",
        question: &question,
        geography: &geo,
    };
    let mut answers = AnswerStore::new();
    answers.record_group_cell("kids", 0, 0, "An".to_string()).unwrap();
    assert_eq!(answers.group_len("kids"), 1);

    registry
        .apply(&target, &mut answers, Interaction::AddInstance)
        .unwrap();

    assert_eq!(answers.group_len("kids"), 2);
    assert_eq!(answers.group("kids")[0], vec!["An".to_string()]);
}
