use indexmap::IndexMap;

use crate::answers::AnswerStore;
use crate::i18n::{Labels, Locale};
use crate::model::Survey;

/// Question id -> error message, in survey display order.
pub type ErrorMap = IndexMap<String, String>;

/// Required-ness check with the default locale's message.
pub fn validate(survey: &Survey, answers: &AnswerStore) -> ErrorMap {
    validate_with(survey, answers, Locale::default().labels())
}

/// Flag every required question whose answer is absent, an empty string or
/// an empty list. Presence is the only rule: a required questionGroup with
/// one blank instance passes. Questions of unknown type cannot be answered
/// here and are not checked.
pub fn validate_with(survey: &Survey, answers: &AnswerStore, labels: &Labels) -> ErrorMap {
    survey
        .renderable()
        .filter(|(id, q)| q.required && !answers.is_answered(id))
        .map(|(id, _)| (id.clone(), labels.required_message.to_string()))
        .collect()
}

pub fn can_submit(errors: &ErrorMap) -> bool {
    errors.is_empty()
}
