//! Operations spanning the form engine and the store.

use serde_json::json;

use crate::answers::AnswerStore;
use crate::auth::Identity;
use crate::error::{Error, Result};
use crate::geo::Geography;
use crate::flatten::{self, FlattenReport, RowFill};
use crate::i18n::Labels;
use crate::model::{NewResponse, Response, Survey};
use crate::store::{Filter, SurveyStore, UserStore};
use crate::validate::{self, ErrorMap};

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Stored under the returned response id.
    Stored(String),
    /// Validation failed; nothing was written.
    Rejected(ErrorMap),
}

/// Validate and, if clean, store `answers` as a new response.
pub fn submit(
    store: &dyn SurveyStore,
    survey: &Survey,
    answers: &AnswerStore,
    user: Option<&Identity>,
    labels: &Labels,
) -> Result<SubmitOutcome> {
    let errors = validate::validate_with(survey, answers, labels);
    if !validate::can_submit(&errors) {
        tracing::debug!(survey = %survey.id, errors = errors.len(), "submission rejected");
        return Ok(SubmitOutcome::Rejected(errors));
    }
    let id = store.create_response(NewResponse {
        survey_id: survey.id.clone(),
        user: user.map(|u| u.email.clone()),
        answers: answers.encode()?,
    })?;
    Ok(SubmitOutcome::Stored(id))
}

pub fn load_survey(store: &dyn SurveyStore, id: &str) -> Result<Survey> {
    store
        .get_survey(id)?
        .ok_or_else(|| Error::SurveyNotFound(id.to_string()))
}

/// Delete a survey, then its responses. The two steps are independent: when
/// the second fails the survey is already gone and
/// [`Error::OrphanedResponses`] says so. Running it again finishes the job,
/// since deleting a missing survey succeeds.
pub fn delete_survey_cascade(store: &dyn SurveyStore, id: &str) -> Result<()> {
    store.delete_survey(id)?;
    if let Err(e) = store.delete_responses(id) {
        tracing::warn!(survey = %id, error = %e, "responses left behind after survey delete");
        return Err(Error::OrphanedResponses {
            survey_id: id.to_string(),
            reason: e.to_string(),
        });
    }
    Ok(())
}

pub struct Results {
    pub survey: Survey,
    pub responses: Vec<Response>,
}

pub fn load_results(store: &dyn SurveyStore, id: &str) -> Result<Results> {
    let survey = load_survey(store, id)?;
    let responses = store.query_responses(id)?;
    Ok(Results { survey, responses })
}

/// Flatten for export. With `strict`, any undecodable response is an error.
pub fn export_table(
    results: &Results,
    geo: &Geography,
    fill: RowFill,
    strict: bool,
) -> Result<FlattenReport> {
    let report = flatten::flatten(&results.survey, &results.responses, geo, fill);
    if strict && !report.skipped.is_empty() {
        return Err(Error::SkippedResponses(report.skipped));
    }
    Ok(report)
}

/// Users visible to `viewer`. Administrators see everyone, optionally
/// narrowed to `unit`; members see their own unit only.
pub fn list_users(
    users: &dyn UserStore,
    viewer: &Identity,
    unit: Option<&str>,
) -> Result<Vec<Identity>> {
    let mut filter = Filter::new();
    if viewer.is_admin() {
        if let Some(unit) = unit {
            filter.insert("unit".to_string(), json!(unit));
        }
    } else {
        filter.insert("unit".to_string(), json!(viewer.unit));
    }
    users.query_users(&filter)
}

/// Remove a registered user. Administrators cannot remove themselves.
pub fn remove_user(users: &dyn UserStore, admin: &Identity, email: &str) -> Result<()> {
    if admin.email == email {
        return Err(Error::InvalidSelection(
            "you cannot remove your own account".to_string(),
        ));
    }
    users.delete_user(email)
}
