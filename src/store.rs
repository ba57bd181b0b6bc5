//! Document store for surveys and responses.
//!
//! [`FileStore`] keeps one JSON document per record under a data directory:
//! `surveys/<id>.json`, `responses/<id>.json` and `users/<email>.json`.
//! [`MemoryStore`] backs tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::auth::Identity;
use crate::error::{Error, Result};
use crate::model::{generate_id, now_millis, NewResponse, Response, Survey};

/// Field-equality filter for queries, e.g. `unit -> "hr"`.
pub type Filter = BTreeMap<String, Value>;

pub trait SurveyStore {
    fn get_survey(&self, id: &str) -> Result<Option<Survey>>;

    fn query_surveys(&self, filter: &Filter) -> Result<Vec<Survey>>;

    /// Store `survey`; an empty id is replaced by a generated one.
    fn create_survey(&self, survey: Survey) -> Result<String>;

    /// Shallow-merge `patch` into the stored survey document.
    fn update_survey(&self, id: &str, patch: Map<String, Value>) -> Result<()>;

    /// Deleting a survey that is already gone succeeds.
    fn delete_survey(&self, id: &str) -> Result<()>;

    fn query_responses(&self, survey_id: &str) -> Result<Vec<Response>>;

    fn create_response(&self, response: NewResponse) -> Result<String>;

    fn delete_responses(&self, survey_id: &str) -> Result<()>;
}

/// The registered users, keyed by email. Only registered users can sign in.
pub trait UserStore {
    fn get_user(&self, email: &str) -> Result<Option<Identity>>;

    fn query_users(&self, filter: &Filter) -> Result<Vec<Identity>>;

    /// Store `user` under its email, replacing any existing record.
    fn create_user(&self, user: Identity) -> Result<String>;

    /// Shallow-merge `patch` into the stored user; the email never changes.
    fn update_user(&self, email: &str, patch: Map<String, Value>) -> Result<()>;

    /// Deleting a user that is already gone succeeds.
    fn delete_user(&self, email: &str) -> Result<()>;
}

fn matches<T: Serialize>(record: &T, filter: &Filter) -> Result<bool> {
    if filter.is_empty() {
        return Ok(true);
    }
    let doc = serde_json::to_value(record)?;
    Ok(filter
        .iter()
        .all(|(field, want)| doc.get(field).unwrap_or(&Value::Null) == want))
}

fn retain_matching<T: Serialize>(records: Vec<T>, filter: &Filter) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        if matches(&record, filter)? {
            out.push(record);
        }
    }
    Ok(out)
}

/// Shallow merge; `key` names the identity field, which the patch cannot touch.
fn merge<T: Serialize + DeserializeOwned>(
    record: &T,
    key: &str,
    patch: Map<String, Value>,
) -> Result<T> {
    let mut doc = serde_json::to_value(record)?;
    if let Value::Object(fields) = &mut doc {
        for (k, v) in patch {
            if k != key {
                fields.insert(k, v);
            }
        }
    }
    Ok(serde_json::from_value(doc)?)
}

/// Record ids become file names; anything that could leave its directory is
/// rejected.
fn check_id(id: &str) -> Result<&str> {
    let bad = id.is_empty()
        || id == "."
        || id.contains(['/', '\\', '\0'])
        || id.contains("..");
    if bad {
        return Err(Error::InvalidId(id.to_string()));
    }
    Ok(id)
}

fn sort_responses(responses: &mut [Response]) {
    responses.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        for dir in ["surveys", "responses", "users"] {
            let path = root.join(dir);
            fs::create_dir_all(&path).map_err(|e| Error::io(&path, e))?;
        }
        Ok(Self { root })
    }

    fn record_path(&self, dir: &str, id: &str) -> Result<PathBuf> {
        Ok(self.root.join(dir).join(format!("{}.json", check_id(id)?)))
    }

    fn survey_path(&self, id: &str) -> Result<PathBuf> {
        self.record_path("surveys", id)
    }

    fn response_path(&self, id: &str) -> Result<PathBuf> {
        self.record_path("responses", id)
    }

    fn user_path(&self, email: &str) -> Result<PathBuf> {
        self.record_path("users", email)
    }

    /// Every record in `dir`. A record that cannot be read is skipped with a
    /// warning so one bad file does not hide the rest.
    fn read_all<T: DeserializeOwned>(&self, dir: &str) -> Result<Vec<T>> {
        let dir = self.root.join(dir);
        let entries = fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))?;
        let mut items = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::io(&dir, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_doc(&path) {
                Ok(item) => items.push(item),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable record"),
            }
        }
        Ok(items)
    }
}

fn read_doc<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&raw).map_err(|source| Error::Document {
        path: path.to_path_buf(),
        source,
    })
}

fn write_doc<T: Serialize>(path: &Path, doc: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(doc)?;
    atomic_write(path, &json)
}

pub(crate) fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content).map_err(|e| Error::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| Error::io(path, e))?;
    Ok(())
}

impl SurveyStore for FileStore {
    fn get_survey(&self, id: &str) -> Result<Option<Survey>> {
        let path = self.survey_path(id)?;
        if !path.exists() {
            return Ok(None);
        }
        read_doc(&path).map(Some)
    }

    fn query_surveys(&self, filter: &Filter) -> Result<Vec<Survey>> {
        let mut surveys = retain_matching(self.read_all::<Survey>("surveys")?, filter)?;
        surveys.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(surveys)
    }

    fn create_survey(&self, mut survey: Survey) -> Result<String> {
        if survey.id.is_empty() {
            let surveys = self.root.join("surveys");
            survey.id = generate_id("", 12, |id| surveys.join(format!("{}.json", id)).exists());
        }
        write_doc(&self.survey_path(&survey.id)?, &survey)?;
        tracing::info!(survey = %survey.id, "survey created");
        Ok(survey.id)
    }

    fn update_survey(&self, id: &str, patch: Map<String, Value>) -> Result<()> {
        let current = self
            .get_survey(id)?
            .ok_or_else(|| Error::SurveyNotFound(id.to_string()))?;
        let updated = merge(&current, "id", patch)?;
        write_doc(&self.survey_path(id)?, &updated)?;
        tracing::info!(survey = %id, "survey updated");
        Ok(())
    }

    fn delete_survey(&self, id: &str) -> Result<()> {
        let path = self.survey_path(id)?;
        if !path.exists() {
            tracing::debug!(survey = %id, "survey already deleted");
            return Ok(());
        }
        fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        tracing::info!(survey = %id, "survey deleted");
        Ok(())
    }

    fn query_responses(&self, survey_id: &str) -> Result<Vec<Response>> {
        let mut responses: Vec<Response> = self.read_all("responses")?;
        responses.retain(|r| r.survey_id == survey_id);
        sort_responses(&mut responses);
        Ok(responses)
    }

    fn create_response(&self, response: NewResponse) -> Result<String> {
        let responses = self.root.join("responses");
        let id = generate_id("", 12, |id| responses.join(format!("{}.json", id)).exists());
        let record = Response {
            id: id.clone(),
            survey_id: response.survey_id,
            user: response.user,
            answers: response.answers,
            created_at: now_millis(),
        };
        write_doc(&self.response_path(&id)?, &record)?;
        tracing::info!(survey = %record.survey_id, response = %id, "response stored");
        Ok(id)
    }

    fn delete_responses(&self, survey_id: &str) -> Result<()> {
        let responses = self.query_responses(survey_id)?;
        for response in &responses {
            let path = self.response_path(&response.id)?;
            fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        }
        tracing::info!(survey = %survey_id, count = responses.len(), "responses deleted");
        Ok(())
    }
}

impl UserStore for FileStore {
    fn get_user(&self, email: &str) -> Result<Option<Identity>> {
        let path = self.user_path(email)?;
        if !path.exists() {
            return Ok(None);
        }
        read_doc(&path).map(Some)
    }

    fn query_users(&self, filter: &Filter) -> Result<Vec<Identity>> {
        let mut users = retain_matching(self.read_all::<Identity>("users")?, filter)?;
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    fn create_user(&self, user: Identity) -> Result<String> {
        write_doc(&self.user_path(&user.email)?, &user)?;
        tracing::info!(action = "user/addUser", user = %user.email, "user registered");
        Ok(user.email)
    }

    fn update_user(&self, email: &str, patch: Map<String, Value>) -> Result<()> {
        let current = self
            .get_user(email)?
            .ok_or_else(|| Error::UserNotFound(email.to_string()))?;
        let updated = merge(&current, "email", patch)?;
        write_doc(&self.user_path(email)?, &updated)?;
        tracing::info!(action = "user/updateUser", user = %email, "user updated");
        Ok(())
    }

    fn delete_user(&self, email: &str) -> Result<()> {
        let path = self.user_path(email)?;
        if path.exists() {
            fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
            tracing::info!(action = "user/deleteUser", user = %email, "user deleted");
        }
        Ok(())
    }
}

#[derive(Default)]
struct Tables {
    surveys: IndexMap<String, Survey>,
    responses: Vec<Response>,
    users: IndexMap<String, Identity>,
}

/// In-process store. Responses are returned in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SurveyStore for MemoryStore {
    fn get_survey(&self, id: &str) -> Result<Option<Survey>> {
        Ok(self.tables().surveys.get(id).cloned())
    }

    fn query_surveys(&self, filter: &Filter) -> Result<Vec<Survey>> {
        let surveys: Vec<Survey> = self.tables().surveys.values().cloned().collect();
        retain_matching(surveys, filter)
    }

    fn create_survey(&self, mut survey: Survey) -> Result<String> {
        let mut tables = self.tables();
        if survey.id.is_empty() {
            survey.id = generate_id("", 12, |id| tables.surveys.contains_key(id));
        }
        let id = survey.id.clone();
        tables.surveys.insert(id.clone(), survey);
        Ok(id)
    }

    fn update_survey(&self, id: &str, patch: Map<String, Value>) -> Result<()> {
        let mut tables = self.tables();
        let current = tables
            .surveys
            .get(id)
            .ok_or_else(|| Error::SurveyNotFound(id.to_string()))?;
        let updated = merge(current, "id", patch)?;
        tables.surveys.insert(id.to_string(), updated);
        Ok(())
    }

    fn delete_survey(&self, id: &str) -> Result<()> {
        self.tables().surveys.shift_remove(id);
        Ok(())
    }

    fn query_responses(&self, survey_id: &str) -> Result<Vec<Response>> {
        Ok(self
            .tables()
            .responses
            .iter()
            .filter(|r| r.survey_id == survey_id)
            .cloned()
            .collect())
    }

    fn create_response(&self, response: NewResponse) -> Result<String> {
        let mut tables = self.tables();
        let id = generate_id("", 12, |id| tables.responses.iter().any(|r| r.id == id));
        tables.responses.push(Response {
            id: id.clone(),
            survey_id: response.survey_id,
            user: response.user,
            answers: response.answers,
            created_at: now_millis(),
        });
        Ok(id)
    }

    fn delete_responses(&self, survey_id: &str) -> Result<()> {
        self.tables().responses.retain(|r| r.survey_id != survey_id);
        Ok(())
    }
}

impl UserStore for MemoryStore {
    fn get_user(&self, email: &str) -> Result<Option<Identity>> {
        Ok(self.tables().users.get(email).cloned())
    }

    fn query_users(&self, filter: &Filter) -> Result<Vec<Identity>> {
        let users: Vec<Identity> = self.tables().users.values().cloned().collect();
        retain_matching(users, filter)
    }

    fn create_user(&self, user: Identity) -> Result<String> {
        let email = user.email.clone();
        self.tables().users.insert(email.clone(), user);
        Ok(email)
    }

    fn update_user(&self, email: &str, patch: Map<String, Value>) -> Result<()> {
        let mut tables = self.tables();
        let current = tables
            .users
            .get(email)
            .ok_or_else(|| Error::UserNotFound(email.to_string()))?;
        let updated = merge(current, "email", patch)?;
        tables.users.insert(email.to_string(), updated);
        Ok(())
    }

    fn delete_user(&self, email: &str) -> Result<()> {
        self.tables().users.shift_remove(email);
        Ok(())
    }
}
