//! Draft autosave for the fill-in form.
//!
//! A draft is `drafts/<survey id>.yaml` under the data directory: the
//! encoded answer store plus a fingerprint of the survey schema it was
//! filled against.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::answers::AnswerStore;
use crate::error::{Error, Result};
use crate::model::Survey;
use crate::store::atomic_write;

#[derive(Debug, Serialize, Deserialize)]
struct Draft {
    survey_hash: String,
    saved_at: String,
    answers: String,
}

#[derive(Debug)]
pub struct Restored {
    pub answers: AnswerStore,
    /// The survey changed since the draft was written.
    pub schema_changed: bool,
}

pub fn drafts_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("drafts")
}

fn draft_path(data_dir: &Path, survey_id: &str) -> PathBuf {
    drafts_dir(data_dir).join(format!("{}.yaml", survey_id))
}

pub fn save_draft(data_dir: &Path, survey: &Survey, answers: &AnswerStore) -> Result<()> {
    let dir = drafts_dir(data_dir);
    fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
    let draft = Draft {
        survey_hash: survey_hash(survey)?,
        saved_at: chrono::Utc::now().to_rfc3339(),
        answers: answers.encode()?,
    };
    atomic_write(&draft_path(data_dir, &survey.id), &serde_yaml::to_string(&draft)?)?;
    tracing::debug!(action = "draft/save", survey = %survey.id, "draft saved");
    Ok(())
}

/// `Ok(None)` when no draft exists.
pub fn load_draft(data_dir: &Path, survey: &Survey) -> Result<Option<Restored>> {
    let path = draft_path(data_dir, &survey.id);
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    let draft: Draft = serde_yaml::from_str(&raw)?;
    let answers = AnswerStore::decode(&draft.answers).map_err(|source| Error::Document {
        path: path.clone(),
        source,
    })?;
    let schema_changed = draft.survey_hash != survey_hash(survey)?;
    if schema_changed {
        tracing::warn!(survey = %survey.id, "survey changed since draft was saved");
    }
    Ok(Some(Restored {
        answers,
        schema_changed,
    }))
}

pub fn clear_draft(data_dir: &Path, survey_id: &str) -> Result<()> {
    let path = draft_path(data_dir, survey_id);
    if path.exists() {
        fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
    }
    Ok(())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn compute_str_hash(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    let result = hasher.finalize();
    format!("sha256:{}", hex_encode(&result))
}

/// Fingerprint of the question schema. Title, description and edit stamps
/// do not count.
pub fn survey_hash(survey: &Survey) -> Result<String> {
    Ok(compute_str_hash(&serde_json::to_string(&survey.questions)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, QuestionKind};

    fn survey() -> Survey {
        let mut s = Survey::new("s1", "Intake");
        s.questions
            .insert("q1".into(), Question::new("Name", QuestionKind::Input));
        s
    }

    #[test]
    fn draft_round_trip_and_schema_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut survey = survey();
        let mut answers = AnswerStore::new();
        answers.record_scalar("q1", "Lan").unwrap();
        save_draft(dir.path(), &survey, &answers).unwrap();

        let restored = load_draft(dir.path(), &survey).unwrap().unwrap();
        assert_eq!(restored.answers, answers);
        assert!(!restored.schema_changed);

        survey.title = "Renamed".into();
        assert!(!load_draft(dir.path(), &survey).unwrap().unwrap().schema_changed);

        survey.questions["q1"].required = true;
        assert!(load_draft(dir.path(), &survey).unwrap().unwrap().schema_changed);

        clear_draft(dir.path(), "s1").unwrap();
        assert!(load_draft(dir.path(), &survey).unwrap().is_none());
    }
}
