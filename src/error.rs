use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("survey not found: {0}")]
    SurveyNotFound(String),

    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    #[error("question {id} is `{actual}`, operation needs `{expected}`")]
    WrongKind {
        id: String,
        expected: &'static str,
        actual: String,
    },

    #[error("invalid path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("invalid survey: {0}")]
    InvalidSurvey(String),

    #[error("malformed answers in response {id}: {source}")]
    MalformedAnswers {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} skipped response(s) have malformed answers", .0.len())]
    SkippedResponses(Vec<String>),

    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid document {}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("sign-in required to {0}")]
    Unauthenticated(&'static str),

    #[error("{0} is not a registered user; ask an administrator for access")]
    Unregistered(String),

    #[error("only administrators can {0}")]
    Forbidden(&'static str),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("invalid record id `{0}`")]
    InvalidId(String),

    #[error("survey {survey_id} deleted but its responses were not: {reason}")]
    OrphanedResponses { survey_id: String, reason: String },

    #[error("terminal error: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("editor error: {0}")]
    Editor(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
