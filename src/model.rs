use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The closed set of question types a renderer can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionType {
    Input,
    Textarea,
    Radio,
    Select,
    Checkbox,
    QuestionGroup,
    Unit,
}

impl QuestionType {
    pub const ALL: [QuestionType; 7] = [
        QuestionType::Input,
        QuestionType::Textarea,
        QuestionType::Radio,
        QuestionType::Select,
        QuestionType::Checkbox,
        QuestionType::QuestionGroup,
        QuestionType::Unit,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            QuestionType::Input => "input",
            QuestionType::Textarea => "textarea",
            QuestionType::Radio => "radio",
            QuestionType::Select => "select",
            QuestionType::Checkbox => "checkbox",
            QuestionType::QuestionGroup => "questionGroup",
            QuestionType::Unit => "unit",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    pub fn has_options(self) -> bool {
        matches!(
            self,
            QuestionType::Radio | QuestionType::Select | QuestionType::Checkbox
        )
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubQuestion {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    Input,
    Textarea,
    Radio(Vec<String>),
    Select(Vec<String>),
    Checkbox(Vec<String>),
    QuestionGroup(Vec<SubQuestion>),
    Unit,
    /// A type tag this build does not know. Kept so the survey survives a
    /// round trip through older clients; never rendered.
    Other(String),
}

impl QuestionKind {
    pub fn question_type(&self) -> Option<QuestionType> {
        match self {
            QuestionKind::Input => Some(QuestionType::Input),
            QuestionKind::Textarea => Some(QuestionType::Textarea),
            QuestionKind::Radio(_) => Some(QuestionType::Radio),
            QuestionKind::Select(_) => Some(QuestionType::Select),
            QuestionKind::Checkbox(_) => Some(QuestionType::Checkbox),
            QuestionKind::QuestionGroup(_) => Some(QuestionType::QuestionGroup),
            QuestionKind::Unit => Some(QuestionType::Unit),
            QuestionKind::Other(_) => None,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            QuestionKind::Other(tag) => tag,
            known => known.question_type().map(QuestionType::tag).unwrap_or(""),
        }
    }

    /// Empty kind of the given type.
    pub fn empty(ty: QuestionType) -> Self {
        match ty {
            QuestionType::Input => QuestionKind::Input,
            QuestionType::Textarea => QuestionKind::Textarea,
            QuestionType::Radio => QuestionKind::Radio(Vec::new()),
            QuestionType::Select => QuestionKind::Select(Vec::new()),
            QuestionType::Checkbox => QuestionKind::Checkbox(Vec::new()),
            QuestionType::QuestionGroup => QuestionKind::QuestionGroup(Vec::new()),
            QuestionType::Unit => QuestionKind::Unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "QuestionDoc", into = "QuestionDoc")]
pub struct Question {
    pub text: String,
    pub required: bool,
    pub placeholder: Option<String>,
    pub kind: QuestionKind,
}

/// Stored shape of a question: a flat object tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDoc {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    params: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub_questions: Option<Vec<SubQuestion>>,
}

impl From<QuestionDoc> for Question {
    fn from(doc: QuestionDoc) -> Self {
        let params = doc.params.unwrap_or_default();
        let kind = match QuestionType::from_tag(&doc.kind) {
            Some(QuestionType::Input) => QuestionKind::Input,
            Some(QuestionType::Textarea) => QuestionKind::Textarea,
            Some(QuestionType::Radio) => QuestionKind::Radio(params),
            Some(QuestionType::Select) => QuestionKind::Select(params),
            Some(QuestionType::Checkbox) => QuestionKind::Checkbox(params),
            Some(QuestionType::QuestionGroup) => {
                QuestionKind::QuestionGroup(doc.sub_questions.unwrap_or_default())
            }
            Some(QuestionType::Unit) => QuestionKind::Unit,
            None => QuestionKind::Other(doc.kind),
        };
        Question {
            text: doc.text,
            required: doc.required,
            placeholder: doc.placeholder,
            kind,
        }
    }
}

impl From<Question> for QuestionDoc {
    fn from(q: Question) -> Self {
        let kind = q.kind.tag().to_string();
        let (params, sub_questions) = match q.kind {
            QuestionKind::Radio(p) | QuestionKind::Select(p) | QuestionKind::Checkbox(p) => {
                (Some(p), None)
            }
            QuestionKind::QuestionGroup(subs) => (None, Some(subs)),
            _ => (None, None),
        };
        QuestionDoc {
            kind,
            text: q.text,
            required: q.required,
            placeholder: q.placeholder,
            params,
            sub_questions,
        }
    }
}

/// One option of a choice-bearing question. Identity is `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionRef<'a> {
    pub index: usize,
    pub label: &'a str,
}

/// One sub-field of a questionGroup. Identity is `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubField<'a> {
    pub index: usize,
    pub content: &'a str,
    pub placeholder: Option<&'a str>,
}

impl Question {
    pub fn new(text: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            text: text.into(),
            required: false,
            placeholder: None,
            kind,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn question_type(&self) -> Option<QuestionType> {
        self.kind.question_type()
    }

    pub fn params(&self) -> Option<&[String]> {
        match &self.kind {
            QuestionKind::Radio(p) | QuestionKind::Select(p) | QuestionKind::Checkbox(p) => {
                Some(p)
            }
            _ => None,
        }
    }

    pub fn sub_questions(&self) -> Option<&[SubQuestion]> {
        match &self.kind {
            QuestionKind::QuestionGroup(subs) => Some(subs),
            _ => None,
        }
    }

    /// Resolve a stored option index (`"0"`, `"1"`, ...) against the current labels.
    pub fn option_label(&self, raw: &str) -> Option<&str> {
        let index: usize = raw.trim().parse().ok()?;
        self.params()?.get(index).map(String::as_str)
    }
}

/// Ordered options of a radio/select/checkbox question.
///
/// # Panics
///
/// On any other question kind; asking a text question for options is a bug
/// in the caller.
pub fn options_of(question: &Question) -> Vec<OptionRef<'_>> {
    match question.params() {
        Some(params) => params
            .iter()
            .enumerate()
            .map(|(index, label)| OptionRef { index, label })
            .collect(),
        None => panic!("options_of called on a `{}` question", question.kind.tag()),
    }
}

/// Ordered sub-fields of a questionGroup question.
///
/// # Panics
///
/// On any other question kind.
pub fn sub_fields_of(question: &Question) -> Vec<SubField<'_>> {
    match question.sub_questions() {
        Some(subs) => subs
            .iter()
            .enumerate()
            .map(|(index, s)| SubField {
                index,
                content: &s.content,
                placeholder: s.placeholder.as_deref(),
            })
            .collect(),
        None => panic!("sub_fields_of called on a `{}` question", question.kind.tag()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastModified {
    /// Milliseconds since the Unix epoch.
    pub time: i64,
    pub editor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Keyed by stable question id, iterated in display order.
    #[serde(default)]
    pub questions: IndexMap<String, Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<LastModified>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Survey {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            questions: IndexMap::new(),
            last_modified: None,
            unit: None,
        }
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.get(id)
    }

    /// Questions a renderer exists for, in display order.
    pub fn renderable(&self) -> impl Iterator<Item = (&String, &Question)> {
        self.questions
            .iter()
            .filter(|(_, q)| q.question_type().is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub id: String,
    pub survey_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Encoded answer store, see [`crate::answers::AnswerStore::encode`].
    pub answers: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

/// A response before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResponse {
    pub survey_id: String,
    pub user: Option<String>,
    pub answers: String,
}

/// Short random id, regenerated while `taken` reports a collision.
pub fn generate_id(prefix: &str, size: usize, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let raw = uuid::Uuid::new_v4().simple().to_string();
        let id = format!("{}{}", prefix, &raw[..size.clamp(1, raw.len())]);
        if !taken(&id) {
            return id;
        }
    }
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
