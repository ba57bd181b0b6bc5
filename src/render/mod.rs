//! Question-type dispatch for the fill-in form.
//!
//! Each question type has a [`QuestionRenderer`] registered under its
//! [`QuestionType`]. A renderer draws the answer widget, exposes focusable
//! rows, turns a row activation into an [`Activation`], and applies the
//! resulting [`Interaction`] to the answer store through the store operation
//! that matches its shape. Questions whose type has no registered renderer
//! draw nothing and accept nothing.

pub mod choice;
pub mod group;
pub mod text;
pub mod unit;

use std::collections::HashMap;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::answers::AnswerStore;
use crate::error::{Error, Result};
use crate::geo::{Geography, UnitLevel};
use crate::i18n::Labels;
use crate::model::{Question, QuestionType};

/// A change requested by the respondent, rooted at one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Text(String),
    Choose(usize),
    Toggle { option: usize, checked: bool },
    GroupCell { instance: usize, field: usize, value: String },
    AddInstance,
    RemoveInstance(usize),
    Unit { level: UnitLevel, key: String },
}

impl Interaction {
    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Text(_) => "text",
            Interaction::Choose(_) => "choose",
            Interaction::Toggle { .. } => "toggle",
            Interaction::GroupCell { .. } => "group cell",
            Interaction::AddInstance => "add instance",
            Interaction::RemoveInstance(_) => "remove instance",
            Interaction::Unit { .. } => "unit level",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTarget {
    Answer,
    GroupCell { instance: usize, field: usize },
}

impl TextTarget {
    pub fn into_interaction(self, text: String) -> Interaction {
        match self {
            TextTarget::Answer => Interaction::Text(text),
            TextTarget::GroupCell { instance, field } => Interaction::GroupCell {
                instance,
                field,
                value: text,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    Choice,
    Unit(UnitLevel),
}

impl PickTarget {
    pub fn into_interaction(self, key: String) -> Option<Interaction> {
        match self {
            PickTarget::Choice => key.parse().ok().map(Interaction::Choose),
            PickTarget::Unit(level) => Some(Interaction::Unit { level, key }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickOption {
    pub key: String,
    pub label: String,
}

/// What activating a focused row asks the form to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Apply(Interaction),
    EditText {
        initial: String,
        multiline: bool,
        placeholder: String,
        target: TextTarget,
    },
    Pick {
        title: String,
        options: Vec<PickOption>,
        selected: Option<String>,
        target: PickTarget,
    },
}

/// The question being rendered or changed.
#[derive(Debug, Clone, Copy)]
pub struct QuestionRef<'a> {
    pub id: &'a str,
    pub question: &'a Question,
    pub geography: &'a Geography,
}

impl QuestionRef<'_> {
    fn wrong_interaction(&self, interaction: &Interaction) -> Error {
        Error::WrongKind {
            id: self.id.to_string(),
            expected: interaction.name(),
            actual: self.question.kind.tag().to_string(),
        }
    }
}

pub struct RenderContext<'a> {
    pub target: QuestionRef<'a>,
    pub answers: &'a AnswerStore,
    pub labels: &'a Labels,
    /// Focused row, when this question has focus.
    pub cursor: Option<usize>,
}

impl RenderContext<'_> {
    fn focused(&self, row: usize) -> bool {
        self.cursor == Some(row)
    }
}

pub trait QuestionRenderer: Send + Sync {
    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Line<'static>>;

    /// Number of focusable rows.
    fn rows(&self, ctx: &RenderContext<'_>) -> usize;

    fn activate(&self, ctx: &RenderContext<'_>, row: usize) -> Option<Activation>;

    fn apply(
        &self,
        target: &QuestionRef<'_>,
        answers: &mut AnswerStore,
        interaction: Interaction,
    ) -> Result<()>;
}

pub struct Registry {
    renderers: HashMap<QuestionType, Box<dyn QuestionRenderer>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// All seven built-in question types.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(QuestionType::Input, text::TextRenderer { multiline: false });
        registry.register(QuestionType::Textarea, text::TextRenderer { multiline: true });
        registry.register(QuestionType::Radio, choice::ChoiceRenderer { multiple: false });
        registry.register(QuestionType::Checkbox, choice::ChoiceRenderer { multiple: true });
        registry.register(QuestionType::Select, choice::SelectRenderer);
        registry.register(QuestionType::QuestionGroup, group::GroupRenderer);
        registry.register(QuestionType::Unit, unit::UnitRenderer);
        registry
    }

    pub fn register(&mut self, ty: QuestionType, renderer: impl QuestionRenderer + 'static) {
        self.renderers.insert(ty, Box::new(renderer));
    }

    pub fn lookup(&self, question: &Question) -> Option<&dyn QuestionRenderer> {
        let ty = question.question_type()?;
        self.renderers.get(&ty).map(|r| r.as_ref())
    }

    pub fn render(&self, ctx: &RenderContext<'_>) -> Vec<Line<'static>> {
        self.lookup(ctx.target.question)
            .map(|r| r.render(ctx))
            .unwrap_or_default()
    }

    pub fn rows(&self, ctx: &RenderContext<'_>) -> usize {
        self.lookup(ctx.target.question)
            .map(|r| r.rows(ctx))
            .unwrap_or(0)
    }

    pub fn activate(&self, ctx: &RenderContext<'_>, row: usize) -> Option<Activation> {
        self.lookup(ctx.target.question)?.activate(ctx, row)
    }

    /// Apply `interaction`; `Ok(false)` when no renderer handles the question.
    pub fn apply(
        &self,
        target: &QuestionRef<'_>,
        answers: &mut AnswerStore,
        interaction: Interaction,
    ) -> Result<bool> {
        match self.lookup(target.question) {
            Some(renderer) => {
                renderer.apply(target, answers, interaction)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn row_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn marker(focused: bool) -> Span<'static> {
    Span::styled(
        if focused { "  ▸ " } else { "    " },
        Style::default().fg(Color::Cyan),
    )
}

fn placeholder(text: &str) -> Span<'static> {
    Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )
}
