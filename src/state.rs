use crate::answers::AnswerStore;
use crate::error::Result;
use crate::geo::Geography;
use crate::i18n::{Labels, Locale};
use crate::model::{Question, QuestionKind, Survey};
use crate::render::{
    Activation, Interaction, PickOption, PickTarget, QuestionRef, Registry, RenderContext,
    TextTarget,
};
use crate::validate::{self, ErrorMap};

#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    ConfirmSubmit,
    ConfirmQuit,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Navigation,
    TextEdit,
    Picker,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivePanel {
    Sidebar,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuestionStatus {
    Unanswered,
    Answered,
    /// Required and still empty.
    Missing,
    /// Flagged by the last validation.
    Error,
}

#[derive(Debug, Default)]
pub struct StatusCounts {
    pub answered: usize,
    pub missing: usize,
    pub total: usize,
}

/// Inline text editor over one answer or group cell.
#[derive(Debug, Clone)]
pub struct TextEdit {
    pub question_id: String,
    pub target: TextTarget,
    pub buffer: String,
    /// Cursor position in chars.
    pub cursor: usize,
    pub multiline: bool,
    pub placeholder: String,
}

impl TextEdit {
    fn byte_index(&self) -> usize {
        self.buffer
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.buffer.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.buffer.chars().count() {
            let at = self.byte_index();
            self.buffer.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.buffer.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.chars().count();
    }
}

/// Searchable option list for select and unit questions.
#[derive(Debug, Clone)]
pub struct Picker {
    pub question_id: String,
    pub target: PickTarget,
    pub title: String,
    pub options: Vec<PickOption>,
    pub filter: String,
    pub cursor: usize,
}

impl Picker {
    /// Options whose label contains the filter, case-insensitively.
    pub fn visible(&self) -> Vec<&PickOption> {
        let needle = self.filter.to_lowercase();
        self.options
            .iter()
            .filter(|o| needle.is_empty() || o.label.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor as isize + delta).clamp(0, len as isize - 1) as usize;
    }

    pub fn push_filter(&mut self, c: char) {
        self.filter.push(c);
        self.cursor = 0;
    }

    pub fn pop_filter(&mut self) {
        self.filter.pop();
        self.cursor = 0;
    }

    pub fn selected_key(&self) -> Option<String> {
        self.visible().get(self.cursor).map(|o| o.key.clone())
    }
}

fn action_name(interaction: &Interaction) -> &'static str {
    match interaction {
        Interaction::Text(_) | Interaction::Choose(_) => "answers/recordScalar",
        Interaction::Toggle { .. } => "answers/recordSet",
        Interaction::GroupCell { .. } => "answers/recordGroupCell",
        Interaction::AddInstance => "answers/appendGroupInstance",
        Interaction::RemoveInstance(_) => "answers/removeGroupInstance",
        Interaction::Unit { .. } => "answers/recordUnit",
    }
}

/// Application state of the fill-in form.
pub struct FormState {
    pub survey: Survey,
    pub geography: Geography,
    pub locale: Locale,
    pub registry: Registry,
    pub answers: AnswerStore,
    pub errors: ErrorMap,
    /// Ids of the questions shown, in display order.
    pub visible: Vec<String>,
    pub current: usize,
    pub row: usize,
    pub input_mode: InputMode,
    pub text_edit: Option<TextEdit>,
    pub picker: Option<Picker>,
    pub dialog_stack: Vec<Dialog>,
    pub notice: Option<String>,
    pub active_panel: ActivePanel,
    pub sidebar_scroll: usize,
    pub question_scroll: usize,
    /// Response id once stored.
    pub submitted: Option<String>,
    pub should_quit: bool,
    /// Answers changed since the last draft save.
    pub dirty: bool,
}

impl FormState {
    pub fn new(survey: Survey, geography: Geography, locale: Locale) -> Self {
        let visible = survey.renderable().map(|(id, _)| id.clone()).collect();
        Self {
            survey,
            geography,
            locale,
            registry: Registry::with_defaults(),
            answers: AnswerStore::new(),
            errors: ErrorMap::new(),
            visible,
            current: 0,
            row: 0,
            input_mode: InputMode::Navigation,
            text_edit: None,
            picker: None,
            dialog_stack: Vec::new(),
            notice: None,
            active_panel: ActivePanel::Main,
            sidebar_scroll: 0,
            question_scroll: 0,
            submitted: None,
            should_quit: false,
            dirty: false,
        }
    }

    pub fn labels(&self) -> &'static Labels {
        self.locale.labels()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.visible.get(self.current).map(String::as_str)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_id().and_then(|id| self.survey.question(id))
    }

    fn question_ref<'a>(&'a self, id: &'a str) -> Option<QuestionRef<'a>> {
        Some(QuestionRef {
            id,
            question: self.survey.question(id)?,
            geography: &self.geography,
        })
    }

    /// Render context for `id`; the row cursor is set only on the current question.
    pub fn render_context<'a>(&'a self, id: &'a str) -> Option<RenderContext<'a>> {
        let cursor = (self.current_id() == Some(id)).then_some(self.row);
        Some(RenderContext {
            target: self.question_ref(id)?,
            answers: &self.answers,
            labels: self.labels(),
            cursor,
        })
    }

    pub fn current_rows(&self) -> usize {
        self.current_id()
            .and_then(|id| self.render_context(id))
            .map(|ctx| self.registry.rows(&ctx))
            .unwrap_or(0)
    }

    pub fn status(&self, id: &str) -> QuestionStatus {
        if self.errors.contains_key(id) {
            QuestionStatus::Error
        } else if self.answers.is_answered(id) {
            QuestionStatus::Answered
        } else if self.survey.question(id).is_some_and(|q| q.required) {
            QuestionStatus::Missing
        } else {
            QuestionStatus::Unanswered
        }
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts {
            total: self.visible.len(),
            ..Default::default()
        };
        for id in &self.visible {
            match self.status(id) {
                QuestionStatus::Answered => counts.answered += 1,
                QuestionStatus::Missing | QuestionStatus::Error => counts.missing += 1,
                QuestionStatus::Unanswered => {}
            }
        }
        counts
    }

    pub fn navigate_to(&mut self, idx: usize) {
        if idx < self.visible.len() {
            self.current = idx;
            self.row = 0;
            self.question_scroll = 0;
        }
    }

    pub fn next_question(&mut self) {
        if self.current + 1 < self.visible.len() {
            self.navigate_to(self.current + 1);
        }
    }

    pub fn prev_question(&mut self) {
        if self.current > 0 {
            self.navigate_to(self.current - 1);
        }
    }

    /// Move the row cursor; past either end moves to the neighbouring question.
    pub fn move_row(&mut self, delta: isize) {
        let rows = self.current_rows();
        let next = self.row as isize + delta;
        if next < 0 {
            if self.current > 0 {
                self.prev_question();
                self.row = self.current_rows().saturating_sub(1);
            }
        } else if next as usize >= rows {
            self.next_question();
        } else {
            self.row = next as usize;
        }
    }

    /// Apply `interaction` to question `id`. The question's error is cleared
    /// before the store changes.
    pub fn apply(&mut self, id: &str, interaction: Interaction) -> Result<()> {
        self.errors.shift_remove(id);
        let action = action_name(&interaction);
        let Some(question) = self.survey.question(id) else {
            return Ok(());
        };
        let target = QuestionRef {
            id,
            question,
            geography: &self.geography,
        };
        if self.registry.apply(&target, &mut self.answers, interaction)? {
            tracing::debug!(action, question = %id, "answer changed");
            self.dirty = true;
        }
        let rows = self.current_rows();
        if self.row >= rows {
            self.row = rows.saturating_sub(1);
        }
        Ok(())
    }

    fn apply_reporting(&mut self, id: &str, interaction: Interaction) {
        if let Err(e) = self.apply(id, interaction) {
            tracing::warn!(question = %id, error = %e, "interaction rejected");
            self.notice = Some(e.to_string());
        }
    }

    /// Enter/Space on the focused row.
    pub fn activate(&mut self) {
        let Some(id) = self.current_id().map(str::to_string) else {
            return;
        };
        let activation = self
            .render_context(&id)
            .and_then(|ctx| self.registry.activate(&ctx, self.row));
        match activation {
            Some(Activation::Apply(interaction)) => self.apply_reporting(&id, interaction),
            Some(Activation::EditText {
                initial,
                multiline,
                placeholder,
                target,
            }) => {
                self.text_edit = Some(TextEdit {
                    question_id: id,
                    target,
                    cursor: initial.chars().count(),
                    buffer: initial,
                    multiline,
                    placeholder,
                });
                self.input_mode = InputMode::TextEdit;
            }
            Some(Activation::Pick {
                title,
                options,
                selected,
                target,
            }) => {
                let cursor = selected
                    .and_then(|key| options.iter().position(|o| o.key == key))
                    .unwrap_or(0);
                self.picker = Some(Picker {
                    question_id: id,
                    target,
                    title,
                    options,
                    filter: String::new(),
                    cursor,
                });
                self.input_mode = InputMode::Picker;
            }
            None => {}
        }
    }

    pub fn commit_text(&mut self) {
        if let Some(edit) = self.text_edit.take() {
            let interaction = edit.target.into_interaction(edit.buffer);
            self.apply_reporting(&edit.question_id, interaction);
        }
        self.input_mode = InputMode::Navigation;
    }

    pub fn cancel_text(&mut self) {
        self.text_edit = None;
        self.input_mode = InputMode::Navigation;
    }

    pub fn commit_pick(&mut self) {
        if let Some(picker) = self.picker.take() {
            let interaction = picker
                .selected_key()
                .and_then(|key| picker.target.into_interaction(key));
            if let Some(interaction) = interaction {
                self.apply_reporting(&picker.question_id, interaction);
            }
        }
        self.input_mode = InputMode::Navigation;
    }

    pub fn cancel_pick(&mut self) {
        self.picker = None;
        self.input_mode = InputMode::Navigation;
    }

    /// Ctrl+N on a questionGroup.
    pub fn add_instance(&mut self) {
        let Some(id) = self.current_id().map(str::to_string) else {
            return;
        };
        if matches!(
            self.survey.question(&id).map(|q| &q.kind),
            Some(QuestionKind::QuestionGroup(_))
        ) {
            self.apply_reporting(&id, Interaction::AddInstance);
        }
    }

    /// Delete on a questionGroup row removes that row's instance, never the first.
    pub fn remove_focused_instance(&mut self) {
        let Some(id) = self.current_id().map(str::to_string) else {
            return;
        };
        let instance = match self
            .render_context(&id)
            .and_then(|ctx| self.registry.activate(&ctx, self.row))
        {
            Some(Activation::EditText {
                target: TextTarget::GroupCell { instance, .. },
                ..
            }) => instance,
            Some(Activation::Apply(Interaction::RemoveInstance(instance))) => instance,
            _ => return,
        };
        if instance > 0 && instance < self.answers.group_len(&id) {
            self.apply_reporting(&id, Interaction::RemoveInstance(instance));
        }
    }

    /// Question id and current text when the focused question is a textarea.
    pub fn external_edit_target(&self) -> Option<(String, String)> {
        let id = self.current_id()?;
        match self.survey.question(id)?.kind {
            QuestionKind::Textarea => Some((
                id.to_string(),
                self.answers.scalar(id).unwrap_or_default(),
            )),
            _ => None,
        }
    }

    /// Validate for submission. On errors the cursor moves to the first
    /// failing question and `false` is returned.
    pub fn check_submit(&mut self) -> bool {
        self.errors = validate::validate_with(&self.survey, &self.answers, self.labels());
        if validate::can_submit(&self.errors) {
            return true;
        }
        if let Some(first) = self.errors.keys().next() {
            if let Some(idx) = self.visible.iter().position(|id| id == first) {
                self.navigate_to(idx);
            }
        }
        tracing::debug!(action = "form/validate", errors = self.errors.len(), "submission blocked");
        self.notice = Some(self.labels().missing_info.to_string());
        false
    }

    pub fn has_dialog(&self) -> bool {
        !self.dialog_stack.is_empty()
    }

    pub fn top_dialog(&self) -> Option<&Dialog> {
        self.dialog_stack.last()
    }

    pub fn push_dialog(&mut self, dialog: Dialog) {
        self.dialog_stack.push(dialog);
    }

    pub fn pop_dialog(&mut self) -> Option<Dialog> {
        self.dialog_stack.pop()
    }
}
