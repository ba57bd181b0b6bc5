//! One function per subcommand.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::auth::{self, Identity};
use crate::builder::SchemaEditor;
use crate::cli::{Command, EditAction, UserAction};
use crate::config::Config;
use crate::editor::open_editor;
use crate::error::{Error, Result};
use crate::export::{self, ExportFormat};
use crate::flatten::RowFill;
use crate::geo::Geography;
use crate::i18n::Labels;
use crate::import;
use crate::model::{now_millis, Survey};
use crate::path::parse_path;
use crate::persist;
use crate::results;
use crate::service;
use crate::state::FormState;
use crate::store::{FileStore, Filter, SurveyStore, UserStore};
use crate::tui::{self, Session};

/// Everything a command needs, resolved from configuration and flags.
pub struct Context {
    pub config: Config,
    pub data_dir: PathBuf,
    pub store: FileStore,
    pub user: Option<Identity>,
}

impl Context {
    /// Open the store and sign in as `requested`, else as the configured user.
    pub fn new(config: Config, data_dir: PathBuf, requested: Option<&str>) -> Result<Self> {
        let store = FileStore::open(&data_dir)?;
        let user = auth::resolve(&store, requested, config.user.clone())?;
        Ok(Self {
            config,
            data_dir,
            store,
            user,
        })
    }

    fn labels(&self) -> &'static Labels {
        self.config.locale.labels()
    }

    fn geography(&self) -> Result<Geography> {
        match &self.config.geography {
            Some(path) => Geography::load(path),
            None => Ok(Geography::empty()),
        }
    }

    fn require_user(&self, action: &'static str) -> Result<&Identity> {
        auth::require(self.user.as_ref(), action)
    }

    fn require_admin(&self, action: &'static str) -> Result<&Identity> {
        auth::require_admin(self.user.as_ref(), action)
    }
}

pub fn dispatch(ctx: &Context, command: Command) -> Result<()> {
    match command {
        Command::List { unit } => list(ctx, unit),
        Command::Create {
            title,
            description,
            from,
        } => create(ctx, &title, description.as_deref(), from.as_deref()),
        Command::Show { id } => show(ctx, &id),
        Command::Edit { id, action } => edit(ctx, &id, action),
        Command::Delete { id } => delete(ctx, &id),
        Command::Fill { id, fresh } => fill(ctx, &id, fresh),
        Command::Results { id, detail } => show_results(ctx, &id, detail.as_deref()),
        Command::Export {
            id,
            format,
            out,
            fill,
            strict,
        } => export_results(ctx, &id, format, out.as_deref(), fill, strict),
        Command::Users { action } => users(ctx, action),
    }
}

fn list(ctx: &Context, unit: Option<String>) -> Result<()> {
    let mut filter = Filter::new();
    if let Some(unit) = unit {
        filter.insert("unit".to_string(), Value::String(unit));
    }
    let surveys = ctx.store.query_surveys(&filter)?;
    if surveys.is_empty() {
        eprintln!("No surveys.");
    }
    for s in surveys {
        println!(
            "{:<14} {:<40} {:>3} questions  {}",
            s.id,
            s.title,
            s.questions.len(),
            s.unit.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn read_survey_file(path: &Path) -> Result<Survey> {
    let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    if is_json {
        serde_json::from_str(&raw).map_err(|source| Error::Document {
            path: path.to_path_buf(),
            source,
        })
    } else {
        Ok(serde_yaml::from_str(&raw)?)
    }
}

fn create(ctx: &Context, title: &str, description: Option<&str>, from: Option<&Path>) -> Result<()> {
    let user = ctx.require_user("create surveys")?;
    let mut editor = match from {
        Some(path) => {
            let mut survey = read_survey_file(path)?;
            survey.id = String::new();
            SchemaEditor::from_survey(&survey)?
        }
        None => SchemaEditor::new("", title)?,
    };
    editor.set_title(title)?;
    if let Some(d) = description {
        editor.set_description(d)?;
    }
    if let Some(unit) = &user.unit {
        editor.set_unit(Some(unit))?;
    }
    let survey = editor.build(user.editor_name(), now_millis())?;
    let id = ctx.store.create_survey(survey)?;
    println!("{}", id);
    Ok(())
}

fn show(ctx: &Context, id: &str) -> Result<()> {
    let survey = service::load_survey(&ctx.store, id)?;
    println!("{}", survey.title);
    if !survey.description.is_empty() {
        println!("\n{}\n", survey.description);
    }
    if let Some(m) = &survey.last_modified {
        println!("Last modified {} by {}", results::format_time(m.time), m.editor);
    }
    for (n, (qid, q)) in survey.questions.iter().enumerate() {
        println!(
            "{:>2}. [{}] {}{} ({})",
            n + 1,
            qid,
            q.text,
            if q.required { " *" } else { "" },
            q.kind.tag()
        );
        if let Some(params) = q.params() {
            for (i, label) in params.iter().enumerate() {
                println!("      {}: {}", i, label);
            }
        }
        if let Some(subs) = q.sub_questions() {
            for (i, sub) in subs.iter().enumerate() {
                println!("      {}: {}", i, sub.content);
            }
        }
    }
    Ok(())
}

fn edit(ctx: &Context, id: &str, action: EditAction) -> Result<()> {
    let user = ctx.require_user("edit surveys")?;
    let survey = service::load_survey(&ctx.store, id)?;
    let mut editor = SchemaEditor::from_survey(&survey)?;

    match action {
        EditAction::Set { path, value } => {
            let path = parse_path(&path)?;
            let value: Value = serde_json::from_str(&value)?;
            editor.set_path(&path, value)?;
        }
        EditAction::AddQuestion {
            kind,
            text,
            required,
            placeholder,
            options,
            sub_questions,
        } => {
            let qid = editor.add_question(kind)?;
            editor.set_text(&qid, &text)?;
            if required {
                editor.set_required(&qid, true)?;
            }
            if let Some(p) = placeholder.as_deref() {
                editor.set_placeholder(&qid, Some(p))?;
            }
            for option in &options {
                editor.add_option(&qid, option)?;
            }
            for sub in &sub_questions {
                editor.add_sub_question(&qid, sub, None)?;
            }
            println!("{}", qid);
        }
        EditAction::RemoveQuestion { question } => editor.remove_question(&question)?,
        EditAction::MoveQuestion { question, index } => editor.move_question(&question, index)?,
        EditAction::AddOption { question, label } => {
            let index = editor.add_option(&question, &label)?;
            println!("{}", index);
        }
        EditAction::RemoveOption { question, index } => editor.remove_option(&question, index)?,
        EditAction::ImportOptions { question, file } => {
            let options = import::read_options(&file)?;
            eprintln!("Imported {} options.", options.len());
            editor.replace_options(&question, options)?;
        }
        EditAction::Title { text } => editor.set_title(&text)?,
        EditAction::Describe => {
            let text = open_editor(&survey.description)?;
            editor.set_description(&text)?;
        }
    }

    let updated = editor.build(user.editor_name(), now_millis())?;
    let patch = match serde_json::to_value(&updated)? {
        Value::Object(map) => map,
        _ => return Err(Error::InvalidSurvey("survey is not an object".to_string())),
    };
    ctx.store.update_survey(id, patch)?;
    Ok(())
}

fn delete(ctx: &Context, id: &str) -> Result<()> {
    ctx.require_user("delete surveys")?;
    service::delete_survey_cascade(&ctx.store, id)?;
    persist::clear_draft(&ctx.data_dir, id)?;
    eprintln!("Deleted {}.", id);
    Ok(())
}

fn fill(ctx: &Context, id: &str, fresh: bool) -> Result<()> {
    let survey = service::load_survey(&ctx.store, id)?;
    let geography = ctx.geography()?;
    let mut state = FormState::new(survey, geography, ctx.config.locale);

    if fresh {
        persist::clear_draft(&ctx.data_dir, id)?;
    } else {
        match persist::load_draft(&ctx.data_dir, &state.survey) {
            Ok(Some(restored)) => {
                state.answers = restored.answers;
                if restored.schema_changed {
                    state.notice = Some("The survey changed since your draft was saved.".to_string());
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "draft ignored"),
        }
    }

    let session = Session {
        store: &ctx.store,
        data_dir: ctx.data_dir.clone(),
        user: ctx.user.clone(),
    };
    let state = tui::run_tui(state, &session)?;
    match state.submitted {
        Some(response) => println!("{} ({})", ctx.labels().submitted, response),
        None => eprintln!("Draft saved."),
    }
    Ok(())
}

fn show_results(ctx: &Context, id: &str, detail: Option<&str>) -> Result<()> {
    ctx.require_user("view results")?;
    let loaded = service::load_results(&ctx.store, id)?;
    let lines = match detail {
        Some(response_id) => {
            let response = loaded
                .responses
                .iter()
                .find(|r| r.id == response_id)
                .ok_or_else(|| Error::InvalidSelection(format!("no response {}", response_id)))?;
            results::detail_lines(&loaded.survey, response, &ctx.geography()?, ctx.labels())?
        }
        None => {
            let summary = results::summarize(&loaded.survey, &loaded.responses);
            results::summary_lines(&summary, ctx.labels())
        }
    };
    println!("{}", loaded.survey.title);
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

fn export_results(
    ctx: &Context,
    id: &str,
    format: ExportFormat,
    out: Option<&Path>,
    fill: RowFill,
    strict: bool,
) -> Result<()> {
    ctx.require_user("export results")?;
    let loaded = service::load_results(&ctx.store, id)?;
    let report = service::export_table(&loaded, &ctx.geography()?, fill, strict)?;
    if !report.skipped.is_empty() {
        eprintln!(
            "Warning: skipped {} response(s) with malformed answers: {}",
            report.skipped.len(),
            report.skipped.join(", ")
        );
    }
    let rendered = export::render(&report.table, format)?;
    match out {
        Some(path) => {
            fs::write(path, rendered).map_err(|e| Error::io(path, e))?;
            eprintln!("Exported {} rows to {}", report.table.rows.len(), path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn users(ctx: &Context, action: UserAction) -> Result<()> {
    match action {
        UserAction::List { unit } => {
            let viewer = ctx.require_user("list users")?;
            for u in service::list_users(&ctx.store, viewer, unit.as_deref())? {
                println!(
                    "{:<32} {:<24} {:<10} {}",
                    u.email,
                    u.display_name,
                    u.unit.as_deref().unwrap_or(""),
                    if u.is_admin() { "admin" } else { "" }
                );
            }
        }
        UserAction::Add {
            email,
            name,
            unit,
            role,
        } => {
            ctx.require_admin("add users")?;
            let mut user = Identity::from_email(&email);
            if let Some(name) = name {
                user.display_name = name;
            }
            user.unit = unit;
            user.role = role;
            let email = ctx.store.create_user(user)?;
            eprintln!("Registered {}.", email);
        }
        UserAction::Update {
            email,
            name,
            unit,
            role,
        } => {
            ctx.require_admin("update users")?;
            let mut patch = serde_json::Map::new();
            if let Some(name) = name {
                patch.insert("display_name".to_string(), Value::String(name));
            }
            if let Some(unit) = unit {
                patch.insert("unit".to_string(), Value::String(unit));
            }
            if let Some(role) = role {
                patch.insert("role".to_string(), serde_json::to_value(role)?);
            }
            ctx.store.update_user(&email, patch)?;
        }
        UserAction::Remove { email } => {
            let admin = ctx.require_admin("remove users")?;
            service::remove_user(&ctx.store, admin, &email)?;
            eprintln!("Removed {}.", email);
        }
    }
    Ok(())
}
