use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::auth::Role;
use crate::export::ExportFormat;
use crate::flatten::RowFill;
use crate::model::QuestionType;

#[derive(Parser, Debug)]
#[command(name = "surveyor", version, about = "Build surveys, fill them in, export the results")]
pub struct Cli {
    /// Configuration file [default: <config dir>/config.yaml]
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Document store directory
    #[arg(long, global = true, value_name = "dir")]
    pub data_dir: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `surveyor=trace`
    #[arg(long, global = true, value_name = "filter")]
    pub log_level: Option<String>,

    /// Act as this user (email)
    #[arg(long, global = true, value_name = "email")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List surveys
    List {
        /// Only surveys owned by this unit
        #[arg(long)]
        unit: Option<String>,
    },
    /// Create a survey
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Start from a survey document (JSON or YAML)
        #[arg(long, value_name = "file")]
        from: Option<PathBuf>,
    },
    /// Print a survey's questions
    Show { id: String },
    /// Edit a survey
    Edit {
        id: String,
        #[command(subcommand)]
        action: EditAction,
    },
    /// Delete a survey and all of its responses
    Delete { id: String },
    /// Fill in a survey in the terminal
    Fill {
        id: String,
        /// Ignore any saved draft
        #[arg(long)]
        fresh: bool,
    },
    /// Summarise responses
    Results {
        id: String,
        /// Show one response in full
        #[arg(long, value_name = "response-id")]
        detail: Option<String>,
    },
    /// Export responses as a table
    Export {
        id: String,
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Output file [default: stdout]
        #[arg(long, value_name = "path")]
        out: Option<PathBuf>,
        /// How non-group columns are filled on expanded rows
        #[arg(long, value_enum, default_value_t = RowFill::Blank)]
        fill: RowFill,
        /// Fail if any response cannot be decoded
        #[arg(long)]
        strict: bool,
    },
    /// Manage registered users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// List users; members only see their own unit
    List {
        #[arg(long)]
        unit: Option<String>,
    },
    /// Register a user (administrators only)
    Add {
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long, value_enum, default_value_t = Role::Member)]
        role: Role,
    },
    /// Change a user's name, unit or role (administrators only)
    Update {
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long, value_enum)]
        role: Option<Role>,
    },
    /// Remove a user (administrators only)
    Remove { email: String },
}

#[derive(Subcommand, Debug)]
pub enum EditAction {
    /// Set a field by path, e.g. `q1.params.0 '"Yes"'`
    Set {
        path: String,
        /// JSON value
        value: String,
    },
    AddQuestion {
        #[arg(long = "type", value_parser = parse_question_type)]
        kind: QuestionType,
        #[arg(long)]
        text: String,
        #[arg(long)]
        required: bool,
        #[arg(long)]
        placeholder: Option<String>,
        /// Option label (radio, select, checkbox); repeatable
        #[arg(long = "option")]
        options: Vec<String>,
        /// Sub-field content (questionGroup); repeatable
        #[arg(long = "sub-question")]
        sub_questions: Vec<String>,
    },
    RemoveQuestion { question: String },
    MoveQuestion { question: String, index: usize },
    AddOption { question: String, label: String },
    RemoveOption { question: String, index: usize },
    /// Replace a question's options with the first column of a file
    ImportOptions { question: String, file: PathBuf },
    /// Set the title
    Title { text: String },
    /// Edit the description in $EDITOR
    Describe,
}

fn parse_question_type(raw: &str) -> Result<QuestionType, String> {
    QuestionType::from_tag(raw).ok_or_else(|| {
        let known: Vec<&str> = QuestionType::ALL.iter().map(|t| t.tag()).collect();
        format!("unknown question type `{}` (expected one of {})", raw, known.join(", "))
    })
}
