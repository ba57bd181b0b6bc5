pub mod answers;
pub mod auth;
pub mod builder;
pub mod cli;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod flatten;
pub mod geo;
pub mod i18n;
pub mod import;
pub mod model;
pub mod path;
pub mod persist;
pub mod render;
pub mod results;
pub mod service;
pub mod state;
pub mod store;
pub mod tui;
pub mod ui;
pub mod validate;

pub use error::{Error, Result};
