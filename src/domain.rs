use std::fmt;
use std::io::Error;
use std::path::PathBuf;

use derive_setters::Setters;
use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;

use crate::engine::{DEFAULT_DEBOUNCE, DEFAULT_PAGE_SIZE};

#[derive(Debug)]
pub enum TabError {
    IoError(Error),
    PolarsError(PolarsError),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
    EmptyDataset,
}

impl fmt::Display for TabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabError::IoError(e) => write!(f, "I/O error: {e}"),
            TabError::PolarsError(e) => write!(f, "Failed to read data: {e}"),
            TabError::LoadingFailed(reason) => write!(f, "Loading failed: {reason}"),
            TabError::FileNotFound => write!(f, "File not found"),
            TabError::PermissionDenied => write!(f, "Permission denied"),
            TabError::UnknownFileType => write!(f, "Unknown file type"),
            TabError::EmptyDataset => write!(f, "Dataset has no columns"),
        }
    }
}

impl std::error::Error for TabError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TabError::IoError(e) => Some(e),
            TabError::PolarsError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for TabError {
    fn from(err: Error) -> Self {
        TabError::IoError(err)
    }
}

impl From<PolarsError> for TabError {
    fn from(err: PolarsError) -> Self {
        TabError::PolarsError(err)
    }
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct TVConfig {
    pub event_poll_time: u64,
    pub max_column_width: usize,
    pub page_size: usize,
    pub debounce_ms: u64,
    pub search_fields: Option<Vec<String>>,
    pub placeholder: Option<String>,
    pub export_dir: PathBuf,
}

impl Default for TVConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            max_column_width: 32,
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            search_fields: None,
            placeholder: None,
            export_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    ToggleSort,
    Search,
    ToggleSelect,
    SelectPage,
    ClearSelection,
    Enter,
    Exit,
    CopyCell,
    CopyRow,
    Export,
    Help,
    Resize(usize, usize),
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
Navigation
  j / k, ↓ / ↑      move row
  h / l, ← / →      move column
  n, PgDn           next page
  p, PgUp           previous page
  g / G             first / last page

Table
  /                 search (Enter apply, Esc clear)
  s                 sort current column (↑, ↓, off)
  space             select row
  a                 select page
  x                 clear selection
  Enter             open record
  Esc               back

Output
  c                 copy cell
  y                 copy row
  e                 export CSV
  ?                 help
  q                 quit";
