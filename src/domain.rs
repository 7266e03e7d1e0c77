use std::fmt;
use std::io::Error;
use std::path::PathBuf;

use derive_setters::Setters;
use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;
use tracing_error::SpanTrace;

pub const HELP_TEXT: &str = "\
dashview - business dashboard viewer

  q            quit
  Tab/BackTab  next / previous category
  ] / [        next / previous view
  arrows, hjkl move selection
  PgUp/PgDn    page up / down
  g / G        first / last row
  s            sort by column (again to flip direction)
  f            filter current column (ranges as from..to)
  /            search the view
  m            cycle mode filter
  c            clear filters and search
  e            export view as CSV
  y / Y        copy cell / row
  Enter        show record
  Esc          back
  ?            this help
";

#[derive(Debug)]
pub enum DVError {
    IoError(Error),
    PolarsError(PolarsError),
    JsonError(serde_json::Error),
    LoadingFailed {
        source_file: PathBuf,
        reason: String,
        trace: SpanTrace,
    },
    ExportFailed(String),
    UnknownView(String),
    InvalidArgument(String),
    Clipboard(String),
}

impl DVError {
    pub fn loading(source_file: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DVError::LoadingFailed {
            source_file: source_file.into(),
            reason: reason.into(),
            trace: SpanTrace::capture(),
        }
    }
}

impl fmt::Display for DVError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DVError::IoError(e) => write!(f, "io error: {e}"),
            DVError::PolarsError(e) => write!(f, "csv error: {e}"),
            DVError::JsonError(e) => write!(f, "json error: {e}"),
            DVError::LoadingFailed {
                source_file,
                reason,
                trace,
            } => {
                write!(f, "failed to load {}: {reason}", source_file.display())?;
                if trace.status() == tracing_error::SpanTraceStatus::CAPTURED {
                    write!(f, "\n{trace}")?;
                }
                Ok(())
            }
            DVError::ExportFailed(reason) => write!(f, "export failed: {reason}"),
            DVError::UnknownView(id) => write!(f, "unknown view '{id}'"),
            DVError::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
            DVError::Clipboard(reason) => write!(f, "clipboard unavailable: {reason}"),
        }
    }
}

impl std::error::Error for DVError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DVError::IoError(e) => Some(e),
            DVError::PolarsError(e) => Some(e),
            DVError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for DVError {
    fn from(err: Error) -> Self {
        DVError::IoError(err)
    }
}

impl From<PolarsError> for DVError {
    fn from(err: PolarsError) -> Self {
        DVError::PolarsError(err)
    }
}

impl From<serde_json::Error> for DVError {
    fn from(err: serde_json::Error) -> Self {
        DVError::JsonError(err)
    }
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct DVConfig {
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub event_poll_time: u64,
    pub max_column_width: usize,
    /// Seconds a status message stays visible
    pub status_message_timeout: u64,
}

impl Default for DVConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            export_dir: PathBuf::from("."),
            event_poll_time: 100,
            max_column_width: 40,
            status_message_timeout: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CMDMode {
    FilterColumn,
    Search,
}

impl CMDMode {
    pub fn prompt(&self) -> &'static str {
        match self {
            CMDMode::FilterColumn => "filter: ",
            CMDMode::Search => "search: ",
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
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    NextTab,
    PreviousTab,
    NextView,
    PreviousView,
    Sort,
    Filter,
    Search,
    CycleMode,
    ClearFilters,
    Export,
    CopyCell,
    CopyRow,
    Enter,
    Exit,
    Help,
    Resize(usize, usize),
    RawKey(KeyEvent),
}
