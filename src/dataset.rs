use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::column::ColumnDef;
use crate::domain::DVError;
use crate::value;
use crate::view::ViewDef;

pub type Record = Map<String, Value>;

/// Shared handle to one immutable record. Cloning a row never copies the
/// record, so filtered and sorted views keep the identity of their rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Row(Arc<Record>);

impl Row {
    pub fn new(record: Record) -> Self {
        Row(Arc::new(record))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        value::present(self.0.get(field))
    }

    pub fn display(&self, field: &str) -> String {
        value::display(self.get(field))
    }

    pub fn ptr_eq(&self, other: &Row) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn record(&self) -> &Record {
        &self.0
    }
}

impl From<Value> for Row {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Row::new(map),
            _ => Row::new(Record::new()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Selects the array at `pointer` (JSON pointer syntax) of a dataset
    /// document.
    pub fn from_json(doc: &Value, pointer: &str) -> Result<Self, String> {
        let target = doc
            .pointer(pointer)
            .ok_or_else(|| format!("no data at '{pointer}'"))?;
        let items = target
            .as_array()
            .ok_or_else(|| format!("'{pointer}' is not an array"))?;

        let mut rows = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match item {
                Value::Object(map) => rows.push(Row::new(map.clone())),
                other => warn!("Skipping element {idx} of '{pointer}': not an object ({other})"),
            }
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Logs nulls found in columns that are not declared nullable.
    pub fn validate(&self, view_id: &str, columns: &[ColumnDef]) -> usize {
        let mut violations = 0;
        for column in columns.iter().filter(|c| !c.nullable) {
            let missing = self
                .rows
                .iter()
                .filter(|r| r.get(&column.field).is_none())
                .count();
            if missing > 0 {
                warn!(
                    "{view_id}: {missing} rows without a value in non-nullable column '{}'",
                    column.field
                );
                violations += missing;
            }
        }
        violations
    }
}

#[derive(Debug, Clone)]
pub enum ViewData {
    Ready(Dataset),
    Failed(String),
}

impl ViewData {
    pub fn dataset(&self) -> Option<&Dataset> {
        match self {
            ViewData::Ready(ds) => Some(ds),
            ViewData::Failed(_) => None,
        }
    }
}

/// Datasets of all views, loaded from the JSON documents in a data
/// directory.
#[derive(Debug, Default)]
pub struct Catalog {
    data: HashMap<String, ViewData>,
}

impl Catalog {
    #[instrument(skip(views), fields(views = views.len()))]
    pub fn load(data_dir: &Path, views: &[ViewDef]) -> Self {
        let start_time = Instant::now();

        // Each source document is read once even if several views use it.
        let sources: BTreeSet<&str> = views.iter().map(|v| v.source.as_str()).collect();
        let documents: HashMap<&str, Result<Value, String>> = sources
            .into_par_iter()
            .map(|source| {
                let doc = load_document(&data_dir.join(source)).map_err(|e| e.to_string());
                (source, doc)
            })
            .collect();

        let mut data = HashMap::new();
        for view in views {
            let entry = match documents.get(view.source.as_str()) {
                Some(Ok(doc)) => match Dataset::from_json(doc, &view.pointer) {
                    Ok(ds) => {
                        ds.validate(&view.id, &view.columns);
                        debug!("{}: {} rows", view.id, ds.len());
                        ViewData::Ready(ds)
                    }
                    Err(reason) => {
                        warn!("{}: {reason}", view.id);
                        ViewData::Failed(reason)
                    }
                },
                Some(Err(reason)) => ViewData::Failed(reason.clone()),
                None => ViewData::Failed(format!("{} was not loaded", view.source)),
            };
            data.insert(view.id.clone(), entry);
        }

        info!(
            "Loaded {} views in {}ms ...",
            data.len(),
            start_time.elapsed().as_millis()
        );
        Self { data }
    }

    pub fn get(&self, view_id: &str) -> Option<&ViewData> {
        self.data.get(view_id)
    }

    pub fn insert(&mut self, view_id: &str, data: ViewData) {
        self.data.insert(view_id.to_string(), data);
    }
}

#[instrument]
pub fn load_document(path: &Path) -> Result<Value, DVError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DVError::loading(path, "file not found"),
        ErrorKind::PermissionDenied => DVError::loading(path, "permission denied"),
        _ => DVError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(DVError::loading(path, "not a file"));
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| DVError::loading(path, e.to_string()))
}
