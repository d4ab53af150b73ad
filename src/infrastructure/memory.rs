//! Headless surface: a table that keeps its rows in memory and a viewer
//! that records what was asked of it. Used off-browser and in tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::domain::{
    chart::{DataTable, DisplayRow, TableFactory, TableSchema, ViewerElement},
    errors::{SurfaceError, SurfaceResult},
};

/// One observable interaction with the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    AttributeSet { name: String, value: String },
    TableCreated,
    TableLoaded,
    RowsAppended(usize),
}

/// Shared, ordered log of surface interactions.
#[derive(Debug, Clone, Default)]
pub struct SurfaceJournal(Rc<RefCell<Vec<SurfaceEvent>>>);

impl SurfaceJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: SurfaceEvent) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.0.borrow().clone()
    }

    pub fn attribute_writes(&self) -> Vec<(String, String)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::AttributeSet { name, value } => Some((name.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct TableState {
    batches: Vec<Vec<DisplayRow>>,
    reject_updates: bool,
}

/// In-memory table. Clones share the same rows.
#[derive(Debug, Clone)]
pub struct InMemoryTable {
    schema: TableSchema,
    state: Rc<RefCell<TableState>>,
    journal: SurfaceJournal,
}

impl InMemoryTable {
    pub fn new(schema: TableSchema, journal: SurfaceJournal) -> Self {
        Self { schema, state: Rc::default(), journal }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn rows(&self) -> Vec<DisplayRow> {
        self.state.borrow().batches.iter().flatten().cloned().collect()
    }

    pub fn row_count(&self) -> usize {
        self.state.borrow().batches.iter().map(Vec::len).sum()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.state.borrow().batches.iter().map(Vec::len).collect()
    }

    /// Stored rows per `(stock, timestamp millis)`.
    pub fn rows_per_key(&self) -> BTreeMap<(String, i64), usize> {
        let mut counts = BTreeMap::new();
        for row in self.state.borrow().batches.iter().flatten() {
            *counts.entry((row.stock.value().to_string(), row.timestamp.as_millis())).or_insert(0) += 1;
        }
        counts
    }

    /// Make subsequent updates fail until switched back.
    pub fn reject_updates(&self, reject: bool) {
        self.state.borrow_mut().reject_updates = reject;
    }

    fn same_table(&self, other: &InMemoryTable) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl DataTable for InMemoryTable {
    fn update(&mut self, rows: &[DisplayRow]) -> SurfaceResult<()> {
        let mut state = self.state.borrow_mut();
        if state.reject_updates {
            return Err(SurfaceError::Update("table is rejecting updates".to_string()));
        }
        state.batches.push(rows.to_vec());
        self.journal.record(SurfaceEvent::RowsAppended(rows.len()));
        Ok(())
    }
}

/// Factory for [`InMemoryTable`]s; can simulate a host without the capability.
#[derive(Debug, Clone)]
pub struct InMemoryTableFactory {
    available: bool,
    journal: SurfaceJournal,
    created: Rc<RefCell<Vec<InMemoryTable>>>,
}

impl InMemoryTableFactory {
    pub fn new(journal: SurfaceJournal) -> Self {
        Self { available: true, journal, created: Rc::default() }
    }

    pub fn unavailable(journal: SurfaceJournal) -> Self {
        Self { available: false, ..Self::new(journal) }
    }

    /// Handles to every table created so far.
    pub fn created(&self) -> Vec<InMemoryTable> {
        self.created.borrow().clone()
    }
}

impl TableFactory for InMemoryTableFactory {
    type Table = InMemoryTable;

    fn create_table(&self, schema: &TableSchema) -> SurfaceResult<Option<InMemoryTable>> {
        if !self.available {
            return Ok(None);
        }
        let table = InMemoryTable::new(schema.clone(), self.journal.clone());
        self.created.borrow_mut().push(table.clone());
        self.journal.record(SurfaceEvent::TableCreated);
        Ok(Some(table))
    }
}

/// Viewer stand-in that stores attributes and the loaded table.
#[derive(Debug, Clone)]
pub struct RecordingViewer {
    attributes: BTreeMap<String, String>,
    loaded: Option<InMemoryTable>,
    reject_load: bool,
    journal: SurfaceJournal,
}

impl RecordingViewer {
    pub fn new(journal: SurfaceJournal) -> Self {
        Self { attributes: BTreeMap::new(), loaded: None, reject_load: false, journal }
    }

    /// A viewer whose `load` always fails.
    pub fn rejecting_load(journal: SurfaceJournal) -> Self {
        Self { reject_load: true, ..Self::new(journal) }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn is_showing(&self, table: &InMemoryTable) -> bool {
        self.loaded.as_ref().is_some_and(|loaded| loaded.same_table(table))
    }
}

impl ViewerElement for RecordingViewer {
    type Table = InMemoryTable;

    fn set_attribute(&mut self, name: &str, value: &str) -> SurfaceResult<()> {
        self.attributes.insert(name.to_string(), value.to_string());
        self.journal.record(SurfaceEvent::AttributeSet {
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn attach(&mut self, table: &InMemoryTable) -> SurfaceResult<()> {
        if self.reject_load {
            return Err(SurfaceError::Load("viewer refused the table".to_string()));
        }
        self.loaded = Some(table.clone());
        self.journal.record(SurfaceEvent::TableLoaded);
        Ok(())
    }
}
