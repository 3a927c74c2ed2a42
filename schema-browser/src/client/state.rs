//! Browser state machine
//!
//! Two independent phases: the table list, loaded once at startup, and the
//! detail of the selected table, reloaded on every selection change. Every
//! fetch is started through a ticket; a result only commits while its ticket
//! is still the newest one for its phase.

use crate::client::ClientFetchError;
use crate::schema::{TableName, TableSnapshot};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum TablesPhase {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<TableName>),
    Failed(ClientFetchError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailPhase {
    #[default]
    NoSelection,
    Loading,
    Loaded(TableSnapshot),
    Failed(ClientFetchError),
}

/// Proof that a table-list fetch was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TablesTicket {
    generation: u64,
}

/// Proof that a detail fetch was started for one selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    generation: u64,
    table: TableName,
}

impl DetailTicket {
    pub fn table(&self) -> &TableName {
        &self.table
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowserState {
    tables: TablesPhase,
    selected: Option<TableName>,
    detail: DetailPhase,
    /// Last surfaced failure, shown until dismissed
    error: Option<String>,
    tables_generation: u64,
    detail_generation: u64,
}

impl BrowserState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> &TablesPhase {
        &self.tables
    }

    pub fn selected(&self) -> Option<&TableName> {
        self.selected.as_ref()
    }

    pub fn detail(&self) -> &DetailPhase {
        &self.detail
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin_tables_load(&mut self) -> TablesTicket {
        self.tables_generation += 1;
        self.tables = TablesPhase::Loading;
        TablesTicket {
            generation: self.tables_generation,
        }
    }

    /// Commit a table-list result. Returns `false` if the ticket is stale.
    pub fn finish_tables_load(
        &mut self,
        ticket: TablesTicket,
        result: Result<Vec<TableName>, ClientFetchError>,
    ) -> bool {
        if ticket.generation != self.tables_generation {
            return false;
        }

        self.tables = match result {
            Ok(tables) => TablesPhase::Loaded(tables),
            Err(failure) => {
                self.error = Some(failure.to_string());
                TablesPhase::Failed(failure)
            }
        };
        true
    }

    /// Select a table and start loading its detail
    ///
    /// Returns `None` when `table` is already selected, since nothing changed.
    /// The error banner is left as it is.
    pub fn select_table(&mut self, table: TableName) -> Option<DetailTicket> {
        if self.selected.as_ref() == Some(&table) {
            return None;
        }

        self.detail_generation += 1;
        self.selected = Some(table.clone());
        self.detail = DetailPhase::Loading;

        Some(DetailTicket {
            generation: self.detail_generation,
            table,
        })
    }

    /// Commit a detail result. Returns `false` and leaves the state untouched
    /// when a newer selection has been made since the ticket was issued.
    pub fn finish_table_load(
        &mut self,
        ticket: DetailTicket,
        result: Result<TableSnapshot, ClientFetchError>,
    ) -> bool {
        if ticket.generation != self.detail_generation
            || self.selected.as_ref() != Some(&ticket.table)
        {
            return false;
        }

        self.detail = match result {
            Ok(snapshot) => DetailPhase::Loaded(snapshot),
            Err(failure) => {
                self.error = Some(failure.to_string());
                DetailPhase::Failed(failure)
            }
        };
        true
    }

    /// Clear the error banner; both phases keep their state
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
