//! Client data controller
//!
//! Drives the browser's two fetch phases against a [`TableSource`] and keeps
//! the resulting [`BrowserState`]. Out-of-order responses are handled by the
//! state machine's tickets, so a slow answer for an earlier selection never
//! replaces the data of a later one.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::schema::{TableName, TableSnapshot};

pub mod http;
pub mod state;

pub use http::HttpTableSource;
pub use state::{BrowserState, DetailPhase, DetailTicket, TablesPhase, TablesTicket};

/// Transport-level failure seen by the client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientFetchError {
    /// The server answered with a non-success status
    #[error("{message}")]
    Status { message: String, status: u16 },

    #[error("{0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

/// Where the controller gets its data from
#[async_trait]
pub trait TableSource: Send + Sync + 'static {
    async fn fetch_tables(&self) -> Result<Vec<TableName>, ClientFetchError>;

    async fn fetch_table(&self, table: &TableName) -> Result<TableSnapshot, ClientFetchError>;
}

/// Shared handle over one browser session
///
/// Clones share the same state. The state lock is never held while a fetch
/// is outstanding.
pub struct BrowserController<S: TableSource> {
    source: Arc<S>,
    state: Arc<Mutex<BrowserState>>,
}

impl<S: TableSource> Clone for BrowserController<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: TableSource> BrowserController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            state: Arc::new(Mutex::new(BrowserState::new())),
        }
    }

    /// Fetch the table list. No retry on failure.
    pub async fn load_tables(&self) {
        let ticket = self.state.lock().await.begin_tables_load();
        let result = self.source.fetch_tables().await;
        self.state.lock().await.finish_tables_load(ticket, result);
    }

    /// Select a table and fetch its snapshot
    ///
    /// Returns `true` if the fetched result was committed, `false` if the
    /// selection did not change or a newer selection superseded this one.
    pub async fn select_table(&self, table: TableName) -> bool {
        let ticket = match self.state.lock().await.select_table(table) {
            Some(ticket) => ticket,
            None => return false,
        };

        let result = self.source.fetch_table(ticket.table()).await;
        self.state.lock().await.finish_table_load(ticket, result)
    }

    pub async fn dismiss_error(&self) {
        self.state.lock().await.dismiss_error();
    }

    /// Copy of the current state
    pub async fn state(&self) -> BrowserState {
        self.state.lock().await.clone()
    }
}
