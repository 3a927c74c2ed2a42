//! HTTP table source backed by the browser's REST API

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::client::{ClientFetchError, TableSource};
use crate::schema::{TableName, TableSnapshot, TablesResponse};

/// Fetches tables and snapshots from a running schema browser server
pub struct HttpTableSource {
    client: Client,
    base_url: Url,
}

impl HttpTableSource {
    /// Create a source for the server at `base_url`
    ///
    /// # Arguments
    ///
    /// * `base_url` - Server URL including any mount path, e.g. `http://127.0.0.1:3000/browser`
    pub fn new(base_url: &str) -> Result<Self, ClientFetchError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ClientFetchError> {
        let base_url =
            Url::parse(base_url).map_err(|error| ClientFetchError::InvalidUrl(error.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientFetchError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self { client, base_url })
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientFetchError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientFetchError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        failure_message: String,
    ) -> Result<T, ClientFetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| ClientFetchError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientFetchError::Status {
                message: failure_message,
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|error| ClientFetchError::Decode(error.to_string()))
    }
}

#[async_trait]
impl TableSource for HttpTableSource {
    async fn fetch_tables(&self) -> Result<Vec<TableName>, ClientFetchError> {
        let url = self.endpoint(&["api", "tables"])?;
        let response: TablesResponse = self
            .get_json(url, "Failed to fetch tables".to_string())
            .await?;
        Ok(response.tables)
    }

    async fn fetch_table(&self, table: &TableName) -> Result<TableSnapshot, ClientFetchError> {
        let url = self.endpoint(&["api", "table", table.as_str()])?;
        self.get_json(url, format!("Failed to fetch data for table: {}", table))
            .await
    }
}
