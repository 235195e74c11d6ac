//! Raw HTTP client for the tabular record backend.
//!
//! The backend exposes one endpoint per table under a base id:
//! `GET {base_url}/{base_id}/{table}` with `filterByFormula` and offset
//! pagination, `POST` for batched creates (at most [`MAX_CREATE_BATCH`]
//! rows per call), and `PATCH {.../{record_id}}` for single-row partial
//! updates. Rows are addressed by an opaque record id distinct from any
//! business key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordsError;

/// Maximum rows per create call, imposed by the backend.
pub const MAX_CREATE_BATCH: usize = 10;

/// Default backend base URL for local development.
const DEFAULT_BASE_URL: &str = "https://api.airtable.com/v0";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Connection settings for the record backend.
#[derive(Debug, Clone)]
pub struct RecordsConfig {
    /// API root, without trailing slash.
    pub base_url: String,
    /// Bearer token for every request.
    pub api_key: String,
    /// Identifier of the base (workspace) holding all tables.
    pub base_id: String,
}

impl RecordsConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var            | Required | Default                      |
    /// |--------------------|----------|------------------------------|
    /// | `RECORDS_BASE_URL` | no       | `https://api.airtable.com/v0`|
    /// | `RECORDS_API_KEY`  | **yes**  | --                           |
    /// | `RECORDS_BASE_ID`  | **yes**  | --                           |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is not set.
    pub fn from_env() -> Self {
        let base_url = std::env::var("RECORDS_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_key =
            std::env::var("RECORDS_API_KEY").expect("RECORDS_API_KEY must be set");
        let base_id =
            std::env::var("RECORDS_BASE_ID").expect("RECORDS_BASE_ID must be set");

        Self {
            base_url,
            api_key,
            base_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One raw row as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    /// Opaque record identifier.
    pub id: String,
    /// Flat field-name-keyed values. Field order is insignificant.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    records: Vec<RawRecord>,
    /// Pagination cursor; present while more pages remain.
    offset: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreatePayload<'a> {
    records: Vec<CreateRecord<'a>>,
    /// Let the backend coerce option/link values from plain strings.
    typecast: bool,
}

#[derive(Debug, Serialize)]
struct CreateRecord<'a> {
    fields: &'a Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct UpdatePayload<'a> {
    fields: &'a Map<String, Value>,
    typecast: bool,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for one record backend base.
///
/// Cheap to clone; the inner `reqwest::Client` is reference-counted.
#[derive(Clone)]
pub struct TableClient {
    http: reqwest::Client,
    config: RecordsConfig,
}

impl TableClient {
    /// Build a client from backend configuration.
    pub fn new(config: RecordsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url, self.config.base_id, table
        )
    }

    /// List rows of `table`, optionally narrowed by a filter formula.
    ///
    /// Follows pagination cursors sequentially until the backend stops
    /// returning an offset, so the result is the full filtered snapshot.
    pub async fn list(
        &self,
        table: &str,
        formula: Option<&str>,
    ) -> Result<Vec<RawRecord>, RecordsError> {
        let url = self.table_url(table);
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut request = self.http.get(&url).bearer_auth(&self.config.api_key);
            if let Some(formula) = formula {
                request = request.query(&[("filterByFormula", formula)]);
            }
            if let Some(cursor) = &offset {
                request = request.query(&[("offset", cursor.as_str())]);
            }

            let response = request.send().await?;
            let page: ListResponse = decode(response).await?;

            records.extend(page.records);
            match page.offset {
                Some(cursor) => offset = Some(cursor),
                None => break,
            }
        }

        tracing::debug!(table, count = records.len(), "Listed records");
        Ok(records)
    }

    /// Return the first row matching the formula, if any.
    pub async fn find_first(
        &self,
        table: &str,
        formula: &str,
    ) -> Result<Option<RawRecord>, RecordsError> {
        // The backend caps page size server-side; fetching the first page
        // and taking the head is sufficient for business-key lookups.
        let url = self.table_url(table);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .query(&[("filterByFormula", formula), ("maxRecords", "1")])
            .send()
            .await?;

        let page: ListResponse = decode(response).await?;
        Ok(page.records.into_iter().next())
    }

    /// Create rows in `table`, batched in groups of [`MAX_CREATE_BATCH`].
    ///
    /// Batches are issued sequentially to respect backend rate limits.
    /// There is no rollback: if a batch fails partway through the
    /// sequence, rows created by earlier batches remain. The error
    /// reports how many rows were persisted before the failure.
    pub async fn create_batch(
        &self,
        table: &str,
        rows: Vec<Map<String, Value>>,
    ) -> Result<Vec<RawRecord>, RecordsError> {
        let url = self.table_url(table);
        let mut created = Vec::with_capacity(rows.len());

        for chunk in rows.chunks(MAX_CREATE_BATCH) {
            let payload = CreatePayload {
                records: chunk.iter().map(|fields| CreateRecord { fields }).collect(),
                typecast: true,
            };

            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&payload)
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(
                        table,
                        created = created.len(),
                        error = %e,
                        "Batch create failed partway; earlier rows are not rolled back"
                    );
                    e
                })?;

            let page: CreatedResponse = decode(response).await?;
            created.extend(page.records);
        }

        tracing::info!(table, count = created.len(), "Created records");
        Ok(created)
    }

    /// Apply a partial field update to a single row by record id.
    pub async fn update(
        &self,
        table: &str,
        record_id: &str,
        fields: Map<String, Value>,
    ) -> Result<RawRecord, RecordsError> {
        let url = format!("{}/{}", self.table_url(table), record_id);
        let payload = UpdatePayload {
            fields: &fields,
            typecast: true,
        };

        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        decode(response).await
    }
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    records: Vec<RawRecord>,
}

/// Decode a backend response, mapping non-success statuses to
/// [`RecordsError::Api`] with the body as the message.
async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, RecordsError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(RecordsError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| RecordsError::Decode(e.to_string()))
}

// ---------------------------------------------------------------------------
// Formula helpers
// ---------------------------------------------------------------------------

/// Escape a value for embedding in a single-quoted formula string literal.
pub fn escape_formula_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Build an equality filter formula: `{Field} = 'value'`.
pub fn field_equals(field: &str, value: &str) -> String {
    format!("{{{field}}} = '{}'", escape_formula_value(value))
}

/// Combine clauses with `AND(...)`. A single clause passes through as-is.
pub fn and(clauses: &[String]) -> String {
    match clauses {
        [single] => single.clone(),
        many => format!("AND({})", many.join(", ")),
    }
}
