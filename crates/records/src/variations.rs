//! Typed access to the Variation Requests table.
//!
//! One row per (project, language) combination in a submission batch.
//! Rows are created in bounded sequential batches and never mutated by
//! this system afterwards; payment reconciliation happens elsewhere.

use serde_json::{Map, Value};

use crate::client::TableClient;
use crate::error::RecordsError;

/// Table name in the record backend.
const TABLE: &str = "Variation Requests";

const F_PROJECT: &str = "Project";
const F_LANGUAGE: &str = "Language";
const F_FORMATS: &str = "Formats";
const F_VOICE_OVER: &str = "Voice Over";
const F_INTERNAL_PRICE: &str = "Internal Price";
const F_CLIENT_PRICE: &str = "Client Price";
const F_PAYMENT_STATUS: &str = "Payment Status";

/// Payment status every new request starts in.
const PAYMENT_NOT_PAID: &str = "Not Paid";

/// Fields for one variation request row to be created.
#[derive(Debug, Clone)]
pub struct NewVariation {
    pub project_code: String,
    pub language: String,
    pub formats: Vec<String>,
    pub voice_over_id: Option<String>,
    pub internal_price: f64,
    pub client_price: f64,
}

impl NewVariation {
    fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(F_PROJECT.into(), Value::String(self.project_code));
        fields.insert(F_LANGUAGE.into(), Value::String(self.language));
        fields.insert(
            F_FORMATS.into(),
            Value::Array(self.formats.into_iter().map(Value::String).collect()),
        );
        if let Some(voice_over) = self.voice_over_id {
            fields.insert(F_VOICE_OVER.into(), Value::String(voice_over));
        }
        fields.insert(F_INTERNAL_PRICE.into(), json_number(self.internal_price));
        fields.insert(F_CLIENT_PRICE.into(), json_number(self.client_price));
        fields.insert(
            F_PAYMENT_STATUS.into(),
            Value::String(PAYMENT_NOT_PAID.to_string()),
        );
        fields
    }
}

fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Write access to the Variation Requests table.
#[derive(Clone)]
pub struct VariationsTable {
    client: TableClient,
}

impl VariationsTable {
    pub fn new(client: TableClient) -> Self {
        Self { client }
    }

    /// Create one row per language selection, batched by the backend's
    /// create limit. Returns the number of rows persisted.
    ///
    /// No compensating transaction: a failure partway through leaves the
    /// earlier rows in place (see the client's `create_batch` docs).
    pub async fn create_all(&self, rows: Vec<NewVariation>) -> Result<usize, RecordsError> {
        let fields = rows.into_iter().map(NewVariation::into_fields).collect();
        let created = self.client.create_batch(TABLE, fields).await?;
        Ok(created.len())
    }
}
