//! Typed access to the Voice-Overs catalog table.
//!
//! Read-only catalog of voice-over profiles, filtered by language and
//! gender for the selection UI.

use serde::Serialize;
use serde_json::{Map, Value};

use reeltrack_core::types::RecordId;

use crate::client::{and, field_equals, TableClient};
use crate::error::RecordsError;
use crate::fields::{asset_url_field, str_field};

/// Table name in the record backend.
const TABLE: &str = "Voice Overs";

const F_NAME: &str = "Name";
const F_GENDER: &str = "Gender";
const F_LANGUAGE: &str = "Language";
const F_PREVIEW: &str = "Preview";
const F_PHOTO: &str = "Photo";

/// One voice-over profile from the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceOver {
    pub id: RecordId,
    pub name: String,
    pub gender: Option<String>,
    pub language: Option<String>,
    /// Preview audio URL.
    pub preview_url: Option<String>,
    /// Profile image URL.
    pub photo_url: Option<String>,
}

fn voice_over_from_fields(record_id: &str, fields: &Map<String, Value>) -> VoiceOver {
    VoiceOver {
        id: record_id.to_string(),
        name: str_field(fields, F_NAME).unwrap_or_else(|| record_id.to_string()),
        gender: str_field(fields, F_GENDER),
        language: str_field(fields, F_LANGUAGE),
        preview_url: asset_url_field(fields, F_PREVIEW),
        photo_url: asset_url_field(fields, F_PHOTO),
    }
}

/// Read access to the Voice-Overs table.
#[derive(Clone)]
pub struct VoiceOversTable {
    client: TableClient,
}

impl VoiceOversTable {
    pub fn new(client: TableClient) -> Self {
        Self { client }
    }

    /// List profiles, optionally narrowed by language and/or gender.
    pub async fn list(
        &self,
        language: Option<&str>,
        gender: Option<&str>,
    ) -> Result<Vec<VoiceOver>, RecordsError> {
        let mut clauses = Vec::new();
        if let Some(language) = language {
            clauses.push(field_equals(F_LANGUAGE, language));
        }
        if let Some(gender) = gender {
            clauses.push(field_equals(F_GENDER, gender));
        }

        let formula = if clauses.is_empty() {
            None
        } else {
            Some(and(&clauses))
        };

        let rows = self.client.list(TABLE, formula.as_deref()).await?;
        Ok(rows
            .iter()
            .map(|row| voice_over_from_fields(&row.id, &row.fields))
            .collect())
    }
}
