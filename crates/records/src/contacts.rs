//! Typed access to the Contacts table (CRM-equivalent lookup).
//!
//! One row per dashboard user, keyed by email: display name, avatar,
//! organization linkage, staff flag, and the credential material the API
//! layer needs (Argon2 password hash, reset-token hash). The gateway
//! stores and returns hashes opaquely; hashing itself lives in the API
//! crate.

use serde::Serialize;
use serde_json::{Map, Value};

use reeltrack_core::types::RecordId;

use crate::client::{field_equals, TableClient};
use crate::error::RecordsError;
use crate::fields::{asset_url_field, bool_field, str_field};

/// Table name in the record backend.
const TABLE: &str = "Contacts";

const F_EMAIL: &str = "Email";
const F_NAME: &str = "Name";
const F_AVATAR: &str = "Avatar";
const F_ORGANIZATION: &str = "Organization";
const F_STAFF: &str = "Staff";
const F_PASSWORD_HASH: &str = "Password Hash";
const F_RESET_TOKEN_HASH: &str = "Reset Token Hash";

/// One dashboard user.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    #[serde(skip)]
    pub record_id: RecordId,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    /// Slug of the organization this contact belongs to.
    pub org: Option<String>,
    /// Agency staff see every project.
    pub is_staff: bool,
    /// PHC-formatted Argon2 hash; absent for contacts that never signed up.
    #[serde(skip)]
    pub password_hash: Option<String>,
    /// SHA-256 hash of the most recent password-reset token.
    #[serde(skip)]
    pub reset_token_hash: Option<String>,
}

fn contact_from_fields(record_id: &str, fields: &Map<String, Value>) -> Option<Contact> {
    let email = str_field(fields, F_EMAIL)?;
    Some(Contact {
        record_id: record_id.to_string(),
        display_name: str_field(fields, F_NAME).unwrap_or_else(|| email.clone()),
        email,
        avatar_url: asset_url_field(fields, F_AVATAR),
        org: str_field(fields, F_ORGANIZATION),
        is_staff: bool_field(fields, F_STAFF),
        password_hash: str_field(fields, F_PASSWORD_HASH),
        reset_token_hash: str_field(fields, F_RESET_TOKEN_HASH),
    })
}

/// Read/write access to the Contacts table.
#[derive(Clone)]
pub struct ContactsTable {
    client: TableClient,
}

impl ContactsTable {
    pub fn new(client: TableClient) -> Self {
        Self { client }
    }

    /// Look up a contact by email (case-sensitive backend match; emails
    /// are stored lowercased on creation).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Contact>, RecordsError> {
        let formula = field_equals(F_EMAIL, &email.to_lowercase());
        let row = self.client.find_first(TABLE, &formula).await?;
        Ok(row.and_then(|r| contact_from_fields(&r.id, &r.fields)))
    }

    /// Create a contact on sign-up.
    pub async fn create(
        &self,
        email: &str,
        display_name: &str,
        password_hash: &str,
    ) -> Result<Contact, RecordsError> {
        let mut fields = Map::new();
        fields.insert(F_EMAIL.into(), Value::String(email.to_lowercase()));
        fields.insert(F_NAME.into(), Value::String(display_name.to_string()));
        fields.insert(
            F_PASSWORD_HASH.into(),
            Value::String(password_hash.to_string()),
        );

        let created = self.client.create_batch(TABLE, vec![fields]).await?;
        let row = created.into_iter().next().ok_or_else(|| {
            RecordsError::Decode("Create returned no contact row".to_string())
        })?;
        contact_from_fields(&row.id, &row.fields).ok_or_else(|| {
            RecordsError::Decode("Created contact row is missing its email".to_string())
        })
    }

    /// Replace the contact's stored password hash.
    pub async fn set_password_hash(
        &self,
        record_id: &RecordId,
        password_hash: &str,
    ) -> Result<(), RecordsError> {
        let mut fields = Map::new();
        fields.insert(
            F_PASSWORD_HASH.into(),
            Value::String(password_hash.to_string()),
        );
        self.client.update(TABLE, record_id, fields).await?;
        Ok(())
    }

    /// Store the hash of a freshly issued password-reset token.
    pub async fn set_reset_token_hash(
        &self,
        record_id: &RecordId,
        token_hash: &str,
    ) -> Result<(), RecordsError> {
        let mut fields = Map::new();
        fields.insert(
            F_RESET_TOKEN_HASH.into(),
            Value::String(token_hash.to_string()),
        );
        self.client.update(TABLE, record_id, fields).await?;
        Ok(())
    }

    /// Invalidate the stored reset token after it has been consumed.
    pub async fn clear_reset_token_hash(&self, record_id: &RecordId) -> Result<(), RecordsError> {
        let mut fields = Map::new();
        fields.insert(F_RESET_TOKEN_HASH.into(), Value::Null);
        self.client.update(TABLE, record_id, fields).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_contact_row() {
        let fields = json!({
            "Email": "kim@acme.example",
            "Name": "Kim",
            "Organization": "acme",
            "Staff": false,
            "Password Hash": "$argon2id$v=19$m=19456,t=2,p=1$abc$def",
        });
        let contact = contact_from_fields("recC1", fields.as_object().unwrap()).unwrap();

        assert_eq!(contact.email, "kim@acme.example");
        assert_eq!(contact.display_name, "Kim");
        assert_eq!(contact.org.as_deref(), Some("acme"));
        assert!(!contact.is_staff);
        assert!(contact.password_hash.is_some());
        assert!(contact.reset_token_hash.is_none());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let fields = json!({ "Email": "solo@example.com" });
        let contact = contact_from_fields("recC2", fields.as_object().unwrap()).unwrap();
        assert_eq!(contact.display_name, "solo@example.com");
    }

    #[test]
    fn row_without_email_is_dropped() {
        let fields = json!({ "Name": "Ghost" });
        assert!(contact_from_fields("recC3", fields.as_object().unwrap()).is_none());
    }
}
