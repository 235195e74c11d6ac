//! Reeltrack record gateway.
//!
//! Adapter between the external spreadsheet-backed record store (flat,
//! field-name-keyed rows addressed by opaque record ids) and the typed
//! entities of the domain. [`TableClient`] speaks the raw HTTP protocol
//! (formula filters, offset pagination, batched creates); the table
//! modules map rows into domain types, normalizing phase and status into
//! closed enums at this boundary.
//!
//! Reads are eventually-consistent snapshots; callers that mutate and
//! immediately need fresh state must re-fetch.

pub mod client;
pub mod contacts;
pub mod error;
pub mod fields;
pub mod orgs;
pub mod projects;
pub mod variations;
pub mod voiceovers;

pub use client::{RecordsConfig, TableClient, MAX_CREATE_BATCH};
pub use error::RecordsError;

/// All typed tables, sharing one underlying HTTP client.
#[derive(Clone)]
pub struct Tables {
    pub projects: projects::ProjectsTable,
    pub variations: variations::VariationsTable,
    pub voiceovers: voiceovers::VoiceOversTable,
    pub orgs: orgs::OrgsTable,
    pub contacts: contacts::ContactsTable,
}

impl Tables {
    /// Build all table handles from one configured client.
    pub fn new(client: TableClient) -> Self {
        Self {
            projects: projects::ProjectsTable::new(client.clone()),
            variations: variations::VariationsTable::new(client.clone()),
            voiceovers: voiceovers::VoiceOversTable::new(client.clone()),
            orgs: orgs::OrgsTable::new(client.clone()),
            contacts: contacts::ContactsTable::new(client),
        }
    }
}
