//! Typed access to the Organizations table and entitlement resolution.
//!
//! An organization row carries the agency's per-client rate configuration
//! and the list of project codes its members may view. Read-only from
//! this system's perspective.

use serde::Serialize;
use serde_json::{Map, Value};

use reeltrack_core::access::Entitlements;
use reeltrack_core::pricing::RateCard;
use reeltrack_core::types::RecordId;

use crate::client::{field_equals, TableClient};
use crate::contacts::ContactsTable;
use crate::error::RecordsError;
use crate::fields::{f64_field, str_field, str_list_field};

/// Table name in the record backend.
const TABLE: &str = "Organizations";

const F_SLUG: &str = "Slug";
const F_NAME: &str = "Name";
const F_LANGUAGE_RATE: &str = "Language Rate";
const F_FORMAT_RATE: &str = "Format Rate";
const F_PROJECTS: &str = "Projects";

/// One client organization.
#[derive(Debug, Clone, Serialize)]
pub struct Organization {
    #[serde(skip)]
    pub record_id: RecordId,
    /// URL-safe identifier used for dashboard scoping.
    pub slug: String,
    pub name: String,
    /// Variation pricing rates; defaults apply when the sheet leaves them blank.
    pub rates: RateCard,
    /// Business keys of the projects this organization may view.
    pub project_codes: Vec<String>,
}

fn org_from_fields(record_id: &str, fields: &Map<String, Value>) -> Option<Organization> {
    let slug = str_field(fields, F_SLUG)?;
    let defaults = RateCard::default();

    Some(Organization {
        record_id: record_id.to_string(),
        name: str_field(fields, F_NAME).unwrap_or_else(|| slug.clone()),
        slug,
        rates: RateCard {
            language_rate: f64_field(fields, F_LANGUAGE_RATE).unwrap_or(defaults.language_rate),
            format_rate: f64_field(fields, F_FORMAT_RATE).unwrap_or(defaults.format_rate),
        },
        project_codes: str_list_field(fields, F_PROJECTS),
    })
}

/// Read access to the Organizations table.
#[derive(Clone)]
pub struct OrgsTable {
    client: TableClient,
}

impl OrgsTable {
    pub fn new(client: TableClient) -> Self {
        Self { client }
    }

    /// Find an organization by its slug.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, RecordsError> {
        let formula = field_equals(F_SLUG, slug);
        let row = self.client.find_first(TABLE, &formula).await?;
        Ok(row.and_then(|r| org_from_fields(&r.id, &r.fields)))
    }
}

/// Resolve the caller's entitlement set: contact → organization →
/// authorized project codes.
///
/// Side-effect-free multi-hop lookup performed at request time. Staff
/// contacts are unrestricted; a contact without an organization (or an
/// organization lookup miss) yields an empty set, which the access policy
/// treats as no access.
pub async fn resolve_entitlements(
    contacts: &ContactsTable,
    orgs: &OrgsTable,
    email: &str,
) -> Result<Entitlements, RecordsError> {
    let Some(contact) = contacts.find_by_email(email).await? else {
        return Ok(Entitlements::none());
    };

    if contact.is_staff {
        return Ok(Entitlements::Unrestricted);
    }

    let Some(org_slug) = contact.org else {
        tracing::debug!(email, "Contact has no organization linkage");
        return Ok(Entitlements::none());
    };

    match orgs.find_by_slug(&org_slug).await? {
        Some(org) => Ok(Entitlements::from_codes(org.project_codes)),
        None => {
            tracing::warn!(email, org = %org_slug, "Contact links to unknown organization");
            Ok(Entitlements::none())
        }
    }
}
