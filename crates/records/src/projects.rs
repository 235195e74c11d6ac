//! Typed access to the Projects table.
//!
//! One row per production job, created and mostly maintained outside this
//! system. We read the full pipeline state and perform exactly two
//! mutations: status → "Approved" on client approval and status → "In
//! progress" when a variation request is submitted. Rows are never
//! deleted from here.

use serde::Serialize;
use serde_json::{Map, Value};

use reeltrack_core::phase::{Phase, ProjectStatus};
use reeltrack_core::types::RecordId;

use crate::client::{and, field_equals, TableClient};
use crate::error::RecordsError;
use crate::fields::{asset_url_field, bool_field, f64_field, str_field, str_list_field};

/// Table name in the record backend.
const TABLE: &str = "Projects";

// Field names as they appear in the backend schema.
const F_CODE: &str = "Project Code";
const F_NAME: &str = "Project Name";
const F_PHASE: &str = "Phase";
const F_STATUS: &str = "Status";
const F_START_DATE: &str = "Start Date";
const F_DEADLINE: &str = "Deadline";
const F_DURATION: &str = "Duration (s)";
const F_ORIGINAL_LANGUAGES: &str = "Original Languages";
const F_VOICE_OVER_REQUIRED: &str = "Voice Over Required";
const F_ORGANIZATION: &str = "Organization";
const F_BRIEF: &str = "Brief";
const F_SCRIPT: &str = "Script";
const F_STORYBOARD: &str = "Storyboard";
const F_ANIMATION: &str = "Animation";
const F_VOICE_FILE: &str = "Voice File";
const F_VARIATIONS: &str = "Variations";

/// Status labels written back to the backend on our two mutations.
const STATUS_APPROVED: &str = "Approved";
const STATUS_IN_PROGRESS: &str = "In progress";

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A backend date value. Parse failures degrade to the raw string so the
/// dashboard can still display whatever the sheet contains.
#[derive(Debug, Clone, Serialize)]
pub struct DateField {
    /// Verbatim backend value.
    pub raw: String,
    /// Parsed ISO date, when the raw value is well-formed.
    pub date: Option<chrono::NaiveDate>,
}

impl DateField {
    fn parse(raw: String) -> Self {
        let date = raw.trim().parse().ok();
        Self { raw, date }
    }
}

/// Deliverable links attached to a project. Presence of a link gates the
/// visibility of the corresponding review section in the dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetLinks {
    pub brief: Option<String>,
    pub script: Option<String>,
    pub storyboard: Option<String>,
    pub animation: Option<String>,
    pub voice_file: Option<String>,
    pub variations: Option<String>,
}

impl AssetLinks {
    /// Link for the deliverable reviewed in `section`.
    pub fn for_section(&self, section: Phase) -> Option<&str> {
        match section {
            Phase::Copywriting => self.script.as_deref(),
            Phase::VoiceOver => self.voice_file.as_deref(),
            Phase::Storyboard => self.storyboard.as_deref(),
            Phase::Animation => self.animation.as_deref(),
            Phase::Variations => self.variations.as_deref(),
            Phase::Testimonial => None,
        }
    }
}

/// One production job.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    /// Opaque backend record id (needed for updates, never shown to clients).
    #[serde(skip)]
    pub record_id: RecordId,
    /// External business key, unique and immutable.
    pub code: String,
    pub name: String,
    /// Canonical phase; `None` when the backend string is unrecognized.
    pub phase: Option<Phase>,
    pub status: ProjectStatus,
    /// Verbatim status label for display alongside the bucket.
    pub raw_status: String,
    pub start_date: Option<DateField>,
    pub deadline: Option<DateField>,
    /// Video length in seconds; drives variation pricing.
    pub duration_secs: f64,
    /// Languages in the project's initial scope.
    pub original_languages: Vec<String>,
    pub voice_over_required: bool,
    /// Owning organization slug, when linked.
    pub org: Option<String>,
    pub assets: AssetLinks,
}

/// Map a raw row into a [`Project`].
///
/// Phase and status are normalized into their closed enums here;
/// unrecognized values are logged at WARN for data-quality monitoring and
/// degrade to their documented fallbacks instead of failing the row.
pub fn project_from_fields(
    record_id: &str,
    fields: &Map<String, Value>,
) -> Result<Project, RecordsError> {
    let code = str_field(fields, F_CODE).ok_or(RecordsError::MissingField {
        record_id: record_id.to_string(),
        field: F_CODE,
    })?;
    let name = str_field(fields, F_NAME).unwrap_or_else(|| code.clone());

    let raw_phase = str_field(fields, F_PHASE).unwrap_or_default();
    let phase = Phase::parse(&raw_phase);
    if phase.is_none() {
        tracing::warn!(
            project = %code,
            raw = %raw_phase,
            "Unrecognized phase string from record backend"
        );
    }

    let raw_status = str_field(fields, F_STATUS).unwrap_or_default();
    let status = ProjectStatus::parse(&raw_status);
    if status == ProjectStatus::Unrecognized {
        tracing::warn!(
            project = %code,
            raw = %raw_status,
            "Unrecognized status string from record backend"
        );
    }

    Ok(Project {
        record_id: record_id.to_string(),
        code,
        name,
        phase,
        status,
        raw_status,
        start_date: str_field(fields, F_START_DATE).map(DateField::parse),
        deadline: str_field(fields, F_DEADLINE).map(DateField::parse),
        duration_secs: f64_field(fields, F_DURATION).unwrap_or(0.0),
        original_languages: str_list_field(fields, F_ORIGINAL_LANGUAGES),
        voice_over_required: bool_field(fields, F_VOICE_OVER_REQUIRED),
        org: str_field(fields, F_ORGANIZATION),
        assets: AssetLinks {
            brief: asset_url_field(fields, F_BRIEF),
            script: asset_url_field(fields, F_SCRIPT),
            storyboard: asset_url_field(fields, F_STORYBOARD),
            animation: asset_url_field(fields, F_ANIMATION),
            voice_file: asset_url_field(fields, F_VOICE_FILE),
            variations: asset_url_field(fields, F_VARIATIONS),
        },
    })
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Read/write access to the Projects table.
#[derive(Clone)]
pub struct ProjectsTable {
    client: TableClient,
}

impl ProjectsTable {
    pub fn new(client: TableClient) -> Self {
        Self { client }
    }

    /// List projects, optionally scoped to one organization.
    ///
    /// Rows that cannot be mapped (missing project code) are skipped with
    /// a warning rather than failing the whole listing.
    pub async fn list(&self, org: Option<&str>) -> Result<Vec<Project>, RecordsError> {
        let formula = org.map(|slug| and(&[field_equals(F_ORGANIZATION, slug)]));
        let rows = self.client.list(TABLE, formula.as_deref()).await?;

        let mut projects = Vec::with_capacity(rows.len());
        for row in rows {
            match project_from_fields(&row.id, &row.fields) {
                Ok(project) => projects.push(project),
                Err(e) => {
                    tracing::warn!(record_id = %row.id, error = %e, "Skipping unmappable project row");
                }
            }
        }
        Ok(projects)
    }

    /// Find a project by its business key.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Project>, RecordsError> {
        let formula = field_equals(F_CODE, code);
        match self.client.find_first(TABLE, &formula).await? {
            Some(row) => Ok(Some(project_from_fields(&row.id, &row.fields)?)),
            None => Ok(None),
        }
    }

    /// Transition a project's status to "Approved".
    pub async fn mark_approved(&self, record_id: &RecordId) -> Result<(), RecordsError> {
        self.set_status(record_id, STATUS_APPROVED).await
    }

    /// Transition a project's status to "In progress".
    pub async fn mark_in_progress(&self, record_id: &RecordId) -> Result<(), RecordsError> {
        self.set_status(record_id, STATUS_IN_PROGRESS).await
    }

    async fn set_status(&self, record_id: &RecordId, status: &str) -> Result<(), RecordsError> {
        let mut fields = Map::new();
        fields.insert(F_STATUS.to_string(), Value::String(status.to_string()));
        self.client.update(TABLE, record_id, fields).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn maps_a_full_row() {
        let fields = row(json!({
            "Project Code": "PRJ-7",
            "Project Name": "Spring launch",
            "Phase": "🖼️ Storyboard",
            "Status": "In Review",
            "Start Date": "2026-01-10",
            "Deadline": "asap",
            "Duration (s)": 45,
            "Original Languages": ["English"],
            "Voice Over Required": true,
            "Organization": "acme",
            "Storyboard": [{ "url": "https://files.example/sb.png" }],
        }));

        let project = project_from_fields("recABC", &fields).unwrap();
        assert_eq!(project.code, "PRJ-7");
        assert_eq!(project.phase, Some(Phase::Storyboard));
        assert_eq!(project.status, ProjectStatus::UnderReview);
        assert_eq!(project.duration_secs, 45.0);
        assert_eq!(project.original_languages, vec!["English"]);
        assert!(project.voice_over_required);
        assert_eq!(project.org.as_deref(), Some("acme"));
        assert_eq!(
            project.assets.for_section(Phase::Storyboard),
            Some("https://files.example/sb.png")
        );

        // Well-formed date parses; free-text deadline degrades to raw.
        assert!(project.start_date.unwrap().date.is_some());
        let deadline = project.deadline.unwrap();
        assert!(deadline.date.is_none());
        assert_eq!(deadline.raw, "asap");
    }

    #[test]
    fn missing_code_is_an_error() {
        let fields = row(json!({ "Project Name": "No key" }));
        let err = project_from_fields("recXYZ", &fields).unwrap_err();
        assert!(matches!(err, RecordsError::MissingField { field: "Project Code", .. }));
    }

    #[test]
    fn unknown_phase_and_status_degrade() {
        let fields = row(json!({
            "Project Code": "PRJ-8",
            "Phase": "post production",
            "Status": "blocked",
        }));

        let project = project_from_fields("recDEF", &fields).unwrap();
        assert_eq!(project.phase, None);
        assert_eq!(project.status, ProjectStatus::Unrecognized);
        // Name falls back to the code.
        assert_eq!(project.name, "PRJ-8");
    }
}
