//! Handlers for the `/projects` resource.
//!
//! Every listing and detail view is narrowed to the caller's entitlement
//! set (contact → organization → authorized project codes), resolved
//! fresh per request. Status and completion shown to clients are derived
//! from the normalized phase/status enums, never from raw backend text.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use reeltrack_core::access::Entitlements;
use reeltrack_core::error::CoreError;
use reeltrack_core::phase::{
    completion_percent, section_status, Phase, ProjectStatus, SectionStatus,
};
use reeltrack_records::orgs::resolve_entitlements;
use reeltrack_records::projects::{AssetLinks, DateField, Project};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One project row for the dashboard listing.
#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub code: String,
    pub name: String,
    pub phase: Option<Phase>,
    /// Display label derived from the phase enum.
    pub phase_label: Option<&'static str>,
    pub status: ProjectStatus,
    pub completion_percent: u8,
    pub start_date: Option<DateField>,
    pub deadline: Option<DateField>,
}

impl From<Project> for ProjectSummary {
    fn from(project: Project) -> Self {
        Self {
            completion_percent: completion_percent(project.phase),
            phase_label: project.phase.map(Phase::label),
            code: project.code,
            name: project.name,
            phase: project.phase,
            status: project.status,
            start_date: project.start_date,
            deadline: project.deadline,
        }
    }
}

/// Review state of one dashboard section of a project.
#[derive(Debug, Serialize)]
pub struct SectionView {
    pub phase: Phase,
    pub label: &'static str,
    pub status: SectionStatus,
    /// Deliverable link; absence hides the section in the dashboard.
    pub asset_url: Option<String>,
}

/// Full project detail for the project page.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub summary: ProjectSummary,
    pub sections: Vec<SectionView>,
    pub assets: AssetLinks,
    pub original_languages: Vec<String>,
    pub voice_over_required: bool,
    pub duration_secs: f64,
}

/// Build the per-section review states for a project.
fn build_sections(project: &Project) -> Vec<SectionView> {
    Phase::SECTIONS
        .iter()
        .map(|&section| SectionView {
            phase: section,
            label: section.label(),
            status: section_status(project.phase, section, project.status),
            asset_url: project.assets.for_section(section).map(str::to_string),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Query parameters for `GET /projects`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Optional organization slug scoping the listing (staff use).
    pub org: Option<String>,
}

/// GET /api/v1/projects
///
/// List the caller's entitled projects, optionally scoped to one
/// organization.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<ProjectSummary>>>> {
    let entitlements = caller_entitlements(&state, &auth).await?;

    let projects = state
        .tables
        .projects
        .list(params.org.as_deref())
        .await?;

    let visible = entitlements.filter(projects, |p| p.code.as_str());
    let summaries = visible.into_iter().map(ProjectSummary::from).collect();

    Ok(Json(DataResponse { data: summaries }))
}

/// GET /api/v1/projects/{code}
///
/// Full detail for one project, with per-section review states.
pub async fn get_by_code(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let (project, _) = load_entitled_project(&state, &auth, &code).await?;

    let detail = ProjectDetail {
        sections: build_sections(&project),
        assets: project.assets.clone(),
        original_languages: project.original_languages.clone(),
        voice_over_required: project.voice_over_required,
        duration_secs: project.duration_secs,
        summary: ProjectSummary::from(project),
    };

    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/projects/{code}/approve
///
/// Record the client's approval of the current phase by transitioning
/// the project's status to "Approved".
pub async fn approve(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<StatusCode> {
    let (project, _) = load_entitled_project(&state, &auth, &code).await?;

    if project.status == ProjectStatus::Approved {
        return Err(AppError::Core(CoreError::Conflict(
            "This phase has already been approved".into(),
        )));
    }

    state
        .tables
        .projects
        .mark_approved(&project.record_id)
        .await?;

    tracing::info!(
        email = %auth.email,
        project = %project.code,
        phase = ?project.phase,
        "Client approved current phase"
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Resolve the caller's entitlement set for this request.
pub async fn caller_entitlements(
    state: &AppState,
    auth: &AuthUser,
) -> AppResult<Entitlements> {
    Ok(resolve_entitlements(&state.tables.contacts, &state.tables.orgs, &auth.email).await?)
}

/// Fetch a project by code and verify the caller may view it.
///
/// Returns the project together with the caller's entitlements so
/// follow-up checks can reuse them. An entitled-but-missing code is a
/// 404; an existing-but-unentitled code is a 403.
pub async fn load_entitled_project(
    state: &AppState,
    auth: &AuthUser,
    code: &str,
) -> AppResult<(Project, Entitlements)> {
    let entitlements = caller_entitlements(state, auth).await?;

    let project = state
        .tables
        .projects
        .find_by_code(code)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: code.to_string(),
            })
        })?;

    if !entitlements.allows(&project.code) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this project".into(),
        )));
    }

    Ok((project, entitlements))
}
