//! Handlers for variation requests (quotes and submission).
//!
//! A quote prices each selected (language, format-set) combination at the
//! organization's configured rates; submission re-validates, persists one
//! row per language in bounded sequential batches, then transitions the
//! project to "In progress". There is no compensating transaction: a
//! failure partway leaves earlier rows in place and surfaces as a generic
//! error (see the record gateway docs).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use reeltrack_core::pricing::{quote, validate_submission, LanguageSelection, RateCard};
use reeltrack_records::projects::Project;
use reeltrack_records::variations::NewVariation;

use crate::error::AppResult;
use crate::handlers::projects::load_entitled_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for quote and submission endpoints.
#[derive(Debug, Deserialize)]
pub struct VariationRequest {
    pub selections: Vec<LanguageSelection>,
}

/// Price for one language in a quote.
#[derive(Debug, Serialize)]
pub struct QuoteLine {
    pub language: String,
    pub format_count: usize,
    /// Whether this language was in the project's original scope.
    pub original: bool,
    /// Client-facing price at the organization's rates.
    pub price: f64,
}

/// Response body for `POST /projects/{code}/variations/quote`.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub lines: Vec<QuoteLine>,
    pub total: f64,
}

/// Response body for a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    /// Number of variation request rows persisted.
    pub created: usize,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{code}/variations/quote
///
/// Price the requested selections without persisting anything.
pub async fn quote_variations(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(input): Json<VariationRequest>,
) -> AppResult<Json<DataResponse<QuoteResponse>>> {
    let (project, _) = load_entitled_project(&state, &auth, &code).await?;
    let rates = org_rates(&state, &project).await?;

    let lines: Vec<QuoteLine> = input
        .selections
        .iter()
        .map(|selection| {
            let original = selection.is_original(&project.original_languages);
            let quoted = quote(
                project.duration_secs,
                selection.formats.len(),
                original,
                &rates,
            );
            QuoteLine {
                language: selection.language.clone(),
                format_count: selection.formats.len(),
                original,
                price: quoted.displayed_cost,
            }
        })
        .collect();

    let total = lines.iter().map(|line| line.price).sum();

    Ok(Json(DataResponse {
        data: QuoteResponse { lines, total },
    }))
}

/// POST /api/v1/projects/{code}/variations
///
/// Validate and persist the variation request, then move the project to
/// "In progress". The dashboard re-fetches after success; reads are
/// eventually consistent, so no fresh state is returned here.
pub async fn submit_variations(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(input): Json<VariationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SubmissionResponse>>)> {
    let (project, _) = load_entitled_project(&state, &auth, &code).await?;

    validate_submission(
        &input.selections,
        project.voice_over_required,
        &project.original_languages,
    )?;

    let rates = org_rates(&state, &project).await?;

    let rows: Vec<NewVariation> = input
        .selections
        .into_iter()
        .map(|selection| {
            let original = selection.is_original(&project.original_languages);
            let quoted = quote(
                project.duration_secs,
                selection.formats.len(),
                original,
                &rates,
            );
            NewVariation {
                project_code: project.code.clone(),
                language: selection.language,
                formats: selection.formats,
                voice_over_id: selection.voice_over_id,
                internal_price: quoted.internal_cost,
                client_price: quoted.displayed_cost,
            }
        })
        .collect();

    let created = state.tables.variations.create_all(rows).await?;

    state
        .tables
        .projects
        .mark_in_progress(&project.record_id)
        .await?;

    tracing::info!(
        email = %auth.email,
        project = %project.code,
        created,
        "Variation request submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmissionResponse { created },
        }),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The organization's rate card, falling back to agency defaults when the
/// project has no organization or the organization row is missing.
async fn org_rates(state: &AppState, project: &Project) -> AppResult<RateCard> {
    let Some(org_slug) = project.org.as_deref() else {
        return Ok(RateCard::default());
    };

    Ok(state
        .tables
        .orgs
        .find_by_slug(org_slug)
        .await?
        .map(|org| org.rates)
        .unwrap_or_default())
}
