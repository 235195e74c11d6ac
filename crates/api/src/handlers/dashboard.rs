//! Handlers for the dashboard aggregate statistics widget.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use reeltrack_core::phase::{
    completion_percent, is_archived, is_fully_completed, ProjectStatus,
};

use crate::error::AppResult;
use crate::handlers::projects::caller_entitlements;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Aggregate numbers for the dashboard header.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    /// Entitled projects, excluding archived (approved testimonial) ones.
    pub total: usize,
    /// Projects with the final pre-testimonial phase approved.
    pub completed: usize,
    pub in_progress: usize,
    /// Projects whose current phase awaits client review.
    pub to_review: usize,
    /// Mean completion percentage across the counted projects.
    pub average_completion: f64,
}

/// GET /api/v1/dashboard/stats
pub async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let entitlements = caller_entitlements(&state, &auth).await?;

    let projects = state.tables.projects.list(None).await?;
    let visible = entitlements.filter(projects, |p| p.code.as_str());

    // Archived projects (testimonial approved) leave the aggregates.
    let counted: Vec<_> = visible
        .into_iter()
        .filter(|p| !is_archived(p.phase, p.status))
        .collect();

    let total = counted.len();
    let completed = counted
        .iter()
        .filter(|p| is_fully_completed(p.phase, p.status))
        .count();
    let to_review = counted
        .iter()
        .filter(|p| p.status == ProjectStatus::UnderReview)
        .count();

    let average_completion = if counted.is_empty() {
        0.0
    } else {
        let sum: u32 = counted
            .iter()
            .map(|p| u32::from(completion_percent(p.phase)))
            .sum();
        f64::from(sum) / total as f64
    };

    Ok(Json(DataResponse {
        data: DashboardStats {
            total,
            completed,
            in_progress: total - completed,
            to_review,
            average_completion,
        },
    }))
}
