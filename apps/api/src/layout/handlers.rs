//! Axum route handlers for the Pagination API.
//!
//! Packing is CPU-bound, so each run happens inside `tokio::task::spawn_blocking`.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::layout::assembler::PagePlan;
use crate::layout::block::Block;
use crate::layout::document::{PreparedDocument, TemplateOptions};
use crate::layout::engine::{paginate, PaginationRequest};
use crate::layout::error::PaginationError;
use crate::models::resume::ResumeDocument;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResumePaginateRequest {
    pub resume: ResumeDocument,
    #[serde(default)]
    pub template: Option<TemplateOptions>,
}

#[derive(Debug, Serialize)]
pub struct ResumePaginateResponse {
    pub plan: PagePlan,
    /// The blocks the plan refers to, so the renderer can resolve ids to content.
    pub main_blocks: Vec<Block>,
    pub sidebar_blocks: Vec<Block>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/paginate
///
/// Paginates blocks whose heights the host already measured.
pub async fn handle_paginate(
    Json(request): Json<PaginationRequest>,
) -> Result<Json<PagePlan>, AppError> {
    let plan = tokio::task::spawn_blocking(move || paginate(&request))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in pagination: {e}")))??;

    Ok(Json(plan))
}

/// POST /api/v1/resumes/paginate
///
/// Builds blocks from a resume document, estimates their heights from font
/// metrics, and paginates them with the requested (or default) template.
pub async fn handle_paginate_resume(
    State(state): State<AppState>,
    Json(request): Json<ResumePaginateRequest>,
) -> Result<Json<ResumePaginateResponse>, AppError> {
    if request.resume.personal_info.full_name.trim().is_empty() {
        return Err(AppError::Validation("full_name cannot be empty".to_string()));
    }

    let template = request.template.unwrap_or_else(|| state.default_template.clone());
    let resume = request.resume;

    let response = tokio::task::spawn_blocking(move || {
        let prepared =
            PreparedDocument::prepare(&resume, &template).map_err(PaginationError::from)?;
        let plan = prepared.paginate(template.text)?;
        let sidebar_blocks = prepared
            .request
            .sidebar
            .map(|s| s.blocks)
            .unwrap_or_default();
        Ok::<_, AppError>(ResumePaginateResponse {
            plan,
            main_blocks: prepared.request.blocks,
            sidebar_blocks,
        })
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in pagination: {e}")))??;

    Ok(Json(response))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
