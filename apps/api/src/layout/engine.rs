//! Pagination run: `Idle → Measuring → Packing → Assembling → Done`.
//!
//! A run is one synchronous call. Nothing persists between runs and a failed run
//! returns no partial output, so identical input always yields an identical plan.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::layout::assembler::{assemble, PagePlan};
use crate::layout::block::Block;
use crate::layout::budget::{PageBudget, PageSize, MM_TO_PX};
use crate::layout::columns::{SidebarPolicy, TwoColumnCoordinator};
use crate::layout::error::{ConfigurationError, PaginationError};
use crate::layout::measure::{measure_blocks, Measure, Premeasured};
use crate::layout::packer::{FlowPacker, PackOptions, Page};

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarRequest {
    pub blocks: Vec<Block>,
    /// Sidebar track budget; defaults to the main page budget.
    #[serde(default)]
    pub budget: Option<PageBudget>,
    pub policy: SidebarPolicy,
    /// Sections repeated on later pages under `repeat-partial`.
    #[serde(default)]
    pub partial_sections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationRequest {
    /// Main-column blocks in document order.
    pub blocks: Vec<Block>,
    pub budget: PageBudget,
    #[serde(default = "default_page_width")]
    pub page_width: f32,
    #[serde(default)]
    pub options: PackOptions,
    #[serde(default)]
    pub sidebar: Option<SidebarRequest>,
}

fn default_page_width() -> f32 {
    210.0 * MM_TO_PX
}

impl PaginationRequest {
    pub fn new(blocks: Vec<Block>, budget: PageBudget) -> Self {
        Self {
            blocks,
            budget,
            page_width: default_page_width(),
            options: PackOptions::default(),
            sidebar: None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Run state
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunPhase {
    Idle,
    Measuring,
    Packing,
    Assembling,
    Done,
}

fn enter(phase: &mut RunPhase, next: RunPhase) {
    let from = *phase;
    debug_assert!(next > from, "pagination phases only move forward");
    debug!(?from, to = ?next, "Pagination phase");
    *phase = next;
}

// ────────────────────────────────────────────────────────────────────────────
// Paginator
// ────────────────────────────────────────────────────────────────────────────

/// Runs the engine with injected measurement collaborators.
pub struct Paginator<'a> {
    main: &'a dyn Measure,
    sidebar: &'a dyn Measure,
}

impl<'a> Paginator<'a> {
    pub fn new(measurer: &'a dyn Measure) -> Self {
        Self {
            main: measurer,
            sidebar: measurer,
        }
    }

    /// The sidebar track is usually narrower, so text wraps differently there.
    pub fn with_sidebar_measurer(mut self, measurer: &'a dyn Measure) -> Self {
        self.sidebar = measurer;
        self
    }

    pub fn run(&self, request: &PaginationRequest) -> Result<PagePlan, PaginationError> {
        let mut phase = RunPhase::Idle;

        // Budgets first: a page that holds nothing must fail before any work.
        let usable_height = request.budget.usable_height()?;
        let sidebar_usable = match &request.sidebar {
            Some(sidebar) => Some(sidebar.budget.unwrap_or(request.budget).usable_height()?),
            None => None,
        };
        check_marker_height(request.options.continuation_marker_height, usable_height)?;
        check_unique_ids(request)?;

        enter(&mut phase, RunPhase::Measuring);
        let main = measure_blocks(&request.blocks, self.main)?;
        let sidebar = match &request.sidebar {
            Some(sidebar) => Some(measure_blocks(&sidebar.blocks, self.sidebar)?),
            None => None,
        };

        enter(&mut phase, RunPhase::Packing);
        let mut pages = FlowPacker::new(usable_height, request.options).pack(&main);

        let slots = match (&request.sidebar, &sidebar, sidebar_usable) {
            (Some(track), Some(measured), Some(track_height)) => {
                if pages.is_empty() && !measured.is_empty() {
                    // Sidebar-only document: still one page to render it on.
                    pages.push(empty_page());
                }
                let coordinator = TwoColumnCoordinator::new(
                    track.policy,
                    track.partial_sections.clone(),
                    track_height,
                );
                Some(coordinator.coordinate(measured, pages.len())?)
            }
            _ => None,
        };

        enter(&mut phase, RunPhase::Assembling);
        let page_size = PageSize {
            width: request.page_width,
            height: request.budget.total_height,
        };
        let plan = assemble(pages, slots, page_size, usable_height);

        enter(&mut phase, RunPhase::Done);
        info!(
            blocks = request.blocks.len(),
            pages = plan.page_count(),
            two_column = request.sidebar.is_some(),
            "Pagination complete"
        );
        Ok(plan)
    }
}

/// Runs the engine on heights already carried by the request.
pub fn paginate(request: &PaginationRequest) -> Result<PagePlan, PaginationError> {
    Paginator::new(&Premeasured).run(request)
}

fn empty_page() -> Page {
    Page {
        index: 0,
        items: Vec::new(),
        continued_sections: Default::default(),
        used_height: 0.0,
    }
}

/// Every continuation page carries the marker, so it must leave room for content.
fn check_marker_height(value: f32, usable_height: f32) -> Result<(), ConfigurationError> {
    if value.is_finite() && value >= 0.0 && value < usable_height {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidMarkerHeight {
            value,
            usable_height,
        })
    }
}

fn check_unique_ids(request: &PaginationRequest) -> Result<(), ConfigurationError> {
    let sidebar_blocks = request.sidebar.iter().flat_map(|s| s.blocks.iter());
    let mut seen = HashSet::new();
    for block in request.blocks.iter().chain(sidebar_blocks) {
        if !seen.insert(block.id.as_str()) {
            return Err(ConfigurationError::DuplicateBlockId(block.id.clone()));
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
