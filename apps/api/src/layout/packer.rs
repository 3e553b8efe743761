//! Flow Packer — greedy single-pass partition of measured blocks into pages.
//!
//! # Rules
//! - A block goes on the current page unless it would push the page past
//!   `usable_height` AND the page already holds something.
//! - Equality fits: `used + h == usable_height` stays on the current page, within
//!   `FIT_TOLERANCE` so fractional px heights that sum to the budget still fit.
//! - A block taller than a whole page lands alone on its own page.
//! - Splittable blocks are handed to the section splitter when splitting is enabled.

#![allow(dead_code)]

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::layout::block::{MeasuredBlock, PageItem};
use crate::layout::splitter;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackOptions {
    /// Break between the children of splittable blocks instead of moving them whole.
    #[serde(default = "default_split_sections")]
    pub split_sections: bool,
    /// Height of the synthetic "continued" marker opening a continuation page.
    #[serde(default)]
    pub continuation_marker_height: f32,
}

fn default_split_sections() -> bool {
    true
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            split_sections: true,
            continuation_marker_height: 0.0,
        }
    }
}

/// One packed page of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub index: usize,
    pub items: Vec<PageItem>,
    /// Sections this page resumes after a split on the previous page.
    pub continued_sections: BTreeSet<String>,
    pub used_height: f32,
}

impl Page {
    pub fn is_continuation(&self, section_id: &str) -> bool {
        self.continued_sections.contains(section_id)
    }
}

/// Slack for `f32` accumulation error when comparing against the page budget.
pub(crate) const FIT_TOLERANCE: f32 = 1e-3;

// ────────────────────────────────────────────────────────────────────────────
// Page cursor (shared with the splitter)
// ────────────────────────────────────────────────────────────────────────────

/// Mutable packing state: finished pages plus the page being filled.
pub(crate) struct PageCursor {
    pub(crate) usable_height: f32,
    pages: Vec<Page>,
    items: Vec<PageItem>,
    continued: BTreeSet<String>,
    used: f32,
}

impl PageCursor {
    pub(crate) fn new(usable_height: f32) -> Self {
        Self {
            usable_height,
            pages: Vec::new(),
            items: Vec::new(),
            continued: BTreeSet::new(),
            used: 0.0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn fits(&self, height: f32) -> bool {
        self.used + height <= self.usable_height + FIT_TOLERANCE
    }

    /// Taller than an empty page.
    pub(crate) fn oversized(&self, height: f32) -> bool {
        height > self.usable_height + FIT_TOLERANCE
    }

    pub(crate) fn push(&mut self, item: PageItem, height: f32) {
        self.items.push(item);
        self.used += height;
    }

    pub(crate) fn mark_continuation(&mut self, section_id: &str) {
        self.continued.insert(section_id.to_string());
    }

    /// Closes the current page. No-op when it holds nothing.
    pub(crate) fn close_page(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let index = self.pages.len();
        self.pages.push(Page {
            index,
            items: std::mem::take(&mut self.items),
            continued_sections: std::mem::take(&mut self.continued),
            used_height: self.used,
        });
        self.used = 0.0;
    }

    pub(crate) fn finish(mut self) -> Vec<Page> {
        self.close_page();
        self.pages
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Packer
// ────────────────────────────────────────────────────────────────────────────

pub struct FlowPacker {
    usable_height: f32,
    options: PackOptions,
}

impl FlowPacker {
    /// `usable_height` must already be validated as positive (see `PageBudget`).
    pub fn new(usable_height: f32, options: PackOptions) -> Self {
        Self {
            usable_height,
            options,
        }
    }

    pub fn pack(&self, blocks: &[MeasuredBlock]) -> Vec<Page> {
        let mut cursor = PageCursor::new(self.usable_height);

        for (i, block) in blocks.iter().enumerate() {
            if block.keep_with_next {
                if let Some(next) = blocks.get(i + 1) {
                    self.keep_together(&mut cursor, block, next);
                }
            }

            if self.options.split_sections && block.can_split() {
                splitter::place_splittable(
                    &mut cursor,
                    block,
                    self.options.continuation_marker_height,
                );
            } else {
                place_whole(&mut cursor, block);
            }
        }

        cursor.finish()
    }

    /// Moves `block` to a fresh page when it would otherwise end the page without
    /// the start of `next`, provided the pair fits an empty page.
    fn keep_together(&self, cursor: &mut PageCursor, block: &MeasuredBlock, next: &MeasuredBlock) {
        let pair = block.outer_height() + self.leading_height(next);
        if !cursor.is_empty() && !cursor.fits(pair) && !cursor.oversized(pair) {
            cursor.close_page();
        }
    }

    /// The smallest part of `block` that must open a page together with its predecessor.
    fn leading_height(&self, block: &MeasuredBlock) -> f32 {
        if self.options.split_sections && block.can_split() {
            splitter::leading_height(block)
        } else {
            block.outer_height()
        }
    }
}

/// Places a block as one unit, breaking the page first if it does not fit.
pub(crate) fn place_whole(cursor: &mut PageCursor, block: &MeasuredBlock) {
    let h = block.outer_height();
    if !cursor.is_empty() && !cursor.fits(h) {
        cursor.close_page();
    }
    if cursor.oversized(h) {
        warn!(
            block_id = %block.id,
            height = h,
            usable_height = cursor.usable_height,
            "Block exceeds page height; placing it alone on its own page"
        );
    }
    cursor.push(
        PageItem::Block {
            block_id: block.id.clone(),
            section_id: block.section_id.clone(),
            height: h,
        },
        h,
    );
    if cursor.oversized(h) {
        cursor.close_page();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
