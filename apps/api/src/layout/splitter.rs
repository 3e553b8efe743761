//! Section Splitter — breaks a splittable block between its children.
//!
//! Children are placed one at a time against the remaining budget of the current
//! page. The block's head (`margin_before` + own content) always travels with its
//! first child; `margin_after` travels with its last. When a child does not fit and
//! the current page already holds a child of this block, the page is closed and
//! the next one opens with a continuation marker for the block's section.
//!
//! A continuation page always takes at least one child after its marker, even when
//! marker plus child exceed the budget: every continuation page carries the marker,
//! so no later page could hold that child either. The run rejects marker heights
//! that leave no room at all.

use tracing::{debug, warn};

use crate::layout::block::{MeasuredBlock, MeasuredFragment, PageItem};
use crate::layout::packer::PageCursor;

/// Head plus first child (plus tail if it is the only child).
pub(crate) fn leading_height(block: &MeasuredBlock) -> f32 {
    let first = block.children.first().map_or(0.0, |c| c.height);
    let tail = if block.children.len() == 1 {
        block.margin_after
    } else {
        0.0
    };
    block.head_height() + first + tail
}

/// The part of a block accumulated for the current page.
struct OpenSlice {
    fragment_ids: Vec<String>,
    includes_head: bool,
    height: f32,
}

impl OpenSlice {
    fn head(block: &MeasuredBlock) -> Self {
        Self {
            fragment_ids: Vec::new(),
            includes_head: true,
            height: block.head_height(),
        }
    }

    fn resumed() -> Self {
        Self {
            fragment_ids: Vec::new(),
            includes_head: false,
            height: 0.0,
        }
    }

    fn has_children(&self) -> bool {
        !self.fragment_ids.is_empty()
    }

    fn add(&mut self, child: &MeasuredFragment, height: f32) {
        self.fragment_ids.push(child.id.clone());
        self.height += height;
    }

    /// A slice holding the whole block collapses back into a plain block item.
    fn into_item(self, block: &MeasuredBlock, includes_tail: bool) -> (PageItem, f32) {
        let height = self.height;
        let item = if self.includes_head && includes_tail {
            PageItem::Block {
                block_id: block.id.clone(),
                section_id: block.section_id.clone(),
                height,
            }
        } else {
            PageItem::Slice {
                block_id: block.id.clone(),
                section_id: block.section_id.clone(),
                fragment_ids: self.fragment_ids,
                includes_head: self.includes_head,
                includes_tail,
                height,
            }
        };
        (item, height)
    }
}

/// Places a splittable block (with at least one child) starting on the current page.
pub(crate) fn place_splittable(cursor: &mut PageCursor, block: &MeasuredBlock, marker_height: f32) {
    if !cursor.is_empty() && !cursor.fits(leading_height(block)) {
        cursor.close_page();
    }

    let last = block.children.len().saturating_sub(1);
    let mut slice = OpenSlice::head(block);

    for (i, child) in block.children.iter().enumerate() {
        let h = if i == last {
            child.height + block.margin_after
        } else {
            child.height
        };

        if slice.has_children() && !cursor.fits(slice.height + h) {
            let (item, height) = slice.into_item(block, false);
            cursor.push(item, height);
            cursor.close_page();

            debug!(
                block_id = %block.id,
                section_id = %block.section_id,
                resume_at = %child.id,
                "Splitting section across pages"
            );
            cursor.mark_continuation(&block.section_id);
            cursor.push(
                PageItem::Continuation {
                    block_id: block.id.clone(),
                    section_id: block.section_id.clone(),
                    height: marker_height,
                },
                marker_height,
            );
            slice = OpenSlice::resumed();
        }

        if !slice.has_children() && cursor.oversized(slice.height + h) {
            warn!(
                block_id = %block.id,
                fragment_id = %child.id,
                height = h,
                usable_height = cursor.usable_height,
                "Child exceeds page height; placing it alone"
            );
        }
        slice.add(child, h);
    }

    let (item, height) = slice.into_item(block, true);
    cursor.push(item, height);
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
