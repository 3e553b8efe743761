//! Block model — the semantic unit of resume content subject to pagination.
//!
//! Heights follow one convention everywhere: a measured height EXCLUDES margins.
//! `margin_before` / `margin_after` are added exactly once, by the packer.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Input types
// ────────────────────────────────────────────────────────────────────────────

/// Type scale hint for measurers that estimate height from text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockRole {
    Heading,
    #[default]
    Body,
}

/// One child of a block, e.g. a single responsibility line of a job entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub id: String,
    #[serde(default)]
    pub text: String,
    /// Height supplied by a host that measured the rendered fragment itself.
    #[serde(default)]
    pub measured_height: Option<f32>,
}

impl Fragment {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            measured_height: None,
        }
    }

    pub fn measured(id: impl Into<String>, height: f32) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            measured_height: Some(height),
        }
    }
}

/// A block as built from the resume, before measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub section_id: String,
    #[serde(default)]
    pub role: BlockRole,
    /// The block's own text (excluding children).
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub children: Vec<Fragment>,
    #[serde(default)]
    pub splittable: bool,
    /// Never leave this block as the last thing on a page if it can move down with its successor.
    #[serde(default)]
    pub keep_with_next: bool,
    #[serde(default)]
    pub measured_height: Option<f32>,
    #[serde(default)]
    pub margin_before: f32,
    #[serde(default)]
    pub margin_after: f32,
}

impl Block {
    pub fn new(id: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            section_id: section_id.into(),
            role: BlockRole::Body,
            text: String::new(),
            children: Vec::new(),
            splittable: false,
            keep_with_next: false,
            measured_height: None,
            margin_before: 0.0,
            margin_after: 0.0,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_role(mut self, role: BlockRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.measured_height = Some(height);
        self
    }

    pub fn with_margins(mut self, before: f32, after: f32) -> Self {
        self.margin_before = before;
        self.margin_after = after;
        self
    }

    pub fn with_children(mut self, children: Vec<Fragment>) -> Self {
        self.children = children;
        self
    }

    pub fn splittable(mut self) -> Self {
        self.splittable = true;
        self
    }

    pub fn keep_with_next(mut self) -> Self {
        self.keep_with_next = true;
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Measured types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredFragment {
    pub id: String,
    pub height: f32,
}

/// A block whose heights are all known. Only this type reaches the packer.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredBlock {
    pub id: String,
    pub section_id: String,
    /// Height of the block's own content, excluding children and margins.
    pub own_height: f32,
    pub margin_before: f32,
    pub margin_after: f32,
    pub splittable: bool,
    pub keep_with_next: bool,
    pub children: Vec<MeasuredFragment>,
}

impl MeasuredBlock {
    /// `margin_before + margin_after + own + Σ children` — the budget a whole block consumes.
    pub fn outer_height(&self) -> f32 {
        self.head_height() + self.children_height() + self.margin_after
    }

    /// What a split block always brings to its first page before any child.
    pub fn head_height(&self) -> f32 {
        self.margin_before + self.own_height
    }

    pub fn children_height(&self) -> f32 {
        self.children.iter().map(|c| c.height).sum()
    }

    pub fn can_split(&self) -> bool {
        self.splittable && !self.children.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// One entry in a page's content list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageItem {
    /// A whole block, kept together.
    Block {
        block_id: String,
        section_id: String,
        height: f32,
    },
    /// The part of a split block that landed on this page.
    Slice {
        block_id: String,
        section_id: String,
        fragment_ids: Vec<String>,
        /// Carries the block's own content and `margin_before`.
        includes_head: bool,
        /// Carries the block's `margin_after`.
        includes_tail: bool,
        height: f32,
    },
    /// Rendering hint that `section_id` resumes from the previous page.
    Continuation {
        block_id: String,
        section_id: String,
        height: f32,
    },
}

impl PageItem {
    pub fn height(&self) -> f32 {
        match self {
            PageItem::Block { height, .. }
            | PageItem::Slice { height, .. }
            | PageItem::Continuation { height, .. } => *height,
        }
    }

    pub fn section_id(&self) -> &str {
        match self {
            PageItem::Block { section_id, .. }
            | PageItem::Slice { section_id, .. }
            | PageItem::Continuation { section_id, .. } => section_id,
        }
    }

    pub fn is_continuation(&self) -> bool {
        matches!(self, PageItem::Continuation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_measured(own: f32, children: &[f32], before: f32, after: f32) -> MeasuredBlock {
        MeasuredBlock {
            id: "b".to_string(),
            section_id: "experience".to_string(),
            own_height: own,
            margin_before: before,
            margin_after: after,
            splittable: true,
            keep_with_next: false,
            children: children
                .iter()
                .enumerate()
                .map(|(i, h)| MeasuredFragment {
                    id: format!("b-{i}"),
                    height: *h,
                })
                .collect(),
        }
    }

    #[test]
    fn test_outer_height_counts_margins_once() {
        let block = make_measured(20.0, &[10.0, 30.0], 8.0, 4.0);
        assert!((block.outer_height() - 72.0).abs() < 1e-4);
        assert!((block.head_height() - 28.0).abs() < 1e-4);
    }

    #[test]
    fn test_can_split_requires_children() {
        assert!(!make_measured(20.0, &[], 0.0, 0.0).can_split());
        assert!(make_measured(20.0, &[5.0], 0.0, 0.0).can_split());
    }

    #[test]
    fn test_block_deserializes_with_defaults() {
        let block: Block =
            serde_json::from_str(r#"{"id": "a", "section_id": "summary"}"#).unwrap();
        assert_eq!(block.role, BlockRole::Body);
        assert!(!block.splittable);
        assert!(block.children.is_empty());
        assert_eq!(block.measured_height, None);
    }

    #[test]
    fn test_page_item_serializes_with_kind_tag() {
        let item = PageItem::Continuation {
            block_id: "exp-1".to_string(),
            section_id: "experience".to_string(),
            height: 0.0,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "continuation");
        assert_eq!(json["section_id"], "experience");
    }
}
