//! Two-Column Coordinator — pairs each main-column page with sidebar content.
//!
//! The sidebar is not flowed: it is one fixed stack of blocks that must fit its own
//! track. Page 0 always shows all of it; later pages follow the `SidebarPolicy`.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use crate::layout::block::{MeasuredBlock, PageItem};
use crate::layout::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SidebarPolicy {
    /// Complete sidebar on every page.
    RepeatFull,
    /// Only the configured sections (e.g. contact details) on pages after the first.
    RepeatPartial,
    /// An empty sidebar shell on pages after the first.
    PlaceholderOnly,
}

/// What the sidebar track renders on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SidebarSlot {
    Full { items: Vec<PageItem> },
    Partial { items: Vec<PageItem> },
    /// Same width and background as the full sidebar, no content.
    Placeholder,
}

impl SidebarSlot {
    pub fn items(&self) -> &[PageItem] {
        match self {
            SidebarSlot::Full { items } | SidebarSlot::Partial { items } => items,
            SidebarSlot::Placeholder => &[],
        }
    }
}

pub struct TwoColumnCoordinator {
    policy: SidebarPolicy,
    partial_sections: Vec<String>,
    sidebar_usable_height: f32,
}

impl TwoColumnCoordinator {
    pub fn new(
        policy: SidebarPolicy,
        partial_sections: Vec<String>,
        sidebar_usable_height: f32,
    ) -> Self {
        Self {
            policy,
            partial_sections,
            sidebar_usable_height,
        }
    }

    /// Returns one slot per main-column page.
    ///
    /// Fails when the full sidebar is taller than its track: it is always rendered
    /// on page 0, and truncating it silently would drop content.
    pub fn coordinate(
        &self,
        sidebar: &[MeasuredBlock],
        page_count: usize,
    ) -> Result<Vec<SidebarSlot>, ConfigurationError> {
        let required: f32 = sidebar.iter().map(|b| b.outer_height()).sum();
        if required > self.sidebar_usable_height {
            return Err(ConfigurationError::SidebarOverflow {
                required,
                available: self.sidebar_usable_height,
                policy: self.policy,
            });
        }

        let full: Vec<PageItem> = sidebar.iter().map(sidebar_item).collect();

        let repeated = match self.policy {
            SidebarPolicy::RepeatFull => SidebarSlot::Full {
                items: full.clone(),
            },
            SidebarPolicy::RepeatPartial => SidebarSlot::Partial {
                items: sidebar
                    .iter()
                    .filter(|b| self.partial_sections.contains(&b.section_id))
                    .map(sidebar_item)
                    .collect(),
            },
            SidebarPolicy::PlaceholderOnly => SidebarSlot::Placeholder,
        };

        let mut slots = Vec::with_capacity(page_count);
        if page_count > 0 {
            slots.push(SidebarSlot::Full { items: full });
        }
        slots.extend(std::iter::repeat(repeated).take(page_count.saturating_sub(1)));
        Ok(slots)
    }
}

fn sidebar_item(block: &MeasuredBlock) -> PageItem {
    PageItem::Block {
        block_id: block.id.clone(),
        section_id: block.section_id.clone(),
        height: block.outer_height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_sidebar() -> Vec<MeasuredBlock> {
        [("contact", 120.0), ("skills", 300.0), ("languages", 80.0)]
            .iter()
            .map(|(section, h)| MeasuredBlock {
                id: format!("sidebar-{section}"),
                section_id: section.to_string(),
                own_height: *h,
                margin_before: 0.0,
                margin_after: 10.0,
                splittable: false,
                keep_with_next: false,
                children: vec![],
            })
            .collect()
    }

    fn coordinator(policy: SidebarPolicy) -> TwoColumnCoordinator {
        TwoColumnCoordinator::new(policy, vec!["contact".to_string()], 1000.0)
    }

    #[test]
    fn test_placeholder_only_after_first_page() {
        let slots = coordinator(SidebarPolicy::PlaceholderOnly)
            .coordinate(&make_sidebar(), 3)
            .unwrap();
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].items().len(), 3, "page 0 always renders the full sidebar");
        assert_eq!(slots[1], SidebarSlot::Placeholder);
        assert_eq!(slots[2], SidebarSlot::Placeholder);
    }

    #[test]
    fn test_repeat_full_on_every_page() {
        let slots = coordinator(SidebarPolicy::RepeatFull)
            .coordinate(&make_sidebar(), 2)
            .unwrap();
        assert!(slots.iter().all(|s| matches!(s, SidebarSlot::Full { .. })));
        assert_eq!(slots[0], slots[1]);
    }

    #[test]
    fn test_repeat_partial_keeps_configured_sections() {
        let slots = coordinator(SidebarPolicy::RepeatPartial)
            .coordinate(&make_sidebar(), 2)
            .unwrap();
        assert!(matches!(slots[0], SidebarSlot::Full { .. }));
        match &slots[1] {
            SidebarSlot::Partial { items } => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].section_id(), "contact");
            }
            other => panic!("expected partial sidebar, got {other:?}"),
        }
    }

    #[test]
    fn test_single_page_gets_only_full_sidebar() {
        let slots = coordinator(SidebarPolicy::PlaceholderOnly)
            .coordinate(&make_sidebar(), 1)
            .unwrap();
        assert_eq!(slots.len(), 1);
        assert!(matches!(slots[0], SidebarSlot::Full { .. }));
    }

    #[test]
    fn test_sidebar_taller_than_track_is_configuration_error() {
        let coordinator =
            TwoColumnCoordinator::new(SidebarPolicy::RepeatFull, vec![], 400.0);
        let err = coordinator.coordinate(&make_sidebar(), 2).unwrap_err();
        match err {
            ConfigurationError::SidebarOverflow {
                required,
                available,
                ..
            } => {
                assert!((required - 530.0).abs() < 1e-3);
                assert_eq!(available, 400.0);
            }
            other => panic!("expected SidebarOverflow, got {other:?}"),
        }
    }

    #[test]
    fn test_policy_serializes_kebab_case() {
        let json = serde_json::to_string(&SidebarPolicy::PlaceholderOnly).unwrap();
        assert_eq!(json, "\"placeholder-only\"");
        let policy: SidebarPolicy = serde_json::from_str("\"repeat-partial\"").unwrap();
        assert_eq!(policy, SidebarPolicy::RepeatPartial);
    }
}
