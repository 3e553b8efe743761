//! Page Assembler — frames packed pages for the renderer. Pure packaging.

#![allow(dead_code)]

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::layout::block::PageItem;
use crate::layout::budget::PageSize;
use crate::layout::columns::SidebarSlot;
use crate::layout::packer::Page;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledPage {
    /// 0-based position.
    pub index: usize,
    /// 1-based, for "Page X of N".
    pub number: usize,
    pub total: usize,
    pub label: String,
    pub items: Vec<PageItem>,
    pub continued_sections: BTreeSet<String>,
    pub sidebar: Option<SidebarSlot>,
    pub used_height: f32,
}

impl AssembledPage {
    pub fn is_continuation(&self, section_id: &str) -> bool {
        self.continued_sections.contains(section_id)
    }
}

/// The engine's complete output for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePlan {
    pub page_size: PageSize,
    pub usable_height: f32,
    pub pages: Vec<AssembledPage>,
}

impl PagePlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Wraps packed pages with numbering, size, and sidebar slots.
///
/// `sidebar` must hold one slot per page when present.
pub fn assemble(
    pages: Vec<Page>,
    sidebar: Option<Vec<SidebarSlot>>,
    page_size: PageSize,
    usable_height: f32,
) -> PagePlan {
    let total = pages.len();
    let mut slots = sidebar.map(|s| s.into_iter());

    let pages = pages
        .into_iter()
        .map(|page| {
            let number = page.index + 1;
            AssembledPage {
                index: page.index,
                number,
                total,
                label: format!("Page {number} of {total}"),
                items: page.items,
                continued_sections: page.continued_sections,
                sidebar: slots.as_mut().and_then(|s| s.next()),
                used_height: page.used_height,
            }
        })
        .collect();

    PagePlan {
        page_size,
        usable_height,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_page(index: usize) -> Page {
        Page {
            index,
            items: vec![PageItem::Block {
                block_id: format!("b{index}"),
                section_id: "experience".to_string(),
                height: 100.0,
            }],
            continued_sections: BTreeSet::new(),
            used_height: 100.0,
        }
    }

    fn size() -> PageSize {
        PageSize {
            width: 793.7,
            height: 1122.5,
        }
    }

    #[test]
    fn test_numbering_and_labels() {
        let plan = assemble((0..3).map(make_page).collect(), None, size(), 1000.0);
        assert_eq!(plan.page_count(), 3);
        assert_eq!(plan.pages[0].label, "Page 1 of 3");
        assert_eq!(plan.pages[2].label, "Page 3 of 3");
        assert!(plan.pages.iter().all(|p| p.total == 3 && p.sidebar.is_none()));
    }

    #[test]
    fn test_sidebar_slots_attached_in_order() {
        let slots = vec![
            SidebarSlot::Full { items: vec![] },
            SidebarSlot::Placeholder,
        ];
        let plan = assemble((0..2).map(make_page).collect(), Some(slots), size(), 1000.0);
        assert!(matches!(plan.pages[0].sidebar, Some(SidebarSlot::Full { .. })));
        assert_eq!(plan.pages[1].sidebar, Some(SidebarSlot::Placeholder));
    }

    #[test]
    fn test_items_pass_through_unchanged() {
        let page = make_page(0);
        let expected = page.items.clone();
        let plan = assemble(vec![page], None, size(), 1000.0);
        assert_eq!(plan.pages[0].items, expected);
    }
}
