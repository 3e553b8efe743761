//! Builds pagination blocks from a resume document for a template layout.
//!
//! Every visual template shares this one block structure; templates only differ
//! in page setup, typography, and column arrangement (`TemplateOptions`).

use serde::{Deserialize, Serialize};

use crate::layout::assembler::PagePlan;
use crate::layout::block::{Block, BlockRole, Fragment};
use crate::layout::budget::{PageSetup, MM_TO_PX};
use crate::layout::columns::SidebarPolicy;
use crate::layout::engine::{PaginationRequest, Paginator, SidebarRequest};
use crate::layout::error::{ConfigurationError, PaginationError};
use crate::layout::font_metrics::{FontFamily, TextMeasurer, TextStyle};
use crate::layout::packer::PackOptions;
use crate::models::resume::{format_date_range, ResumeDocument};

/// Section identifiers shared with the renderer.
pub mod sections {
    pub const PERSONAL_INFO: &str = "personalInfo";
    pub const CONTACT: &str = "contact";
    pub const SUMMARY: &str = "summary";
    pub const EXPERIENCE: &str = "experience";
    pub const EDUCATION: &str = "education";
    pub const SKILLS: &str = "skills";
    pub const LANGUAGES: &str = "languages";
}

// Vertical rhythm, in pixels.
const HEADER_GAP: f32 = 18.0;
const SECTION_GAP: f32 = 14.0;
const HEADING_GAP: f32 = 6.0;
const ENTRY_GAP: f32 = 10.0;

// ────────────────────────────────────────────────────────────────────────────
// Template options
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnLayout {
    SingleColumn,
    TwoColumn {
        sidebar_width_mm: f32,
        #[serde(default = "default_gutter_mm")]
        gutter_mm: f32,
        policy: SidebarPolicy,
        #[serde(default = "default_partial_sections")]
        partial_sections: Vec<String>,
    },
}

fn default_gutter_mm() -> f32 {
    6.0
}

fn default_partial_sections() -> Vec<String> {
    vec![sections::CONTACT.to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateOptions {
    pub page: PageSetup,
    pub text: TextStyle,
    pub columns: ColumnLayout,
    #[serde(default)]
    pub pack: PackOptions,
}

impl TemplateOptions {
    pub fn single_column(page: PageSetup, font: FontFamily, font_size_px: f32) -> Self {
        Self {
            page,
            text: TextStyle::new(font, font_size_px),
            columns: ColumnLayout::SingleColumn,
            pack: PackOptions::default(),
        }
    }
}

/// A resume turned into an engine request plus the column widths to measure against.
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub request: PaginationRequest,
    pub main_width_px: f32,
    pub sidebar_width_px: Option<f32>,
}

impl PreparedDocument {
    pub fn prepare(doc: &ResumeDocument, template: &TemplateOptions) -> Result<Self, ConfigurationError> {
        let content_width = template.page.content_width()?;
        let size = template.page.size();

        match &template.columns {
            ColumnLayout::SingleColumn => {
                let mut request = PaginationRequest::new(main_blocks(doc, false), template.page.budget());
                request.page_width = size.width;
                request.options = template.pack;
                Ok(Self {
                    request,
                    main_width_px: content_width,
                    sidebar_width_px: None,
                })
            }
            ColumnLayout::TwoColumn {
                sidebar_width_mm,
                gutter_mm,
                policy,
                partial_sections,
            } => {
                let sidebar_width = sidebar_width_mm * MM_TO_PX;
                let main_width = content_width - sidebar_width - gutter_mm * MM_TO_PX;
                if sidebar_width <= 0.0 || main_width <= 0.0 {
                    return Err(ConfigurationError::InvalidPageSetup(format!(
                        "columns do not fit: sidebar {sidebar_width}px, main {main_width}px"
                    )));
                }

                let mut request = PaginationRequest::new(main_blocks(doc, true), template.page.budget());
                request.page_width = size.width;
                request.options = template.pack;
                request.sidebar = Some(SidebarRequest {
                    blocks: sidebar_blocks(doc),
                    budget: None,
                    policy: *policy,
                    partial_sections: partial_sections.clone(),
                });
                Ok(Self {
                    request,
                    main_width_px: main_width,
                    sidebar_width_px: Some(sidebar_width),
                })
            }
        }
    }

    /// Runs the engine with text-metric measurement for each column.
    pub fn paginate(&self, style: TextStyle) -> Result<PagePlan, PaginationError> {
        let main = TextMeasurer::new(style, self.main_width_px);
        let sidebar = TextMeasurer::new(style, self.sidebar_width_px.unwrap_or(self.main_width_px));
        Paginator::new(&main)
            .with_sidebar_measurer(&sidebar)
            .run(&self.request)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Block builders
// ────────────────────────────────────────────────────────────────────────────

fn heading(id: &str, section: &str, title: &str) -> Block {
    Block::new(id, section)
        .with_role(BlockRole::Heading)
        .with_text(title)
        .with_margins(SECTION_GAP, HEADING_GAP)
        .keep_with_next()
}

/// Main-column blocks. With a sidebar, contact details, skills, and languages move there.
pub fn main_blocks(doc: &ResumeDocument, has_sidebar: bool) -> Vec<Block> {
    let info = &doc.personal_info;
    let mut blocks = Vec::new();

    let mut header_lines = vec![info.full_name.clone()];
    header_lines.extend(info.headline.clone());
    let mut header = Block::new("personal-info", sections::PERSONAL_INFO)
        .with_role(BlockRole::Heading)
        .with_text(header_lines.join("\n"))
        .with_margins(0.0, HEADER_GAP);
    if !has_sidebar {
        let contact = info.contact_lines();
        if !contact.is_empty() {
            header = header.with_children(vec![Fragment::new("personal-info-contact", contact.join(" · "))]);
        }
    }
    blocks.push(header);

    if let Some(summary) = doc.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        blocks.push(heading("summary-heading", sections::SUMMARY, "Summary"));
        blocks.push(Block::new("summary", sections::SUMMARY).with_text(summary));
    }

    if !doc.experience.is_empty() {
        blocks.push(heading("experience-heading", sections::EXPERIENCE, "Experience"));
        for entry in &doc.experience {
            let id = format!("exp-{}", entry.id);
            let children = entry
                .responsibilities
                .iter()
                .enumerate()
                .map(|(i, line)| Fragment::new(format!("{id}-{i}"), line.as_str()))
                .collect();
            blocks.push(
                Block::new(id.as_str(), sections::EXPERIENCE)
                    .with_text(format!(
                        "{} — {}\n{}",
                        entry.role,
                        entry.company,
                        format_date_range(entry.start_date, entry.end_date)
                    ))
                    .with_children(children)
                    .with_margins(0.0, ENTRY_GAP)
                    .splittable(),
            );
        }
    }

    if !doc.education.is_empty() {
        blocks.push(heading("education-heading", sections::EDUCATION, "Education"));
        for entry in &doc.education {
            let id = format!("edu-{}", entry.id);
            let children = entry
                .details
                .iter()
                .enumerate()
                .map(|(i, line)| Fragment::new(format!("{id}-{i}"), line.as_str()))
                .collect();
            // Education entries are short; they move as a unit.
            blocks.push(
                Block::new(id.as_str(), sections::EDUCATION)
                    .with_text(format!(
                        "{} — {}\n{}",
                        entry.degree,
                        entry.institution,
                        format_date_range(entry.start_date, entry.end_date)
                    ))
                    .with_children(children)
                    .with_margins(0.0, ENTRY_GAP),
            );
        }
    }

    if !has_sidebar {
        push_list_section(&mut blocks, sections::SKILLS, "Skills", &doc.skills);
        push_list_section(&mut blocks, sections::LANGUAGES, "Languages", &doc.languages);
    }

    blocks
}

fn push_list_section(blocks: &mut Vec<Block>, section: &str, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    blocks.push(heading(&format!("{section}-heading"), section, title));
    blocks.push(Block::new(section, section).with_text(items.join(", ")));
}

/// Fixed sidebar stack: one atomic block per section, title plus one line per item.
pub fn sidebar_blocks(doc: &ResumeDocument) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut push = |section: &str, title: &str, items: Vec<String>| {
        if items.is_empty() {
            return;
        }
        let id = format!("sidebar-{section}");
        let children = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| Fragment::new(format!("{id}-{i}"), item))
            .collect();
        blocks.push(
            Block::new(id, section)
                .with_role(BlockRole::Heading)
                .with_text(title)
                .with_children(children)
                .with_margins(0.0, SECTION_GAP),
        );
    };

    push(sections::CONTACT, "Contact", doc.personal_info.contact_lines());
    push(sections::SKILLS, "Skills", doc.skills.clone());
    push(sections::LANGUAGES, "Languages", doc.languages.clone());
    blocks
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::block::PageItem;
    use crate::layout::columns::SidebarSlot;
    use crate::models::resume::{EducationEntry, ExperienceEntry, PersonalInfo};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn make_resume(jobs: usize, lines_per_job: usize) -> ResumeDocument {
        ResumeDocument {
            personal_info: PersonalInfo {
                full_name: "Alex Doe".to_string(),
                headline: Some("Staff Engineer".to_string()),
                email: Some("alex@example.com".to_string()),
                phone: Some("+49 30 1234567".to_string()),
                location: Some("Berlin".to_string()),
                links: vec![],
            },
            summary: Some("Engineer focused on storage systems and developer tooling.".to_string()),
            experience: (0..jobs)
                .map(|j| ExperienceEntry {
                    id: Uuid::new_v4(),
                    role: format!("Engineer {j}"),
                    company: "Acme".to_string(),
                    start_date: date(2015 + j as i32, 1),
                    end_date: None,
                    responsibilities: (0..lines_per_job)
                        .map(|l| {
                            format!(
                                "Delivered improvement {l} to the ingestion pipeline, cutting p99 latency by {}% across regions",
                                10 + l
                            )
                        })
                        .collect(),
                })
                .collect(),
            education: vec![EducationEntry {
                id: Uuid::new_v4(),
                degree: "BSc Computer Science".to_string(),
                institution: "TU Berlin".to_string(),
                start_date: date(2010, 10),
                end_date: Some(date(2014, 7)),
                details: vec!["Thesis on log-structured storage".to_string()],
            }],
            skills: vec!["Rust".to_string(), "PostgreSQL".to_string(), "Kubernetes".to_string()],
            languages: vec!["English".to_string(), "German".to_string()],
        }
    }

    fn two_column(policy: SidebarPolicy) -> TemplateOptions {
        TemplateOptions {
            columns: ColumnLayout::TwoColumn {
                sidebar_width_mm: 55.0,
                gutter_mm: 6.0,
                policy,
                partial_sections: vec![sections::CONTACT.to_string()],
            },
            ..TemplateOptions::single_column(PageSetup::default(), FontFamily::Inter, 14.0)
        }
    }

    #[test]
    fn test_single_column_block_order() {
        let blocks = main_blocks(&make_resume(2, 3), false);
        let order: Vec<&str> = blocks.iter().map(|b| b.section_id.as_str()).collect();
        assert_eq!(order.first(), Some(&sections::PERSONAL_INFO));
        assert_eq!(order.last(), Some(&sections::LANGUAGES));
        assert!(blocks.iter().any(|b| b.section_id == sections::SKILLS));

        let experience: Vec<&Block> = blocks
            .iter()
            .filter(|b| b.section_id == sections::EXPERIENCE && b.role == BlockRole::Body)
            .collect();
        assert_eq!(experience.len(), 2);
        assert!(experience.iter().all(|b| b.splittable && b.children.len() == 3));
    }

    #[test]
    fn test_headings_keep_with_next() {
        let blocks = main_blocks(&make_resume(1, 1), false);
        assert!(blocks
            .iter()
            .filter(|b| b.id.ends_with("-heading"))
            .all(|b| b.keep_with_next));
    }

    #[test]
    fn test_two_column_moves_contact_and_skills_to_sidebar() {
        let doc = make_resume(1, 2);
        let main = main_blocks(&doc, true);
        assert!(main.iter().all(|b| b.section_id != sections::SKILLS));
        assert!(main[0].children.is_empty(), "contact lines belong to the sidebar");

        let sidebar = sidebar_blocks(&doc);
        let ids: Vec<&str> = sidebar.iter().map(|b| b.section_id.as_str()).collect();
        assert_eq!(ids, vec![sections::CONTACT, sections::SKILLS, sections::LANGUAGES]);
        assert_eq!(sidebar[0].children.len(), 3);
    }

    #[test]
    fn test_block_ids_unique() {
        let doc = make_resume(3, 4);
        let mut ids: Vec<String> = main_blocks(&doc, true)
            .into_iter()
            .chain(sidebar_blocks(&doc))
            .map(|b| b.id)
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_long_resume_spills_onto_continuation_pages() {
        let template = TemplateOptions::single_column(PageSetup::default(), FontFamily::Inter, 14.0);
        let prepared = PreparedDocument::prepare(&make_resume(4, 12), &template).unwrap();
        let plan = prepared.paginate(template.text).unwrap();

        assert!(plan.page_count() >= 2, "expected multiple pages, got {}", plan.page_count());
        assert_eq!(plan.pages[0].items[0].section_id(), sections::PERSONAL_INFO);
        let last = plan.pages.last().unwrap();
        assert_eq!(last.label, format!("Page {} of {}", last.number, plan.page_count()));
        for page in &plan.pages {
            for section in &page.continued_sections {
                assert_eq!(section, sections::EXPERIENCE);
            }
        }
    }

    #[test]
    fn test_two_column_placeholder_pages() {
        let template = two_column(SidebarPolicy::PlaceholderOnly);
        let prepared = PreparedDocument::prepare(&make_resume(4, 12), &template).unwrap();
        assert!(prepared.sidebar_width_px.unwrap() < prepared.main_width_px);

        let plan = prepared.paginate(template.text).unwrap();
        assert!(plan.page_count() >= 2);
        assert!(matches!(plan.pages[0].sidebar, Some(SidebarSlot::Full { .. })));
        assert!(plan.pages[1..]
            .iter()
            .all(|p| p.sidebar == Some(SidebarSlot::Placeholder)));
    }

    #[test]
    fn test_two_column_partial_repeats_contact() {
        let template = two_column(SidebarPolicy::RepeatPartial);
        let prepared = PreparedDocument::prepare(&make_resume(4, 12), &template).unwrap();
        let plan = prepared.paginate(template.text).unwrap();
        match &plan.pages[1].sidebar {
            Some(SidebarSlot::Partial { items }) => {
                assert_eq!(items.len(), 1);
                assert!(matches!(&items[0], PageItem::Block { section_id, .. } if section_id == sections::CONTACT));
            }
            other => panic!("expected partial sidebar, got {other:?}"),
        }
    }

    #[test]
    fn test_sidebar_wider_than_page_is_rejected() {
        let mut template = two_column(SidebarPolicy::RepeatFull);
        template.columns = ColumnLayout::TwoColumn {
            sidebar_width_mm: 400.0,
            gutter_mm: 6.0,
            policy: SidebarPolicy::RepeatFull,
            partial_sections: vec![],
        };
        let err = PreparedDocument::prepare(&make_resume(1, 1), &template).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidPageSetup(_)));
    }

    #[test]
    fn test_template_options_deserialize() {
        let json = r#"{
            "page": {"format": "letter", "margins_mm": {"top": 20, "bottom": 20, "left": 18, "right": 18}},
            "text": {"font": "eb_garamond", "font_size_px": 13, "line_height": 1.35, "heading_scale": 1.25},
            "columns": {"kind": "two_column", "sidebar_width_mm": 60, "policy": "repeat-partial"}
        }"#;
        let template: TemplateOptions = serde_json::from_str(json).unwrap();
        match template.columns {
            ColumnLayout::TwoColumn {
                gutter_mm,
                partial_sections,
                ..
            } => {
                assert_eq!(gutter_mm, 6.0);
                assert_eq!(partial_sections, vec![sections::CONTACT.to_string()]);
            }
            other => panic!("expected two-column layout, got {other:?}"),
        }
        assert!(template.pack.split_sections);
    }
}
