use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The structured CV a template renders. Rebuilt into blocks on every pagination run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub full_name: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

impl PersonalInfo {
    /// Contact lines in display order, skipping absent fields.
    pub fn contact_lines(&self) -> Vec<String> {
        [&self.email, &self.phone, &self.location]
            .into_iter()
            .flatten()
            .cloned()
            .chain(self.links.iter().cloned())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub id: Uuid,
    pub role: String,
    pub company: String,
    pub start_date: NaiveDate,
    /// `None` while the position is current.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationEntry {
    pub id: Uuid,
    pub degree: String,
    pub institution: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub details: Vec<String>,
}

/// "Mar 2021 – Present" style range.
pub fn format_date_range(start: NaiveDate, end: Option<NaiveDate>) -> String {
    let end = match end {
        Some(d) => d.format("%b %Y").to_string(),
        None => "Present".to_string(),
    };
    format!("{} – {end}", start.format("%b %Y"))
}
