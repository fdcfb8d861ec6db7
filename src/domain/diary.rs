use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, Identifiable, RecordId};

/// Mood recorded with a diary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Bad,
    Terrible,
}

impl Default for Mood {
    fn default() -> Self {
        Mood::Okay
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Bad => "bad",
            Mood::Terrible => "terrible",
        };
        write!(f, "{label}")
    }
}

/// Dated journal entry with a mood marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: RecordId,
    pub date: NaiveDate,
    pub title: String,
    pub content: String,
    pub mood: Mood,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DiaryEntry {
    pub fn new(
        date: NaiveDate,
        title: impl Into<String>,
        content: impl Into<String>,
        mood: Mood,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::default(),
            date,
            title: title.into(),
            content: content.into(),
            mood,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

impl Identifiable for DiaryEntry {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Displayable for DiaryEntry {
    fn display_label(&self) -> String {
        format!("{} [{}] {}", self.date, self.mood, self.title)
    }
}
