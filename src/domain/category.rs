use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, Identifiable, NamedEntity, RecordId};
use crate::domain::transaction::TransactionKind;

/// Flow side a category classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Income,
}

impl CategoryKind {
    /// Whether a transaction of `kind` belongs under this category side.
    /// Transfers never match either side.
    pub fn matches(self, kind: TransactionKind) -> bool {
        matches!(
            (self, kind),
            (CategoryKind::Expense, TransactionKind::Expense)
                | (CategoryKind::Income, TransactionKind::Income)
        )
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Expense => "expense",
            CategoryKind::Income => "income",
        };
        write!(f, "{label}")
    }
}

/// Classification bucket for transactions and budgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,
    pub name: String,
    pub kind: CategoryKind,
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::default(),
            name: name.into(),
            kind,
            icon: "Tag".to_string(),
            color: "#95A5A6".to_string(),
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Marks the category as part of the built-in seed set, which protects it
    /// from deletion.
    pub fn preset(mut self) -> Self {
        self.is_default = true;
        self
    }
}

impl Identifiable for Category {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }
}
