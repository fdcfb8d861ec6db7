use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, Identifiable, NamedEntity, RecordId};

/// Kind of money holder an account models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Cash,
    Bank,
    CreditCard,
    DigitalWallet,
    Investment,
    Other,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountKind::Cash => "cash",
            AccountKind::Bank => "bank",
            AccountKind::CreditCard => "credit card",
            AccountKind::DigitalWallet => "digital wallet",
            AccountKind::Investment => "investment",
            AccountKind::Other => "other",
        };
        write!(f, "{label}")
    }
}

/// A place money lives, with a running balance maintained by transfers and
/// balance adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: RecordId,
    pub name: String,
    pub kind: AccountKind,
    pub balance: f64,
    pub currency: String,
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(name: impl Into<String>, kind: AccountKind) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::default(),
            name: name.into(),
            kind,
            balance: 0.0,
            currency: "USD".to_string(),
            icon: "Wallet".to_string(),
            color: "#10b981".to_string(),
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn preset(mut self) -> Self {
        self.is_default = true;
        self
    }
}

impl Identifiable for Account {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl NamedEntity for Account {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Account {
    fn display_label(&self) -> String {
        format!(
            "{} [{}] {:.2} {}",
            self.name, self.kind, self.balance, self.currency
        )
    }
}
