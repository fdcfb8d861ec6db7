use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable, RecordId};

/// Default yearly holiday allowance in days.
pub const DEFAULT_HOLIDAY_ALLOWANCE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Trip,
    Event,
    Goal,
    Project,
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlanKind::Trip => "trip",
            PlanKind::Event => "event",
            PlanKind::Goal => "goal",
            PlanKind::Project => "project",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Planning,
    Confirmed,
    Ongoing,
    Completed,
    Cancelled,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlanStatus::Planning => "planning",
            PlanStatus::Confirmed => "confirmed",
            PlanStatus::Ongoing => "ongoing",
            PlanStatus::Completed => "completed",
            PlanStatus::Cancelled => "cancelled",
        };
        write!(f, "{label}")
    }
}

/// One line of a plan's preparation checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            completed: false,
        }
    }
}

/// Scheduled activities for one day of a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// A trip, event, goal, or project tracked with its own budget and dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub kind: PlanKind,
    pub status: PlanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    pub spent: f64,
    pub currency: String,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Holiday days this plan consumes when it is a confirmed trip.
    #[serde(default)]
    pub holidays_used: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    pub fn new(
        title: impl Into<String>,
        kind: PlanKind,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::default(),
            title: title.into(),
            description: String::new(),
            kind,
            status: PlanStatus::Planning,
            destination: None,
            start_date,
            end_date,
            budget: 0.0,
            spent: 0.0,
            currency: "USD".to_string(),
            checklist: Vec::new(),
            itinerary: Vec::new(),
            notes: String::new(),
            tags: Vec::new(),
            holidays_used: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_status(mut self, status: PlanStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_holidays_used(mut self, days: u32) -> Self {
        self.holidays_used = days;
        self
    }

    /// Confirmed trips are the only plans that consume holiday allowance.
    pub fn consumes_holidays(&self) -> bool {
        self.kind == PlanKind::Trip && self.status == PlanStatus::Confirmed
    }
}

impl Identifiable for Plan {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Displayable for Plan {
    fn display_label(&self) -> String {
        format!(
            "{} [{}] {} .. {}",
            self.title, self.status, self.start_date, self.end_date
        )
    }
}

/// Yearly holiday day ledger: allowance, consumed days, and days reserved by
/// confirmed trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayBalance {
    pub id: RecordId,
    pub year: i32,
    pub total_days: u32,
    pub used_days: u32,
    pub planned_days: u32,
    /// Total minus used minus planned; negative when overcommitted.
    pub available_days: i32,
}

impl HolidayBalance {
    pub fn new(year: i32) -> Self {
        let mut balance = Self {
            id: RecordId::default(),
            year,
            total_days: DEFAULT_HOLIDAY_ALLOWANCE,
            used_days: 0,
            planned_days: 0,
            available_days: 0,
        };
        balance.recompute();
        balance
    }

    pub fn recompute(&mut self) {
        self.available_days =
            self.total_days as i32 - self.used_days as i32 - self.planned_days as i32;
    }
}

impl Identifiable for HolidayBalance {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn only_confirmed_trips_consume_holidays() {
        let trip = Plan::new("Lisbon", PlanKind::Trip, date(2024, 8, 1), date(2024, 8, 10));
        assert!(!trip.consumes_holidays());
        assert!(trip.with_status(PlanStatus::Confirmed).consumes_holidays());

        let event = Plan::new("Concert", PlanKind::Event, date(2024, 9, 1), date(2024, 9, 1))
            .with_status(PlanStatus::Confirmed);
        assert!(!event.consumes_holidays());
    }

    #[test]
    fn fresh_balance_has_the_full_allowance() {
        let balance = HolidayBalance::new(2024);
        assert_eq!(balance.available_days, DEFAULT_HOLIDAY_ALLOWANCE as i32);
    }

    #[test]
    fn recompute_can_go_negative() {
        let mut balance = HolidayBalance::new(2024);
        balance.used_days = 15;
        balance.planned_days = 10;
        balance.recompute();
        assert_eq!(balance.available_days, -5);
    }
}
