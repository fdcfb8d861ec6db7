//! Record types shared across the store, services, and interpreter.

pub mod account;
pub mod budget;
pub mod category;
pub mod common;
pub mod diary;
pub mod plan;
pub mod reporting;
pub mod settings;
pub mod task;
pub mod transaction;

pub use account::{Account, AccountKind};
pub use budget::{Budget, BudgetPeriod};
pub use category::{Category, CategoryKind};
pub use common::{Displayable, Identifiable, NamedEntity, RecordId};
pub use diary::{DiaryEntry, Mood};
pub use plan::{ChecklistItem, HolidayBalance, ItineraryDay, Plan, PlanKind, PlanStatus};
pub use reporting::{
    BudgetProgress, CategoryTotal, DateWindow, FlowTotals, MonthlyFlow, PeriodKind,
};
pub use settings::{Settings, Theme};
pub use task::{Task, TaskCategory, TaskPriority, TaskStatus};
pub use transaction::{Frequency, Recurrence, Transaction, TransactionKind};
