//! Stateless services exposing the store's operations over a mutable
//! [`Ledger`](crate::ledger::Ledger).

pub mod account_service;
pub mod budget_service;
pub mod category_service;
pub mod diary_service;
pub mod plan_service;
pub mod report_service;
pub mod task_service;
pub mod transaction_service;

pub use account_service::{AccountService, BalanceDirection};
pub use budget_service::BudgetService;
pub use category_service::CategoryService;
pub use diary_service::DiaryService;
pub use plan_service::PlanService;
pub use report_service::ReportService;
pub use task_service::TaskService;
pub use transaction_service::TransactionService;

use crate::errors::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Invalid(String),

    #[error("operation not permitted: {0}")]
    Forbidden(String),
}
