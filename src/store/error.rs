use thiserror::Error;

pub(crate) type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("Budget category '{0}' not found")]
    CategoryNotFound(String),

    #[error("Expense '{0}' not found")]
    ExpenseNotFound(String),

    #[error("Invalid amount: '{0}' (expected a non-negative number)")]
    InvalidAmount(String),

    #[error("Invalid month: '{0}' (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("Invalid date: '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// The change is kept in memory; `BudgetStore::flush` retries the save.
    #[error("Failed to save budget data: {0:#}")]
    Persist(anyhow::Error),
}
