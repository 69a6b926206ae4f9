mod category;
mod expense;
mod health;
mod month;

pub use category::{BudgetCategory, UsageLevel};
pub use expense::Expense;
pub(crate) use expense::normalize_note;
pub use health::HealthBand;
pub use month::{MonthKey, MonthRecord};

#[cfg(test)]
mod tests;
