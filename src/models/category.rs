use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategory {
    pub id: String,
    pub name: String,
    pub allocated: Decimal,
    /// Cached sum of the amounts of expenses pointing at this category.
    #[serde(default)]
    pub used: Decimal,
}

/// How far into its allocation a category has spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLevel {
    Normal,
    Warning,
    Over,
}

impl BudgetCategory {
    pub fn new(name: String, allocated: Decimal) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            allocated,
            used: Decimal::ZERO,
        }
    }

    pub fn remaining(&self) -> Decimal {
        self.allocated.saturating_sub(self.used)
    }

    /// Percentage of the allocation used. Zero when nothing is allocated.
    pub fn usage_percent(&self) -> Decimal {
        if self.allocated > Decimal::ZERO {
            self.used
                .saturating_mul(Decimal::ONE_HUNDRED)
                .checked_div(self.allocated)
                .unwrap_or(Decimal::MAX)
        } else {
            Decimal::ZERO
        }
    }

    pub fn usage_level(&self) -> UsageLevel {
        let pct = self.usage_percent();
        if pct > Decimal::ONE_HUNDRED {
            UsageLevel::Over
        } else if pct > Decimal::from(80) {
            UsageLevel::Warning
        } else {
            UsageLevel::Normal
        }
    }

    /// Find a category by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(
        categories: &'a [BudgetCategory],
        name: &str,
    ) -> Option<&'a BudgetCategory> {
        let lower = name.to_lowercase();
        categories.iter().find(|c| c.name.to_lowercase() == lower)
    }

    /// Find a category by ID in a slice.
    pub fn find_by_id<'a>(categories: &'a [BudgetCategory], id: &str) -> Option<&'a BudgetCategory> {
        categories.iter().find(|c| c.id == id)
    }
}

impl std::fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
