use crate::db::Persistence;
use crate::models::{BudgetCategory, Expense};
use crate::store::BudgetStore;

use super::util::clamp_index;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Categories,
    Expenses,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Categories, Self::Expenses]
    }

    pub(crate) fn next(self) -> Self {
        let screens = Self::all();
        let idx = screens.iter().position(|s| *s == self).unwrap_or(0);
        screens[(idx + 1) % screens.len()]
    }

    pub(crate) fn prev(self) -> Self {
        let screens = Self::all();
        let idx = screens.iter().position(|s| *s == self).unwrap_or(0);
        screens[(idx + screens.len() - 1) % screens.len()]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Categories => write!(f, "Categories"),
            Self::Expenses => write!(f, "Expenses"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteCategory { id: String, name: String },
    DeleteExpense { id: String, label: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) currency_symbol: String,

    pub(crate) category_index: usize,
    pub(crate) category_scroll: usize,
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            currency_symbol: currency_symbol.into(),

            category_index: 0,
            category_scroll: 0,
            expense_index: 0,
            expense_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    pub(crate) fn money(&self, amount: rust_decimal::Decimal) -> String {
        super::util::format_money(amount, &self.currency_symbol)
    }

    /// Category under the cursor on the Categories screen.
    pub(crate) fn selected_category<'a, P: Persistence>(
        &self,
        store: &'a BudgetStore<P>,
    ) -> Option<&'a BudgetCategory> {
        store
            .get_current_month()
            .budget_categories
            .get(self.category_index)
    }

    /// Expense under the cursor. The Expenses screen lists newest first, so
    /// the index is into that ordering rather than storage order.
    pub(crate) fn selected_expense<'a, P: Persistence>(
        &self,
        store: &'a BudgetStore<P>,
    ) -> Option<&'a Expense> {
        store
            .get_current_month()
            .expenses_by_date_desc()
            .get(self.expense_index)
            .copied()
    }

    /// Keep both cursors inside their lists after a mutation or month change.
    pub(crate) fn clamp_selection<P: Persistence>(&mut self, store: &BudgetStore<P>) {
        let record = store.get_current_month();
        clamp_index(
            &mut self.category_index,
            &mut self.category_scroll,
            record.budget_categories.len(),
        );
        clamp_index(
            &mut self.expense_index,
            &mut self.expense_scroll,
            record.expenses.len(),
        );
    }

    /// Reset cursors when the month under view changes.
    pub(crate) fn reset_selection(&mut self) {
        self.category_index = 0;
        self.category_scroll = 0;
        self.expense_index = 0;
        self.expense_scroll = 0;
    }
}
