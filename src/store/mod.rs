//! The budget store: owns every month's record, applies mutations against
//! the month under the cursor, and writes the whole map back after each one.
//!
//! Each category caches `used`, the sum of the expenses pointing at it. Every
//! expense mutation keeps that cache exact, and loading recomputes it so a
//! hand-edited or stale document cannot carry drift forward.

mod error;
mod parse;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::db::{MonthMap, Persistence};
use crate::models::{normalize_note, BudgetCategory, Expense, MonthKey, MonthRecord};

pub(crate) use error::{StoreError, StoreResult};
pub(crate) use parse::parse_date;
use parse::{parse_amount, parse_month};

/// What `delete_category` took out of the month.
#[derive(Debug, Clone)]
pub(crate) struct RemovedCategory {
    pub(crate) category: BudgetCategory,
    pub(crate) expenses: Vec<Expense>,
}

/// One month of the income/disposable/allocation trend.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrendPoint {
    pub(crate) month: MonthKey,
    pub(crate) income: Decimal,
    pub(crate) disposable: Decimal,
    pub(crate) allocated: Decimal,
}

pub(crate) struct BudgetStore<P: Persistence> {
    backend: P,
    months: MonthMap,
    cursor: MonthKey,
    dirty: bool,
}

impl<P: Persistence> BudgetStore<P> {
    /// Load everything from `backend` and point the cursor at today's month.
    pub(crate) fn open(backend: P) -> anyhow::Result<Self> {
        Self::open_at(backend, MonthKey::current())
    }

    pub(crate) fn open_at(backend: P, cursor: MonthKey) -> anyhow::Result<Self> {
        let mut months = backend.load_months()?;
        let repaired = reconcile_used(&mut months);
        if repaired > 0 {
            tracing::warn!(repaired, "Recomputed drifted category totals on load");
        }
        let mut store = Self {
            backend,
            months,
            cursor,
            dirty: repaired > 0,
        };
        store.get_or_create_month(cursor);
        tracing::info!(
            months = store.months.len(),
            current = %store.cursor,
            "Budget store ready"
        );
        Ok(store)
    }

    // ── Month access ──────────────────────────────────────────

    pub(crate) fn current_month_key(&self) -> MonthKey {
        self.cursor
    }

    /// Returns the record for `key`, inserting an empty one if absent.
    pub(crate) fn get_or_create_month(&mut self, key: MonthKey) -> &mut MonthRecord {
        self.months.entry(key).or_insert_with(|| {
            tracing::debug!(month = %key, "Created month record");
            MonthRecord::default()
        })
    }

    pub(crate) fn get_current_month(&self) -> &MonthRecord {
        // The cursor's record is created whenever the cursor moves.
        static EMPTY: MonthRecord = MonthRecord {
            income: Decimal::ZERO,
            disposable: Decimal::ZERO,
            budget_categories: Vec::new(),
            expenses: Vec::new(),
        };
        self.months.get(&self.cursor).unwrap_or(&EMPTY)
    }

    fn current_mut(&mut self) -> &mut MonthRecord {
        let key = self.cursor;
        self.get_or_create_month(key)
    }

    pub(crate) fn month(&self, key: MonthKey) -> Option<&MonthRecord> {
        self.months.get(&key)
    }

    pub(crate) fn months(&self) -> &MonthMap {
        &self.months
    }

    /// Move the cursor by `delta` whole months and save.
    pub(crate) fn advance_month(&mut self, delta: i32) -> StoreResult<MonthKey> {
        self.cursor = self.cursor.shift(delta).ok_or_else(|| {
            StoreError::InvalidMonth(format!("{} shifted by {delta}", self.cursor))
        })?;
        self.current_mut();
        tracing::debug!(month = %self.cursor, delta, "Moved month cursor");
        self.flush()?;
        Ok(self.cursor)
    }

    pub(crate) fn set_current_month(&mut self, key: &str) -> StoreResult<MonthKey> {
        let key = parse_month(key)?;
        self.cursor = key;
        self.current_mut();
        tracing::debug!(month = %key, "Jumped month cursor");
        Ok(key)
    }

    // ── Persistence ───────────────────────────────────────────

    /// Write the full month map. On failure the in-memory state is kept and
    /// the store stays dirty until a later flush succeeds.
    pub(crate) fn flush(&mut self) -> StoreResult<()> {
        match self.backend.save_months(&self.months) {
            Ok(()) => {
                if self.dirty {
                    tracing::info!("Budget data saved after earlier failure");
                }
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                tracing::warn!(error = %format!("{e:#}"), "Failed to save budget data");
                Err(StoreError::Persist(e))
            }
        }
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn backend(&self) -> &P {
        &self.backend
    }

    // ── Income & disposable ───────────────────────────────────

    pub(crate) fn set_income(&mut self, amount: &str) -> StoreResult<Decimal> {
        let amount = parse_amount(amount)?;
        self.current_mut().income = amount;
        tracing::debug!(month = %self.cursor, %amount, "Set income");
        self.flush()?;
        Ok(amount)
    }

    pub(crate) fn set_disposable(&mut self, amount: &str) -> StoreResult<Decimal> {
        let amount = parse_amount(amount)?;
        self.current_mut().disposable = amount;
        tracing::debug!(month = %self.cursor, %amount, "Set disposable");
        self.flush()?;
        Ok(amount)
    }

    // ── Budget categories ─────────────────────────────────────

    pub(crate) fn add_category(&mut self, name: &str, allocated: &str) -> StoreResult<BudgetCategory> {
        let allocated = parse_amount(allocated)?;
        let category = BudgetCategory::new(name.trim().to_string(), allocated);
        self.current_mut().budget_categories.push(category.clone());
        tracing::debug!(id = %category.id, name = %category.name, "Added category");
        self.flush()?;
        Ok(category)
    }

    /// Rename and re-allocate a category. `used` is left alone.
    pub(crate) fn update_category(
        &mut self,
        id: &str,
        name: &str,
        allocated: &str,
    ) -> StoreResult<BudgetCategory> {
        let allocated = parse_amount(allocated)?;
        let category = self
            .current_mut()
            .category_mut(id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.to_string()))?;
        category.name = name.trim().to_string();
        category.allocated = allocated;
        let updated = category.clone();
        tracing::debug!(id, "Updated category");
        self.flush()?;
        Ok(updated)
    }

    /// Remove a category along with every expense filed under it.
    /// Saves even when `id` matches nothing.
    pub(crate) fn delete_category(&mut self, id: &str) -> StoreResult<Option<RemovedCategory>> {
        let record = self.current_mut();
        let removed = match record.budget_categories.iter().position(|c| c.id == id) {
            Some(idx) => {
                let category = record.budget_categories.remove(idx);
                let (expenses, kept): (Vec<Expense>, Vec<Expense>) = record
                    .expenses
                    .drain(..)
                    .partition(|e| e.category_id == id);
                record.expenses = kept;
                tracing::debug!(id, cascaded = expenses.len(), "Deleted category");
                Some(RemovedCategory { category, expenses })
            }
            None => None,
        };
        self.flush()?;
        Ok(removed)
    }

    // ── Expenses ──────────────────────────────────────────────

    /// Record an expense and add its amount to the category's `used`.
    /// The category must exist in the current month.
    pub(crate) fn add_expense(
        &mut self,
        date: NaiveDate,
        category_id: &str,
        amount: &str,
        note: Option<String>,
    ) -> StoreResult<Expense> {
        let amount = parse_amount(amount)?;
        let record = self.current_mut();
        let category = record
            .category_mut(category_id)
            .ok_or_else(|| StoreError::CategoryNotFound(category_id.to_string()))?;
        category.used = category
            .used
            .checked_add(amount)
            .ok_or_else(|| StoreError::InvalidAmount(amount.to_string()))?;

        let expense = Expense::new(date, category_id.to_string(), amount, note);
        record.expenses.push(expense.clone());
        tracing::debug!(id = %expense.id, category_id, %amount, "Added expense");
        self.flush()?;
        Ok(expense)
    }

    /// Overwrite an expense. The old amount is taken off the old category
    /// before the new amount is added to the new one, so moving an expense
    /// between categories is handled the same way as editing it in place.
    pub(crate) fn update_expense(
        &mut self,
        id: &str,
        date: NaiveDate,
        category_id: &str,
        amount: &str,
        note: Option<String>,
    ) -> StoreResult<Expense> {
        let amount = parse_amount(amount)?;
        let record = self.current_mut();
        let idx = record
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::ExpenseNotFound(id.to_string()))?;
        let old_category = record.expenses[idx].category_id.clone();
        let old_amount = record.expenses[idx].amount;
        let target = record
            .category(category_id)
            .ok_or_else(|| StoreError::CategoryNotFound(category_id.to_string()))?;
        let base = if old_category == category_id {
            target.used.saturating_sub(old_amount)
        } else {
            target.used
        };
        let new_used = base
            .checked_add(amount)
            .ok_or_else(|| StoreError::InvalidAmount(amount.to_string()))?;

        if let Some(old) = record.category_mut(&old_category) {
            old.used = old.used.saturating_sub(old_amount);
        }

        let expense = &mut record.expenses[idx];
        expense.date = date;
        expense.category_id = category_id.to_string();
        expense.amount = amount;
        expense.note = normalize_note(note);
        let updated = expense.clone();

        if let Some(new) = record.category_mut(category_id) {
            new.used = new_used;
        }
        tracing::debug!(id, from = %old_category, to = category_id, "Updated expense");
        self.flush()?;
        Ok(updated)
    }

    /// Remove an expense and take its amount off its category.
    /// Returns `Ok(None)` without saving when `id` matches nothing.
    pub(crate) fn delete_expense(&mut self, id: &str) -> StoreResult<Option<Expense>> {
        let record = self.current_mut();
        let Some(idx) = record.expenses.iter().position(|e| e.id == id) else {
            return Ok(None);
        };
        let expense = record.expenses.remove(idx);
        if let Some(category) = record.category_mut(&expense.category_id) {
            category.used = category.used.saturating_sub(expense.amount);
        }
        tracing::debug!(id, amount = %expense.amount, "Deleted expense");
        self.flush()?;
        Ok(Some(expense))
    }

    // ── Derived queries ───────────────────────────────────────

    pub(crate) fn total_allocated(&self) -> Decimal {
        self.get_current_month().total_allocated()
    }

    /// Sum of the cached `used` values, not a fresh pass over expenses.
    pub(crate) fn total_used(&self) -> Decimal {
        self.get_current_month().total_used()
    }

    /// Disposable minus everything allocated. Negative when over-allocated.
    pub(crate) fn remaining_budget(&self) -> Decimal {
        self.get_current_month()
            .disposable
            .saturating_sub(self.total_allocated())
    }

    pub(crate) fn remaining_after_disposable(&self) -> Decimal {
        let record = self.get_current_month();
        record.income.saturating_sub(record.disposable)
    }

    /// Share of income left after the disposable allowance, 0-100.
    pub(crate) fn health_score(&self) -> u8 {
        health_score(self.get_current_month())
    }

    pub(crate) fn category_name(&self, category_id: &str) -> Option<&str> {
        self.get_current_month()
            .category(category_id)
            .map(|c| c.name.as_str())
    }

    /// Look a category up by id, then by case-insensitive name.
    pub(crate) fn find_category(&self, id_or_name: &str) -> Option<&BudgetCategory> {
        let categories = &self.get_current_month().budget_categories;
        BudgetCategory::find_by_id(categories, id_or_name)
            .or_else(|| BudgetCategory::find_by_name(categories, id_or_name.trim()))
    }

    /// Today when the cursor is on the current month, else the cursor's first day.
    pub(crate) fn default_expense_date(&self) -> NaiveDate {
        let today = chrono::Local::now().date_naive();
        if self.cursor.contains(today) {
            today
        } else {
            self.cursor.first_day()
        }
    }

    /// `count` months ending at the cursor, oldest first. Months never
    /// visited read as zeros and are not created.
    pub(crate) fn trend(&self, count: usize) -> Vec<TrendPoint> {
        (0..count as i32)
            .rev()
            .filter_map(|back| self.cursor.shift(-back))
            .map(|month| match self.months.get(&month) {
                Some(record) => TrendPoint {
                    month,
                    income: record.income,
                    disposable: record.disposable,
                    allocated: record.total_allocated(),
                },
                None => TrendPoint {
                    month,
                    income: Decimal::ZERO,
                    disposable: Decimal::ZERO,
                    allocated: Decimal::ZERO,
                },
            })
            .collect()
    }
}

pub(crate) fn health_score(record: &MonthRecord) -> u8 {
    if record.income.is_zero() {
        return 0;
    }
    let left = record.income.saturating_sub(record.disposable);
    // An overflowing quotient is far outside 0-1 anyway; keep only its sign.
    let ratio = left.checked_div(record.income).unwrap_or(if left.is_sign_negative() {
        Decimal::ZERO
    } else {
        Decimal::ONE
    });
    let pct = ratio
        .saturating_mul(Decimal::ONE_HUNDRED)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let rounded = pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_u8().unwrap_or(0)
}

/// Recompute every cached `used` from the expenses. Returns how many
/// categories were corrected.
fn reconcile_used(months: &mut MonthMap) -> usize {
    let mut repaired = 0;
    for (key, record) in months.iter_mut() {
        for idx in 0..record.budget_categories.len() {
            let actual = record.recomputed_used(&record.budget_categories[idx].id);
            let category = &mut record.budget_categories[idx];
            if category.used != actual {
                tracing::warn!(
                    month = %key,
                    category = %category.name,
                    cached = %category.used,
                    actual = %actual,
                    "Category total drifted from its expenses"
                );
                category.used = actual;
                repaired += 1;
            }
        }
    }
    repaired
}
