//! Owns the link, expense and income collections and every mutation on them.
//!
//! Each mutation validates first, changes the in-memory collection, then writes
//! the whole collection back to the store. If the write fails the in-memory
//! change is rolled back so memory and disk never disagree.

use crate::collection::{Collection, Record};
use crate::errors::AppError;
use crate::models::{
    Expense, ExpenseInput, Income, IncomeInput, Link, LinkInput, StatsResponse, Transaction,
};
use crate::stats::build_stats;
use crate::storage::{self, Store};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

pub struct Ledger {
    store: Store,
    links: Collection<Link>,
    expenses: Collection<Expense>,
    incomes: Collection<Income>,
}

impl Ledger {
    pub async fn load(store: Store) -> Self {
        let links = Collection::from_vec(store.read_collection(storage::LINKS).await);
        let expenses = Collection::from_vec(store.read_collection(storage::EXPENSES).await);
        let incomes = Collection::from_vec(store.read_collection(storage::INCOMES).await);
        info!(
            "loaded {} links, {} expenses, {} incomes",
            links.len(),
            expenses.len(),
            incomes.len()
        );
        Self {
            store,
            links,
            expenses,
            incomes,
        }
    }

    pub fn links(&self) -> &[Link] {
        self.links.as_slice()
    }

    pub fn expenses(&self) -> &[Expense] {
        self.expenses.as_slice()
    }

    pub fn incomes(&self) -> &[Income] {
        self.incomes.as_slice()
    }

    /// Pinned links first, then newest first.
    pub fn sorted_links(&self) -> Vec<Link> {
        let mut links = self.links.as_slice().to_vec();
        links.sort_by(|a, b| b.pinned.cmp(&a.pinned).then(b.timestamp.cmp(&a.timestamp)));
        links
    }

    pub fn sorted_expenses(&self) -> Vec<Expense> {
        let mut expenses = self.expenses.as_slice().to_vec();
        expenses.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        expenses
    }

    pub fn sorted_incomes(&self) -> Vec<Income> {
        let mut incomes = self.incomes.as_slice().to_vec();
        incomes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        incomes
    }

    /// Incomes and expenses merged, newest first.
    pub fn transactions(&self) -> Vec<Transaction> {
        let mut all: Vec<Transaction> = self
            .incomes
            .as_slice()
            .iter()
            .cloned()
            .map(Transaction::Income)
            .chain(self.expenses.as_slice().iter().cloned().map(Transaction::Expense))
            .collect();
        all.sort_by_key(|txn| std::cmp::Reverse(txn.timestamp()));
        all
    }

    pub fn stats(&self) -> StatsResponse {
        build_stats(self.links.len(), self.incomes(), self.expenses())
    }

    pub async fn add_link(&mut self, input: LinkInput) -> Result<Link, AppError> {
        let title = required(&input.title, "title")?;
        let url = normalize_url(&required(&input.url, "url")?);
        let image = input
            .image
            .map(|image| image.trim().to_string())
            .filter(|image| !image.is_empty());

        let link = Link {
            id: Uuid::new_v4(),
            title,
            url,
            image,
            timestamp: now_millis(),
            pinned: false,
        };
        insert(&self.store, storage::LINKS, &mut self.links, link).await
    }

    pub async fn toggle_pin(&mut self, id: Uuid) -> Result<Link, AppError> {
        let link = self.links.get_mut(id).ok_or_else(|| not_found::<Link>(id))?;
        link.pinned = !link.pinned;
        let updated = link.clone();

        if let Err(err) = self.store.write_collection(storage::LINKS, self.links.as_slice()).await {
            if let Some(link) = self.links.get_mut(id) {
                link.pinned = !link.pinned;
            }
            return Err(err);
        }
        info!("link {id} pinned={}", updated.pinned);
        Ok(updated)
    }

    pub async fn delete_link(&mut self, id: Uuid) -> Result<Link, AppError> {
        delete(&self.store, storage::LINKS, &mut self.links, id).await
    }

    pub async fn reset_links(&mut self) -> Result<(), AppError> {
        clear(&self.store, storage::LINKS, &mut self.links).await
    }

    pub async fn add_expense(&mut self, input: ExpenseInput) -> Result<Expense, AppError> {
        let expense = build_expense(Uuid::new_v4(), now_millis(), input)?;
        insert(&self.store, storage::EXPENSES, &mut self.expenses, expense).await
    }

    /// Replaces the expense in place. The original stays untouched unless the
    /// replacement validates and persists.
    pub async fn edit_expense(&mut self, id: Uuid, input: ExpenseInput) -> Result<Expense, AppError> {
        let timestamp = self
            .expenses
            .get(id)
            .map(|expense| expense.timestamp)
            .ok_or_else(|| not_found::<Expense>(id))?;
        let expense = build_expense(id, timestamp, input)?;
        replace(&self.store, storage::EXPENSES, &mut self.expenses, expense).await
    }

    pub async fn delete_expense(&mut self, id: Uuid) -> Result<Expense, AppError> {
        delete(&self.store, storage::EXPENSES, &mut self.expenses, id).await
    }

    pub async fn reset_expenses(&mut self) -> Result<(), AppError> {
        clear(&self.store, storage::EXPENSES, &mut self.expenses).await
    }

    pub async fn add_income(&mut self, input: IncomeInput) -> Result<Income, AppError> {
        let income = build_income(Uuid::new_v4(), now_millis(), input)?;
        insert(&self.store, storage::INCOMES, &mut self.incomes, income).await
    }

    pub async fn edit_income(&mut self, id: Uuid, input: IncomeInput) -> Result<Income, AppError> {
        let timestamp = self
            .incomes
            .get(id)
            .map(|income| income.timestamp)
            .ok_or_else(|| not_found::<Income>(id))?;
        let income = build_income(id, timestamp, input)?;
        replace(&self.store, storage::INCOMES, &mut self.incomes, income).await
    }

    pub async fn delete_income(&mut self, id: Uuid) -> Result<Income, AppError> {
        delete(&self.store, storage::INCOMES, &mut self.incomes, id).await
    }

    pub async fn reset_incomes(&mut self) -> Result<(), AppError> {
        clear(&self.store, storage::INCOMES, &mut self.incomes).await
    }
}

async fn insert<T: Record + Serialize>(
    store: &Store,
    key: &str,
    collection: &mut Collection<T>,
    item: T,
) -> Result<T, AppError> {
    let id = item.id();
    collection.push(item.clone());
    if let Err(err) = store.write_collection(key, collection.as_slice()).await {
        collection.remove(id);
        return Err(err);
    }
    info!("added {} {id}", T::KIND);
    Ok(item)
}

async fn replace<T: Record + Serialize>(
    store: &Store,
    key: &str,
    collection: &mut Collection<T>,
    item: T,
) -> Result<T, AppError> {
    let id = item.id();
    let previous = collection
        .replace(item.clone())
        .ok_or_else(|| not_found::<T>(id))?;
    if let Err(err) = store.write_collection(key, collection.as_slice()).await {
        collection.replace(previous);
        return Err(err);
    }
    info!("updated {} {id}", T::KIND);
    Ok(item)
}

async fn delete<T: Record + Serialize>(
    store: &Store,
    key: &str,
    collection: &mut Collection<T>,
    id: Uuid,
) -> Result<T, AppError> {
    let index = collection.position(id).ok_or_else(|| not_found::<T>(id))?;
    let removed = collection.remove(id).ok_or_else(|| not_found::<T>(id))?;
    if let Err(err) = store.write_collection(key, collection.as_slice()).await {
        collection.restore(index, removed);
        return Err(err);
    }
    info!("deleted {} {id}", T::KIND);
    Ok(removed)
}

async fn clear<T: Record + Serialize>(
    store: &Store,
    key: &str,
    collection: &mut Collection<T>,
) -> Result<(), AppError> {
    let previous = collection.take_all();
    if let Err(err) = store.write_collection::<T>(key, &[]).await {
        collection.restore_all(previous);
        return Err(err);
    }
    info!("cleared {} {key}", previous.len());
    Ok(())
}

fn build_expense(id: Uuid, timestamp: i64, input: ExpenseInput) -> Result<Expense, AppError> {
    Ok(Expense {
        id,
        title: required(&input.title, "title")?,
        amount: positive_amount(input.amount)?,
        category: required(&input.category, "category")?,
        payment_mode: required(&input.payment_mode, "payment mode")?,
        date: required(&input.date, "date")?,
        timestamp,
    })
}

fn build_income(id: Uuid, timestamp: i64, input: IncomeInput) -> Result<Income, AppError> {
    Ok(Income {
        id,
        title: required(&input.title, "title")?,
        amount: positive_amount(input.amount)?,
        category: required(&input.category, "category")?,
        date: required(&input.date, "date")?,
        timestamp,
    })
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn positive_amount(amount: Option<f64>) -> Result<f64, AppError> {
    match amount {
        Some(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(AppError::bad_request("amount must be a positive number")),
    }
}

fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

fn not_found<T: Record>(id: Uuid) -> AppError {
    AppError::not_found(format!("{} {id} not found", T::KIND))
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
