use crate::models::{Expense, Income, Link};
use uuid::Uuid;

/// A stored entity with a stable identity.
pub trait Record: Clone {
    const KIND: &'static str;

    fn id(&self) -> Uuid;
}

impl Record for Link {
    const KIND: &'static str = "link";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Expense {
    const KIND: &'static str = "expense";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Income {
    const KIND: &'static str = "income";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Ordered sequence of records, addressed by id rather than position.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> Collection<T> {
    pub fn from_vec(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Swaps the record with the same id for `item`, returning the previous one.
    pub fn replace(&mut self, item: T) -> Option<T> {
        let slot = self.get_mut(item.id())?;
        Some(std::mem::replace(slot, item))
    }

    pub fn remove(&mut self, id: Uuid) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    /// Puts a removed record back at its former position.
    pub fn restore(&mut self, index: usize, item: T) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn take_all(&mut self) -> Vec<T> {
        std::mem::take(&mut self.items)
    }

    pub fn restore_all(&mut self, items: Vec<T>) {
        self.items = items;
    }
}
