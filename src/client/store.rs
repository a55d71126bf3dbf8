use crate::models::{Artist, Booking, Event, MyBooking};

pub trait Identified {
    fn id(&self) -> i64;
}

impl Identified for Artist {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Event {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Booking {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for MyBooking {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Local copy of a server-side list. Entries are only ever taken from
/// records the server returned, so the copy never drifts from them.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Identified> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Swaps in the record with the same id, or appends it. Returns `true`
    /// when the record was new.
    pub fn upsert(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => {
                *existing = item;
                false
            }
            None => {
                self.items.push(item);
                true
            }
        }
    }

    pub fn remove(&mut self, id: i64) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
