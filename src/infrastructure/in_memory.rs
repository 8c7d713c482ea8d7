use crate::domain::ports::{Change, Record, Repository};
use crate::error::{PulseError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

struct Table<T> {
    rows: BTreeMap<u64, T>,
    index: HashMap<String, u64>,
    next_id: u64,
}

impl<T: Record> Table<T> {
    /// Inserts or replaces a row, keeping the lookup index in step.
    fn put(&mut self, record: T) {
        if let Some(old) = self.rows.get(&record.id()).and_then(|r| r.lookup_key())
            && record.lookup_key() != Some(old)
        {
            self.index.remove(old);
        }
        if let Some(key) = record.lookup_key() {
            self.index.insert(key.to_string(), record.id());
        }
        self.rows.insert(record.id(), record);
    }
}

/// A thread-safe in-memory collection of records.
///
/// Id allocation and insertion happen under one write lock, so concurrent
/// creates always receive distinct, increasing ids. Contents live as long as
/// the process.
pub struct InMemoryRepository<T> {
    table: Arc<RwLock<Table<T>>>,
}

impl<T> InMemoryRepository<T> {
    /// Creates a new, empty collection whose first id is 1.
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(Table {
                rows: BTreeMap::new(),
                index: HashMap::new(),
                next_id: 1,
            })),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for InMemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

#[async_trait]
impl<T: Record> Repository<T> for InMemoryRepository<T> {
    async fn create(&self, new: T::New) -> Result<T> {
        let mut table = self.table.write().await;
        let record = T::assemble(table.next_id, Utc::now(), new);

        if T::UNIQUE_KEY
            && let Some(key) = record.lookup_key()
            && table.index.contains_key(key)
        {
            return Err(PulseError::Conflict(format!("{} '{}'", T::COLLECTION, key)));
        }

        table.next_id += 1;
        table.put(record.clone());
        Ok(record)
    }

    async fn get(&self, id: u64) -> Result<Option<T>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<T>> {
        let table = self.table.read().await;
        Ok(table.index.get(key).and_then(|id| table.rows.get(id)).cloned())
    }

    async fn all(&self) -> Result<Vec<T>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn update(&self, record: T) -> Result<Option<T>> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&record.id()) {
            return Ok(None);
        }
        table.put(record.clone());
        Ok(Some(record))
    }

    async fn update_with(&self, id: u64, change: Change<T>) -> Result<Option<(T, T)>> {
        let mut table = self.table.write().await;
        let Some(before) = table.rows.get(&id).cloned() else {
            return Ok(None);
        };

        let mut after = before.clone();
        if change(&mut after) {
            table.put(after.clone());
        } else {
            after = before.clone();
        }
        Ok(Some((before, after)))
    }
}
